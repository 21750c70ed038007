//! Filter bar rendering for the active list.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, Focus};
use crate::route::Route;

/// Render the staged filters of the active list.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == Focus::Filter && app.modal.is_none();

    let (choice_label, choice, q, count) = match app.route() {
        Route::Tasks => {
            let staged = app.tasks.form.staged();
            ("State", staged.state.to_string(), staged.q.as_str(), staged.count)
        }
        Route::Resources => {
            let staged = app.resources.form.staged();
            ("Locked", staged.lock.to_string(), staged.q.as_str(), staged.count)
        }
    };

    let mut query = q.to_string();
    if is_focused {
        query.push('█');
    }

    let mut spans = vec![
        Span::styled(format!("{choice_label}: "), theme::dimmed()),
        Span::styled(format!("◂ {choice} ▸"), theme::normal()),
        Span::raw("  "),
        Span::styled("Search: ", theme::dimmed()),
    ];
    if query.is_empty() {
        spans.push(Span::styled("(any)", theme::dimmed()));
    } else {
        spans.push(Span::styled(query, theme::input_cursor()));
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled("Per page: ", theme::dimmed()));
    spans.push(Span::styled(count.to_string(), theme::normal()));
    if app.route() == Route::Tasks {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("Sort: ", theme::dimmed()));
        spans.push(Span::styled(
            app.tasks.form.staged().sort.to_string(),
            theme::normal(),
        ));
    }

    let block = Block::default()
        .title("Filters")
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
