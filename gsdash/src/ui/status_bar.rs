//! Status bar rendering.

use std::fmt::Write as _;

use chrono::{DateTime, Local};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, DEFAULT_TIMESTAMP_FORMAT, Focus};
use crate::route::Route;

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = if app.current_notice().is_some() {
        "Enter/Esc: dismiss"
    } else if app.modal.is_some() {
        "Enter: submit | Tab: next field | Esc: close"
    } else {
        match (app.focus, app.route()) {
            (Focus::Filter, _) => "Enter: search | ^R: reset | ←→: filter | ↑↓: page size | Esc: back",
            (Focus::Table, Route::Tasks) => {
                "Tab: switch | ↑↓/jk: select | Enter: details | n/p: page | /: filter | c: cancel | a: add | r: refresh | q: quit"
            }
            (Focus::Table, Route::Resources) => {
                "Tab: switch | ↑↓/jk: select | n/p: page | /: filter | a: add | r: refresh | q: quit"
            }
        }
    };

    let last_updated = match app.route() {
        Route::Tasks => app.tasks.last_updated(),
        Route::Resources => app.resources.last_updated(),
    };
    let (dot_color, updated_text) = last_updated.map_or_else(
        || (theme::WARNING, "waiting for data".to_string()),
        |at| {
            (
                theme::SUCCESS,
                format!("updated {}", format_time(&at, &app.timestamp_format)),
            )
        },
    );

    let status_line = Line::from(vec![
        Span::styled(concat!("gsdash v", env!("CARGO_PKG_VERSION")), theme::bold()),
        Span::raw(" | "),
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {} {updated_text}", app.base_url)),
        Span::raw(" | "),
        Span::styled(help_text, theme::dimmed()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}

/// `at` rendered with `format`, or with the default format when `format`
/// is not valid strftime.
fn format_time(at: &DateTime<Local>, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", at.format(format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", at.format(DEFAULT_TIMESTAMP_FORMAT));
    }
    out
}
