//! Task table rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use super::theme;
use crate::app::{App, Focus};

/// Marker shown on rows that can be cancelled.
const CANCEL_MARKER: &str = "[c]ancel";

/// Render the task table for the current page.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let view = &app.tasks;
    let is_focused = app.focus == Focus::Table && app.modal.is_none();

    let rows: Vec<Row> = view
        .items()
        .iter()
        .map(|task| {
            let state = task
                .state
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string);
            let score = task
                .best_score
                .map_or_else(|| "-".to_string(), |s| format!("{s:.4}"));
            let action = if task.can_cancel() {
                Span::styled(CANCEL_MARKER, theme::normal().fg(theme::WARNING))
            } else {
                Span::raw("")
            };
            Row::new(vec![
                Cell::from(task.title.clone()),
                Cell::from(Span::styled(
                    state,
                    Style::default().fg(theme::state_color(task.state.as_ref())),
                )),
                Cell::from(task.progress()),
                Cell::from(score),
                Cell::from(Span::styled(
                    task.start_time.clone().unwrap_or_default(),
                    theme::timestamp(),
                )),
                Cell::from(Span::styled(
                    task.end_time.clone().unwrap_or_default(),
                    theme::timestamp(),
                )),
                Cell::from(action),
            ])
        })
        .collect();

    let header = Row::new(["Title", "State", "Progress", "Best score", "Started", "Finished", ""])
        .style(theme::header());

    let widths = [
        Constraint::Min(16),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(20),
        Constraint::Length(20),
        Constraint::Length(9),
    ];

    let title = Line::from(vec![
        Span::styled("Tasks", theme::panel_title(theme::TASKS_TITLE)),
        Span::styled(
            page_label(view.form.committed().offset, view.items().len(), view.total()),
            theme::dimmed(),
        ),
    ]);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(theme::selected());

    let mut state = TableState::default();
    if !view.items().is_empty() {
        state.select(Some(view.selected()));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

/// ` (1-5 of 12)` style range label for a panel title.
#[must_use]
pub fn page_label(offset: u32, shown: usize, total: Option<u64>) -> String {
    if shown == 0 {
        return " (empty)".to_string();
    }
    let first = u64::from(offset) + 1;
    let last = u64::from(offset) + shown as u64;
    total.map_or_else(
        || format!(" ({first}-{last})"),
        |total| format!(" ({first}-{last} of {total})"),
    )
}
