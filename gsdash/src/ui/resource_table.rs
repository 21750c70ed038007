//! Resource table rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use super::task_table::page_label;
use super::theme;
use crate::app::{App, Focus};

/// Render the resource table for the current page.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let view = &app.resources;
    let is_focused = app.focus == Focus::Table && app.modal.is_none();

    let rows: Vec<Row> = view
        .items()
        .iter()
        .map(|resource| {
            let locked = if resource.is_locked {
                Span::styled("yes", theme::normal().fg(theme::WARNING))
            } else {
                Span::styled("no", theme::dimmed())
            };
            let deleting = if resource.is_deletion_requested == Some(true) {
                Span::styled("deletion requested", theme::normal().fg(theme::ERROR))
            } else {
                Span::raw("")
            };
            Row::new(vec![
                Cell::from(Span::styled(resource.resource_id.clone(), theme::dimmed())),
                Cell::from(resource.name.clone()),
                Cell::from(locked),
                Cell::from(deleting),
            ])
        })
        .collect();

    let header = Row::new(["Id", "Name", "Locked", ""]).style(theme::header());
    let widths = [
        Constraint::Length(38),
        Constraint::Min(16),
        Constraint::Length(7),
        Constraint::Length(19),
    ];

    let title = Line::from(vec![
        Span::styled("Resources", theme::panel_title(theme::RESOURCES_TITLE)),
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
