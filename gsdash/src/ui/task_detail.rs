//! Detail pane for the highlighted task.
//!
//! Shows what the table row has no room for: the best parameter set, per
//! parameter errors and the errors raised by failing subtasks.

use gsdash_proto::TaskRecord;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme;

/// Rows the pane takes below the task table.
pub const HEIGHT: u16 = 10;

/// Render the detail pane for `task`.
pub fn render(frame: &mut Frame, area: Rect, task: &TaskRecord) {
    let block = Block::default()
        .title(Span::styled(
            format!("Task {}", task.task_id),
            theme::panel_title(theme::TASKS_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(theme::normal());

    let paragraph = Paragraph::new(detail_lines(task))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Lines describing `task`, one field per line and one line per runtime
/// error.
#[must_use]
pub fn detail_lines(task: &TaskRecord) -> Vec<Line<'static>> {
    let mut lines = vec![
        field("Updated", task.actualize_date.clone().unwrap_or_else(dash)),
        field("Best params", json_or_dash(task.best_params.as_ref())),
    ];
    if let Some(errors) = &task.param_errors {
        lines.push(field("Param errors", errors.to_string()));
    }

    if task.runtime_errors.is_empty() {
        lines.push(field("Runtime errors", "none".to_string()));
    } else {
        lines.push(Line::from(Span::styled("Runtime errors:", theme::dimmed())));
        lines.extend(task.runtime_errors.iter().map(|err| {
            Line::from(Span::styled(
                format!("  {}: {}", err.ex_type, err.ex_message),
                theme::normal().fg(theme::ERROR),
            ))
        }));
    }
    lines
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), theme::dimmed()),
        Span::styled(value, theme::normal()),
    ])
}

fn dash() -> String {
    "-".to_string()
}

fn json_or_dash(value: Option<&serde_json::Value>) -> String {
    value.map_or_else(dash, ToString::to_string)
}
