//! Submission modal overlay.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::{centered, theme};
use crate::app::{Modal, ModalField};

/// Render the add-task / add-resource form centred over `area`.
pub fn render(frame: &mut Frame, area: Rect, modal: &Modal) {
    let focused = modal.focused();
    let mut lines: Vec<Line> = Vec::new();

    for field in modal.fields() {
        let label = match field {
            ModalField::ResourceId(i) => format!("Resource {} id", i + 1),
            ModalField::ResourceAlias(i) => format!("Resource {} alias", i + 1),
            other => other.label().to_string(),
        };
        let mut value = modal.value(field).to_string();
        let style = if field == focused {
            value.push('█');
            theme::input_cursor()
        } else {
            theme::normal()
        };
        if field == ModalField::File && value.is_empty() {
            value = "(no file selected)".to_string();
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{label:>18}: "), theme::dimmed()),
            Span::styled(value, style),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Enter: submit | Tab: next field | ^N: add resource | ^D: remove resource | Esc: close",
        theme::dimmed(),
    )));

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let rect = centered(area, 90, height);

    let block = Block::default()
        .title(Span::styled(modal.title(), theme::highlighted()))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}
