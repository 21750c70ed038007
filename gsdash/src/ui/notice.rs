//! Blocking notice overlay.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{centered, theme};
use crate::notice::{Notice, NoticeLevel};

/// Render `notice` centred over `area`. Each line of the text is shown on
/// its own row.
pub fn render(frame: &mut Frame, area: Rect, notice: &Notice) {
    let color = theme::notice_color(notice.level);
    let mut lines: Vec<Line> = notice
        .text
        .lines()
        .map(|line| Line::from(Span::styled(line.to_string(), theme::normal())))
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Enter: OK", theme::dimmed())));

    let title = match notice.level {
        NoticeLevel::Success => "Done",
        NoticeLevel::Failure => "Failed",
    };

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let rect = centered(area, 70, height);
    let block = Block::default()
        .title(Span::styled(title, theme::panel_title(color)))
        .borders(Borders::ALL)
        .border_style(theme::normal().fg(color));

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        rect,
    );
}
