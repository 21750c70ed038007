//! Theme and styling constants for the TUI.

use gsdash_proto::TaskState;
use ratatui::style::{Color, Modifier, Style};

use crate::notice::NoticeLevel;

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

pub const SUCCESS: Color = Color::Green;

pub const WARNING: Color = Color::Yellow;

pub const ERROR: Color = Color::Red;

/// Color of states that are neither finished nor failing.
pub const NEUTRAL: Color = Color::Blue;

/// Panel title color for the task list.
pub const TASKS_TITLE: Color = Color::Green;

/// Panel title color for the resource list.
pub const RESOURCES_TITLE: Color = Color::Blue;

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (timestamps, metadata).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (focused panel borders, active nav entry).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected row style.
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Table header style.
#[must_use]
pub fn header() -> Style {
    Style::default()
        .fg(FG_SECONDARY)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Style for timestamps (dark gray).
#[must_use]
pub fn timestamp() -> Style {
    Style::default().fg(Color::Rgb(120, 120, 120))
}

/// Style for the input cursor (bright white, bold).
#[must_use]
pub fn input_cursor() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for the status bar background (dark background with white foreground).
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Style for panel titles with a given color (bold).
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Color for a task state label.
#[must_use]
pub const fn state_color(state: Option<&TaskState>) -> Color {
    match state {
        Some(TaskState::Success) => SUCCESS,
        Some(TaskState::Failed) => ERROR,
        Some(TaskState::Running) => HIGHLIGHT,
        Some(TaskState::Pending | TaskState::Idle) => NEUTRAL,
        Some(TaskState::Cancelled) => WARNING,
        Some(TaskState::Unknown(_)) | None => FG_SECONDARY,
    }
}

/// Border color of a notice overlay.
#[must_use]
pub const fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Success => SUCCESS,
        NoticeLevel::Failure => ERROR,
    }
}
