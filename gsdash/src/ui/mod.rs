//! Terminal UI rendering.

pub mod filter_bar;
pub mod modal;
pub mod nav_bar;
pub mod notice;
pub mod resource_table;
pub mod status_bar;
pub mod task_detail;
pub mod task_table;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
};

use crate::app::App;
use crate::route::Route;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    // Nav bar, filter bar, list, status bar from top to bottom.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    nav_bar::render(frame, chunks[0], app);
    filter_bar::render(frame, chunks[1], app);
    match app.route() {
        Route::Tasks => match app.tasks.selected_item().filter(|_| app.show_detail) {
            Some(task) => {
                let [table, detail] = Layout::vertical([
                    Constraint::Min(3),
                    Constraint::Length(task_detail::HEIGHT),
                ])
                .areas(chunks[2]);
                task_table::render(frame, table, app);
                task_detail::render(frame, detail, task);
            }
            None => task_table::render(frame, chunks[2], app),
        },
        Route::Resources => resource_table::render(frame, chunks[2], app),
    }
    status_bar::render(frame, chunks[3], app);

    // Overlays: the notice sits above the modal it may refer to.
    if let Some(modal) = &app.modal {
        modal::render(frame, frame.area(), modal);
    }
    if let Some(notice) = app.current_notice() {
        notice::render(frame, frame.area(), notice);
    }
}

/// A rectangle of the given size centred in `area`, clamped to it.
#[must_use]
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
