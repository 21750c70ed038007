//! Navigation bar with one entry per route.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::App;
use crate::route::Route;

/// Render the navigation bar, highlighting the active route.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(" gsdash ", theme::bold()), Span::raw("│")];
    for (idx, route) in Route::ALL.iter().enumerate() {
        let style = if route.is_active(app.current_path()) {
            theme::selected()
        } else {
            theme::dimmed()
        };
        spans.push(Span::styled(format!(" {} {} ", idx + 1, route.title()), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
