//! UI module for rendering the TUI

mod components;
mod detail;
mod forms;
mod layout;
mod list;

use crate::app::App;
use crate::router::Route;
use crate::state::ListKind;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let (sidebar_area, main_area) = layout::create_layout(area);

    layout::draw_sidebar(frame, sidebar_area, app);

    match &app.state.current_route {
        Route::Rotations => list::draw(frame, main_area, app, ListKind::Rotations),
        Route::HeartbeatMonitors => list::draw(frame, main_area, app, ListKind::HeartbeatMonitors),
        Route::RotationDetail(id) => detail::draw_rotation(frame, main_area, app, id),
        Route::NotFound(path) => detail::draw_not_found(frame, main_area, path),
    }

    if let Some((_, dialog)) = app.open_dialog() {
        forms::draw_dialog(frame, main_area, dialog);
    }

    layout::draw_status_bar(frame, app);
}
