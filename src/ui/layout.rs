//! Layout components (sidebar, status bar)

use super::components::{render_sidebar_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::router::Route;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Sidebar entries: shortcut and label
const SIDEBAR_ITEMS: &[(&str, &str)] = &[("1", "Rotations"), ("2", "Heartbeats")];

/// Split the screen into sidebar and main content, leaving the last row for the status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(18), Constraint::Min(0)])
        .split(rows[0]);

    (columns[0], columns[1])
}

pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(SIDEBAR_ITEMS.iter().map(|_| Constraint::Length(BUTTON_HEIGHT)));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let selected = match app.state.current_route {
        Route::Rotations | Route::RotationDetail(_) => Some(0),
        Route::HeartbeatMonitors => Some(1),
        Route::NotFound(_) => None,
    };
    for (idx, (key, label)) in SIDEBAR_ITEMS.iter().enumerate() {
        let is_selected = selected == Some(idx);
        render_sidebar_button(frame, chunks[idx + 1], key, label, is_selected);
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    // Session status
    let session = &app.context.session;
    let indicator = match (session.is_ready(), session.is_admin()) {
        (false, _) => Span::styled(" ○ ", Style::default().fg(Color::Yellow)),
        (true, true) => Span::styled(" ● admin ", Style::default().fg(Color::Green)),
        (true, false) => Span::styled(" ● ", Style::default().fg(Color::Green)),
    };
    spans.push(indicator);

    spans.push(Span::styled(
        view_hints(app),
        Style::default().fg(Color::Gray),
    ));

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);
}

/// Keyboard hints for what's on screen
fn view_hints(app: &App) -> String {
    if app.open_dialog().is_some() {
        return "Tab:next  Enter/^S:save  Esc:cancel".to_string();
    }
    if !app.context.session.is_ready() {
        return "r:retry session  q:quit".to_string();
    }
    match &app.state.current_route {
        Route::Rotations | Route::HeartbeatMonitors => {
            "j/k:nav  Enter:open  m:more  r:reload  f:favorites  n:new  L:logout  q:quit"
                .to_string()
        }
        Route::RotationDetail(_) => "Esc:back  L:logout  q:quit".to_string(),
        Route::NotFound(_) => "1/2:go home  Esc:back  q:quit".to_string(),
    }
}
