//! Create dialog overlay

mod field_renderer;

use crate::state::{Form, FormDialog};
use field_renderer::{draw_field, field_height};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Draw the open dialog centered over `area`
pub fn draw_dialog(frame: &mut Frame, area: Rect, dialog: &FormDialog) {
    let Some(form) = dialog.form() else {
        return;
    };

    let width = area.width.saturating_sub(8).min(70);
    let fields_height: u16 = form.fields().iter().map(field_height).sum();
    let errors_height = form.form_errors().len() as u16;
    let height = (fields_height + errors_height + 4).min(area.height);
    let dialog_area = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, dialog_area);
    let title = if dialog.is_submitting() {
        format!(" {} (saving...) ", form.title())
    } else {
        format!(" {} ", form.title())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let mut constraints: Vec<Constraint> = form
        .fields()
        .iter()
        .map(|entry| Constraint::Length(field_height(entry)))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (idx, entry) in form.fields().iter().enumerate() {
        let label = form
            .label(&entry.spec.name)
            .unwrap_or_else(|| entry.spec.label.clone());
        draw_field(frame, chunks[idx], entry, &label, idx == form.active_field());
    }

    if let Some(rest) = chunks.last() {
        let lines: Vec<Line> = form
            .form_errors()
            .iter()
            .map(|e| Line::from(e.as_str()))
            .collect();
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().fg(Color::Red)),
            *rest,
        );
    }
}
