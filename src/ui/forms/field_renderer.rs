//! Field rendering for bound forms

use crate::state::FieldEntry;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows a field needs: bordered input plus one line per error
pub fn field_height(entry: &FieldEntry) -> u16 {
    let input = if entry.spec.is_multiline { 5 } else { 3 };
    input + entry.errors.len() as u16
}

/// Draw one field with its label and any errors under it
pub fn draw_field(frame: &mut Frame, area: Rect, entry: &FieldEntry, label: &str, is_active: bool) {
    let has_errors = !entry.errors.is_empty();
    let accent = match (is_active, has_errors) {
        (_, true) => Color::Red,
        (true, false) => Color::Cyan,
        (false, false) => Color::DarkGray,
    };

    let display = entry.value.display_value();
    let display = if display.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        display
    };
    let cursor = if is_active { "▌" } else { "" };

    let mut lines: Vec<Line> = if entry.spec.is_multiline {
        display.lines().map(|l| Line::from(l.to_string())).collect()
    } else {
        vec![Line::from(display)]
    };
    if is_active {
        match lines.last_mut() {
            Some(last) if !entry.value.display_value().ends_with('\n') => {
                last.spans.push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
            }
            _ => lines.push(Line::from(Span::styled(
                cursor,
                Style::default().fg(Color::Cyan),
            ))),
        }
    }

    let input_height = area.height.saturating_sub(entry.errors.len() as u16);
    let input_area = Rect {
        height: input_height,
        ..area
    };
    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        input_area,
    );

    for (i, error) in entry.errors.iter().enumerate() {
        let row = Rect {
            y: area.y + input_height + i as u16,
            height: 1,
            ..area
        };
        frame.render_widget(
            Paragraph::new(format!(" {}", error.message)).style(Style::default().fg(Color::Red)),
            row,
        );
    }
}
