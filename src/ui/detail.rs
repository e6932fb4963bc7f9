//! Rotation detail and not-found views

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_rotation(frame: &mut Frame, area: Rect, app: &App, id: &str) {
    let block = Block::default()
        .title(" Rotation ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(node) = app.rotations.controller.node(id) else {
        let content = Paragraph::new(format!("Rotation {id} is not loaded."))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(content, area);
        return;
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            node.text("name"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            if node.is_favorite { "  ★" } else { "" },
            Style::default().fg(Color::Yellow),
        ),
    ])];
    lines.push(Line::from(""));
    lines.extend(node.text("description").lines().map(Line::from));

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(content, area);
}

pub fn draw_not_found(frame: &mut Frame, area: Rect, path: &str) {
    let lines = vec![
        Line::from(Span::styled(
            "Sorry, the page you were trying to reach could not be found.",
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(path, Style::default().fg(Color::DarkGray))),
    ];
    let content = Paragraph::new(lines).block(
        Block::default()
            .title(" Not Found ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(content, area);
}
