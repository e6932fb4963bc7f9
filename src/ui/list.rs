//! List screens rendered from a presenter

use crate::app::App;
use crate::state::{ListKind, ListPresenter};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App, list: ListKind) {
    let presenter = app.screen(list).presenter(&app.context);
    let title = format!(" {} ", app.state.current_route.title());

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if !app.context.session.is_ready() {
        let content = Paragraph::new("Waiting for session...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(content, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(block.inner(area));
    frame.render_widget(block, area);

    frame.render_widget(header(&presenter), chunks[0]);

    if presenter.is_empty() {
        let message = if presenter.is_loading() {
            "Loading..."
        } else if presenter.error_message().is_some() {
            "Nothing loaded."
        } else {
            "No results."
        };
        frame.render_widget(
            Paragraph::new(message).style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );
    } else {
        draw_items(frame, chunks[1], &presenter, app.state.selected_index);
    }

    frame.render_widget(footer(&presenter), chunks[2]);
}

/// Error banner or create affordance
fn header<'a>(presenter: &'a ListPresenter<'a>) -> Paragraph<'a> {
    if let Some(error) = presenter.error_message() {
        let mut spans = vec![Span::styled(error, Style::default().fg(Color::Red))];
        if presenter.can_retry() {
            spans.push(Span::styled("  [r]etry", Style::default().fg(Color::DarkGray)));
        }
        return Paragraph::new(Line::from(spans));
    }
    match presenter.create_label() {
        Some(label) => Paragraph::new(Line::from(vec![
            Span::styled("[n] ", Style::default().fg(Color::Cyan)),
            Span::styled(format!("Create {label}"), Style::default().fg(Color::Cyan)),
        ])),
        None => Paragraph::new(""),
    }
}

fn footer<'a>(presenter: &ListPresenter<'a>) -> Paragraph<'a> {
    let text = if presenter.is_loading() && !presenter.is_empty() {
        "Loading...".to_string()
    } else if presenter.can_load_more() {
        format!("{} shown  [m] load more", presenter.len())
    } else {
        format!("{} shown", presenter.len())
    };
    Paragraph::new(text).style(Style::default().fg(Color::DarkGray))
}

fn draw_items(frame: &mut Frame, area: Rect, presenter: &ListPresenter, selected: usize) {
    let items: Vec<ListItem> = presenter
        .items()
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let is_selected = idx == selected;
            let prefix = if is_selected { "▸" } else { " " };
            let star = if item.is_favorite { "★ " } else { "  " };
            let title_style = if is_selected {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let mut line = vec![
                Span::raw(prefix),
                Span::styled(star, Style::default().fg(Color::Yellow)),
                Span::styled(item.title, title_style),
            ];
            if !item.sub_text.is_empty() {
                line.push(Span::raw("  "));
                line.push(Span::styled(item.sub_text, Style::default().fg(Color::DarkGray)));
            }
            ListItem::new(Line::from(line))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(List::new(items), area, &mut state);
}
