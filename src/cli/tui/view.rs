//! Study screen layout

use rand::Rng;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use super::app::{App, Focus};
use crate::domain::{markup, Connector};
use crate::storage::DeckService;

pub fn draw<S: DeckService, R: Rng>(frame: &mut Frame, app: &App<S, R>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Available tags
            Constraint::Length(3), // Current filter
            Constraint::Min(6),    // Card
            Constraint::Length(3), // Progress
            Constraint::Length(1), // Status / help
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_tags(frame, app, chunks[1]);
    draw_filter(frame, app, chunks[2]);
    draw_card(frame, app, chunks[3]);
    draw_progress(frame, app, chunks[4]);
    draw_status_bar(frame, app, chunks[5]);
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border)
}

fn draw_header<S: DeckService, R: Rng>(frame: &mut Frame, app: &App<S, R>, area: Rect) {
    let header = Line::from(vec![
        Span::styled("flashdeck", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" - "),
        Span::raw(app.deck().name.as_str()),
        Span::styled(
            format!("  ({} cards)", app.engine().cards().len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn draw_tags<S: DeckService, R: Rng>(frame: &mut Frame, app: &App<S, R>, area: Rect) {
    let focused = app.focus() == Focus::Tags;
    let expression = app.engine().expression();
    let available = app.engine().available_tags();

    let mut spans = Vec::new();
    for (i, tag) in app.tag_bar().into_iter().enumerate() {
        // Selected tags no card carries any more stay listed so they can be removed
        let mut style = if !available.contains(&tag) {
            Style::default().fg(Color::Red).add_modifier(Modifier::CROSSED_OUT)
        } else if expression.contains(&tag) {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        if focused && i == app.tag_index() {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(format!(" {} ", tag), style));
        spans.push(Span::raw(" "));
    }

    let paragraph = if spans.is_empty() {
        Paragraph::new("No tags in this deck")
    } else {
        Paragraph::new(Line::from(spans))
    };
    frame.render_widget(paragraph.block(panel("Tags", focused)), area);
}

fn draw_filter<S: DeckService, R: Rng>(frame: &mut Frame, app: &App<S, R>, area: Rect) {
    let focused = app.focus() == Focus::Connectors;
    let expression = app.engine().expression();

    let mut spans = Vec::new();
    for (i, tag) in expression.tags().iter().enumerate() {
        if i > 0 {
            let connector = expression.connectors()[i - 1];
            let mut style = match connector {
                Connector::And => Style::default().fg(Color::Magenta),
                Connector::Or => Style::default().fg(Color::Yellow),
            };
            if focused && i - 1 == app.connector_index() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!("[{}]", connector), style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::raw(tag.as_str()));
    }
    if spans.is_empty() {
        spans.push(Span::styled("(all cards)", Style::default().fg(Color::DarkGray)));
    }
    if app.filter_pending() {
        spans.push(Span::styled(
            "  * press f to apply",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(panel("Filter", focused));
    frame.render_widget(paragraph, area);
}

fn draw_card<S: DeckService, R: Rng>(frame: &mut Frame, app: &App<S, R>, area: Rect) {
    let focused = app.focus() == Focus::Card;

    let Some(card) = app.engine().current_card() else {
        let empty = Paragraph::new("No cards for selected tags")
            .style(Style::default().fg(Color::DarkGray))
            .block(panel("Card", focused));
        frame.render_widget(empty, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            card.question.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            card.tags.join(", "),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    if app.flipped() {
        lines.extend(markup::to_plain(&card.answer).lines().map(|l| Line::from(l.to_string())));
    } else {
        lines.push(Line::from(Span::styled(
            "(Space to reveal the answer)",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel("Card", focused));
    frame.render_widget(paragraph, area);
}

fn draw_progress<S: DeckService, R: Rng>(frame: &mut Frame, app: &App<S, R>, area: Rect) {
    let progress = app.engine().progress();
    let title = format!("Session {}", app.engine().generation());
    let gauge = Gauge::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio((progress.percentage() / 100.0).clamp(0.0, 1.0))
        .label(format!("{} of {} cards", progress.current, progress.total));
    frame.render_widget(gauge, area);
}

fn draw_status_bar<S: DeckService, R: Rng>(frame: &mut Frame, app: &App<S, R>, area: Rect) {
    let text = match app.status_message() {
        Some(message) => message.to_string(),
        None => concat!(
            "Tab focus | ←/→ select | Space toggle | f apply | ",
            "n/p card | r reload | ? help | q quit"
        )
        .to_string(),
    };
    let bar = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(bar, area);
}
