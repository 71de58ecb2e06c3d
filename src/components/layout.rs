//! Layout calculations for the UI

use crate::model::Step;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Vertical areas shared by every wizard view
pub struct ViewLayout {
    pub header: Rect,
    pub body: Rect,
    pub help: Rect,
}

/// Split a view into header, body, and help bar
pub fn view_layout(area: Rect) -> ViewLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    ViewLayout {
        header: chunks[0],
        body: chunks[1],
        help: chunks[2],
    }
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = (area.width.saturating_sub(width)) / 2;
    let popup_y = (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Draw the wizard header: app title plus a step indicator
pub fn draw_header(frame: &mut Frame, area: Rect, step: Step) {
    let markers: Vec<Span> = (1..=3)
        .flat_map(|n| {
            let style = if n == step.number() {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if n < step.number() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            vec![Span::styled(format!(" {} ", n), style)]
        })
        .collect();

    let mut title_line = vec![Span::styled(
        " Sheet Insight Wizard ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    title_line.push(Span::raw("  "));
    title_line.extend(markers);

    let step_line = Line::from(vec![Span::styled(
        format!("Step {} of 3: {}", step.number(), step.title()),
        Style::default().fg(Color::DarkGray),
    )]);

    let header = Paragraph::new(vec![Line::from(title_line), step_line])
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

/// Draw a one-line help bar with key hints
pub fn draw_help_bar(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(
            format!(" {} ", key),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!("{}  ", label)));
    }

    let help = Paragraph::new(Line::from(spans))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
