use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, Concept};

use super::{html_to_text, render_controls};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let heading = app
        .session()
        .selection()
        .map(|s| format!("{} · {}", s.topic.course(), s.topic.topic()))
        .unwrap_or_default();
    let widget = Paragraph::new(heading).fg(Color::Cyan).bold();
    frame.render_widget(widget, chunks[0]);

    let body = match app.concept() {
        Concept::Loading => Paragraph::new("Loading concept...").fg(Color::DarkGray),
        Concept::Ready(html) => Paragraph::new(html_to_text(html)).fg(Color::White),
        Concept::Missing => Paragraph::new(vec![
            Line::from("No concept has been written for this topic yet."),
            Line::from(""),
            Line::from(Span::styled(
                "Start the quiz directly with ENTER.",
                Style::default().fg(Color::Green),
            )),
        ])
        .fg(Color::Gray),
        Concept::Failed(message) => Paragraph::new(vec![
            Line::from(Span::styled(
                "Could not load the concept.",
                Style::default().fg(Color::Red).bold(),
            )),
            Line::from(Span::styled(message.as_str(), Style::default().fg(Color::DarkGray))),
        ]),
    };

    let widget = body.wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, chunks[1]);

    render_controls(frame, chunks[2], "enter start quiz  ·  esc menu");
}
