use ratatui::{
    prelude::*,
    widgets::{Gauge, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::Choice;

use super::render_controls;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let (Some(quiz), Some(question)) = (app.quiz(), app.current_question()) else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    let header = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(chunks[0]);
    let progress = format!("{}/{}", quiz.current_index() + 1, quiz.total_questions());
    frame.render_widget(Paragraph::new(progress).fg(Color::DarkGray), header[0]);
    frame.render_widget(
        Paragraph::new(app.clock())
            .alignment(Alignment::Right)
            .fg(Color::Yellow)
            .bold(),
        header[1],
    );

    let ratio = quiz.current_index() as f64 / quiz.total_questions().max(1) as f64;
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(ratio.clamp(0.0, 1.0))
        .label("");
    frame.render_widget(gauge, chunks[1]);

    let widget = Paragraph::new(question.prompt.as_str())
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, chunks[3]);

    render_options(frame, chunks[4], &question.choices, app.selected_option());
    render_controls(
        frame,
        chunks[5],
        "j/k navigate  ·  enter select  ·  1-9 answer  ·  esc menu",
    );
}

fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .map_or('?', char::from)
}

fn render_options(frame: &mut Frame, area: Rect, choices: &[Choice], selected: usize) {
    let mut lines: Vec<Line> = Vec::with_capacity(choices.len() * 2);

    for (index, choice) in choices.iter().enumerate() {
        let is_selected = index == selected;
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", option_label(index)), style),
            Span::styled(choice.text.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
