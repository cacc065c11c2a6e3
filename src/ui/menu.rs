use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, MenuField};

use super::{render_controls, title_line};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(15),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    let form = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(60),
        Constraint::Fill(1),
    ])
    .split(chunks[1]);

    let content = vec![
        Line::from(""),
        title_line(),
        Line::from("Train your math reflexes".fg(Color::DarkGray)),
        Line::from(""),
        field_line(app, MenuField::Name, "Name", name_value(app)),
        Line::from(""),
        field_line(app, MenuField::Course, "Course", choice_value(app.selected_course(), "select a course")),
        Line::from(""),
        field_line(app, MenuField::Topic, "Topic", choice_value(app.selected_topic(), "select a topic")),
        Line::from(""),
        field_line(app, MenuField::Count, "Questions", count_value(app)),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, form[1]);

    render_controls(
        frame,
        chunks[3],
        "tab field  ·  ←/→ change  ·  enter continue  ·  F1 about  F2 contact  F3 privacy  ·  esc quit",
    );
}

fn field_line(app: &App, field: MenuField, label: &str, value: String) -> Line<'static> {
    let focused = app.form.focus == field;
    let label_style = if focused {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let value_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let marker = if focused { "> " } else { "  " };

    Line::from(vec![
        Span::styled(format!("{marker}{label:<10}"), label_style),
        Span::styled(value, value_style),
    ])
}

fn name_value(app: &App) -> String {
    if app.form.focus == MenuField::Name {
        format!("{}_", app.form.name)
    } else if app.form.name.is_empty() {
        "-".to_string()
    } else {
        app.form.name.clone()
    }
}

fn choice_value(selected: Option<&str>, placeholder: &str) -> String {
    match selected {
        Some(value) => format!("◂ {value} ▸"),
        None => format!("◂ {placeholder} ▸"),
    }
}

fn count_value(app: &App) -> String {
    let count = app
        .selected_count()
        .unwrap_or(app.config().default_question_count);
    format!("◂ {count} ▸")
}
