mod concept;
mod info;
mod markup;
mod menu;
mod quiz;
mod ranking;
mod result;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, NoticeKind, Screen};

pub use markup::html_to_text;

pub const TITLE: &str = "MATH PHYSICAL";

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(area);

    match app.screen {
        Screen::Menu => menu::render(frame, chunks[0], app),
        Screen::ConceptView => concept::render(frame, chunks[0], app),
        Screen::InQuiz => quiz::render(frame, chunks[0], app),
        Screen::Result => result::render(frame, chunks[0], app),
        Screen::Ranking => ranking::render(frame, chunks[0], app),
        Screen::Info(page) => info::render(frame, chunks[0], page),
    }

    render_notice(frame, chunks[1], app);

    if let Some(label) = app.busy() {
        render_busy(frame, area, label);
    }
}

fn render_notice(frame: &mut Frame, area: Rect, app: &App) {
    let Some(notice) = app.notice() else {
        return;
    };
    let color = match notice.kind {
        NoticeKind::Info => Color::Green,
        NoticeKind::Error => Color::Red,
    };
    let widget = Paragraph::new(notice.text.as_str())
        .alignment(Alignment::Center)
        .fg(color);
    frame.render_widget(widget, area);
}

fn render_busy(frame: &mut Frame, area: Rect, label: &str) {
    let width = (label.chars().count() as u16 + 6).min(area.width);
    let popup = centered(area, width, 3);

    let widget = Paragraph::new(label)
        .alignment(Alignment::Center)
        .fg(Color::Yellow)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );
    frame.render_widget(Clear, popup);
    frame.render_widget(widget, popup);
}

/// A `width` x `height` rectangle in the middle of `area`.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub(crate) fn render_controls(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

pub(crate) fn title_line() -> Line<'static> {
    Line::from(Span::styled(
        TITLE,
        Style::default().fg(Color::Cyan).bold(),
    ))
}
