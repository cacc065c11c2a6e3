use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{App, RankingState};
use crate::ranking::{Medal, RankedEntry, RankingView};
use crate::scoring::format_elapsed;

use super::render_controls;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let Some((scope, state)) = app.ranking() else {
        return;
    };

    let heading = Line::from(vec![
        Span::styled("RANKING  ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(scope.label(), Style::default().fg(Color::White)),
    ]);
    frame.render_widget(Paragraph::new(heading), chunks[0]);

    let lines = match state {
        RankingState::Loading => vec![message_line("Loading ranking...", Color::DarkGray)],
        RankingState::Failed(message) => vec![
            message_line("Could not load the ranking.", Color::Red),
            message_line(message, Color::DarkGray),
        ],
        RankingState::Ready(RankingView::Empty) => {
            vec![message_line("No scores yet. Be the first!", Color::DarkGray)]
        }
        RankingState::Ready(RankingView::Ranked(entries)) => {
            let mut lines = vec![header_line()];
            lines.extend(entries.iter().map(entry_line));
            lines
        }
    };

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, chunks[1]);

    render_controls(frame, chunks[2], "b back to result  ·  esc menu");
}

fn message_line(text: &str, color: Color) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(color)))
}

fn header_line() -> Line<'static> {
    Line::from(Span::styled(
        format!("{:>4}  {:<16}{:>8}{:>10}", "#", "NAME", "SCORE", "TIME"),
        Style::default().fg(Color::DarkGray),
    ))
}

fn medal_color(medal: Option<Medal>) -> Color {
    match medal {
        Some(Medal::Gold) => Color::Yellow,
        Some(Medal::Silver) => Color::Gray,
        Some(Medal::Bronze) => Color::Rgb(205, 127, 50),
        None => Color::White,
    }
}

fn entry_line(entry: &RankedEntry) -> Line<'static> {
    let color = medal_color(entry.medal);
    let badge = entry.medal.map_or(" ", |m| m.badge());
    let record = &entry.record;

    Line::from(vec![
        Span::styled(format!("{badge} "), Style::default().fg(color)),
        Span::styled(format!("{:>2}  ", entry.rank), Style::default().fg(color).bold()),
        Span::styled(format!("{:<16}", record.name), Style::default().fg(Color::White)),
        Span::styled(
            format!("{:>8}", format!("{}/{}", record.score, record.question_count)),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("{:>10}", format_elapsed(record.elapsed_seconds)),
            Style::default().fg(Color::Yellow),
        ),
    ])
}
