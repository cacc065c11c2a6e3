use std::borrow::Cow;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::scoring::format_elapsed;
use crate::session::QuizSession;

use super::render_controls;

/// Columns taken by the marker, the number and the padding of a row.
const ROW_PREFIX_WIDTH: usize = 8;
const MIN_PREVIEW_WIDTH: usize = 12;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(quiz) = app.quiz() else {
        return;
    };
    let percent = accuracy(quiz);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], app, quiz, percent);
    render_question_breakdown(frame, chunks[2], quiz, app.result_scroll());

    let controls = if quiz.is_saved() {
        "j/k scroll  ·  v ranking  ·  r retry  ·  esc menu"
    } else {
        "j/k scroll  ·  s save score  ·  v ranking  ·  r retry  ·  esc menu"
    };
    render_controls(frame, chunks[3], controls);
}

/// Whole-number share of correct answers.
fn accuracy(quiz: &QuizSession) -> u32 {
    match quiz.total_questions() {
        0 => 0,
        total => quiz.score() * 100 / total as u32,
    }
}

/// Verdict line under the score.
fn verdict(percent: u32) -> (&'static str, Color) {
    match percent {
        100.. => ("Perfect score!", Color::Green),
        80..=99 => ("Well done", Color::Green),
        50..=79 => ("Almost there", Color::Yellow),
        _ => ("Review the concept and try again", Color::Red),
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, app: &App, quiz: &QuizSession, percent: u32) {
    let (verdict, color) = verdict(percent);
    let player = app
        .session()
        .selection()
        .map(|s| format!("{} · {}", s.name, s.topic.topic()))
        .unwrap_or_default();

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(player, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}  ({}%)", quiz.score_line(), percent),
            Style::default().fg(color).bold(),
        )),
        Line::from(vec![
            Span::styled(verdict, Style::default().fg(color)),
            Span::styled(
                format!("  ·  {}", format_elapsed(quiz.elapsed_seconds())),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, quiz: &QuizSession, scroll: usize) {
    let width = (area.width as usize)
        .saturating_sub(ROW_PREFIX_WIDTH)
        .max(MIN_PREVIEW_WIDTH);
    let lines: Vec<Line> = quiz
        .answers()
        .iter()
        .zip(quiz.questions().iter())
        .enumerate()
        .map(|(index, (answer, question))| {
            let (symbol, color) = match (answer.choice, answer.correct) {
                (_, true) => ("+", Color::Green),
                (Some(_), false) => ("-", Color::Red),
                (None, false) => ("·", Color::DarkGray),
            };

            let preview = prompt_preview(&question.prompt, width);

            let mut spans = vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(preview.into_owned(), Style::default().fg(Color::Gray)),
            ];
            if !answer.correct {
                let expected: Vec<&str> =
                    question.correct_choices().map(|c| c.text.as_str()).collect();
                spans.push(Span::styled(
                    format!("  → {}", expected.join(", ")),
                    Style::default().fg(Color::Green),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

/// One-line form of a prompt that fits `width` columns. Line breaks in
/// the prompt become spaces; an elided tail ends in `…`.
fn prompt_preview(prompt: &str, width: usize) -> Cow<'_, str> {
    let single_line = prompt.lines().count() <= 1;
    if single_line && prompt.chars().count() <= width {
        return Cow::Borrowed(prompt);
    }

    let flat = prompt.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= width {
        return Cow::Owned(flat);
    }
    let mut cut: String = flat.chars().take(width.saturating_sub(1)).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    Cow::Owned(cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::questions;

    #[test]
    fn test_accuracy_is_whole_percent() {
        let mut quiz = QuizSession::start(questions(3), None).unwrap();
        quiz.answer(0).unwrap();
        quiz.answer(1).unwrap();
        quiz.answer(0).unwrap();
        assert_eq!(accuracy(&quiz), 66);
    }

    #[test]
    fn test_verdict_bands() {
        assert_eq!(verdict(100).0, "Perfect score!");
        assert_eq!(verdict(80).1, Color::Green);
        assert_eq!(verdict(79).0, "Almost there");
        assert_eq!(verdict(0).1, Color::Red);
    }

    #[test]
    fn test_prompt_preview() {
        assert!(matches!(prompt_preview("1/2 + 1/4 = ?", 40), Cow::Borrowed(_)));
        assert_eq!(prompt_preview("Solve\n  x + 2 = 5", 40), "Solve x + 2 = 5");

        let preview = prompt_preview("Which fraction is the largest of these", 16);
        assert_eq!(preview, "Which fraction…");
        assert_eq!(preview.chars().count(), 15);
    }
}
