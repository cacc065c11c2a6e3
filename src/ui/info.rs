use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::InfoPage;

use super::{render_controls, title_line};

pub const CONTACT_EMAIL: &str = "mathkey77@gmail.com";

fn title(page: InfoPage) -> &'static str {
    match page {
        InfoPage::About => "About",
        InfoPage::Contact => "Contact",
        InfoPage::Privacy => "Privacy Policy",
    }
}

fn body(page: InfoPage) -> Vec<String> {
    match page {
        InfoPage::About => vec![
            "What is Math Physical?".to_string(),
            String::new(),
            "A \"math physical\" measurement service that trains mathematical \
             thinking and calculation speed at the same time."
                .to_string(),
            "Beyond repeating drills, it helps build an exact grasp of concepts \
             together with fast intuition."
                .to_string(),
        ],
        InfoPage::Contact => vec![
            "Contact Us".to_string(),
            String::new(),
            "If something is inconvenient or you have a suggestion, reach us at:"
                .to_string(),
            String::new(),
            format!("Email: {CONTACT_EMAIL}"),
        ],
        InfoPage::Privacy => vec![
            "Privacy Policy".to_string(),
            String::new(),
            "1. No account is needed. Apart from the nickname entered when a score \
             is saved to the ranking, no personal data is collected."
                .to_string(),
            "2. Saved records are used only to improve the service and for \
             statistics."
                .to_string(),
        ],
    }
}

pub fn render(frame: &mut Frame, area: Rect, page: InfoPage) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let heading = Paragraph::new(vec![
        title_line(),
        Line::from(Span::styled(title(page), Style::default().fg(Color::White).bold())),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(heading, chunks[0]);

    let lines: Vec<Line> = body(page).into_iter().map(Line::from).collect();
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .fg(Color::Gray)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .padding(Padding::uniform(1)),
        );
    frame.render_widget(widget, chunks[1]);

    render_controls(frame, chunks[2], "esc back");
}
