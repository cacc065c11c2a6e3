//! # math-physical
//!
//! A terminal client for the Math Physical quiz service: pick a course and
//! topic, read the concept, answer a timed question set and compare your
//! score on the topic ranking.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use math_physical::{Config, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = Config::load()?;
//!     config.validate()?;
//!     math_physical::run(config).await
//! }
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod protocol;
pub mod ranking;
pub mod scoring;
pub mod service;
pub mod session;
pub mod terminal;
pub mod timer;
mod test_utils;
mod ui;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;

pub use app::{App, Command, InfoPage, Screen};
pub use config::Config;
pub use error::{ConfigError, QuizError, ServiceError, ValidationError};
pub use service::{ContentService, HttpContentService};

/// Runs the client until the user quits.
///
/// Takes over the terminal for the duration; it is restored on return, on
/// error and on panic.
pub async fn run(config: Config) -> Result<(), QuizError> {
    let service = HttpContentService::new(config.base_url.clone(), config.request_timeout())?;
    let cache = data::TaxonomyCache::new(config.cache_path());
    let (tick_tx, mut ticks) = timer::tick_channel();
    let mut app = App::new(config, tick_tx);

    let mut terminal = terminal::init()?;

    app.set_busy("Loading courses...");
    terminal.draw(|frame| ui::render(frame, &app))?;
    app.load_taxonomy(&service, &cache).await;
    app.clear_busy();

    let mut events = EventStream::new();
    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, &app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(command) = handle_key(&mut app, key) {
                        app.set_busy(command.label());
                        terminal.draw(|frame| ui::render(frame, &app))?;
                        app.execute(command, &service).await;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(tick) = ticks.recv() => {
                app.on_tick(tick);
            }
        }
    }

    tracing::info!("quit requested");
    Ok(())
}

/// Applies a key press. Returns the service work it asks for, if any.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return None;
    }

    match app.screen {
        Screen::Menu => handle_menu_input(app, key.code),
        Screen::ConceptView => handle_concept_input(app, key.code),
        Screen::InQuiz => {
            handle_quiz_input(app, key.code);
            None
        }
        Screen::Result => handle_result_input(app, key.code),
        Screen::Ranking => {
            handle_ranking_input(app, key.code);
            None
        }
        Screen::Info(_) => {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q')
            ) {
                app.close_info();
            }
            None
        }
    }
}

fn handle_menu_input(app: &mut App, key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
        KeyCode::Left => app.cycle_selection(-1),
        KeyCode::Right => app.cycle_selection(1),
        KeyCode::F(1) => app.open_info(InfoPage::About),
        KeyCode::F(2) => app.open_info(InfoPage::Contact),
        KeyCode::F(3) => app.open_info(InfoPage::Privacy),
        KeyCode::Enter => {
            if app.begin_concept_view().is_ok() {
                return Some(Command::LoadConcept);
            }
        }
        KeyCode::Char(c) if app.form.focus == app::MenuField::Name => {
            app.clear_notice();
            app.name_input_push(c);
        }
        KeyCode::Backspace if app.form.focus == app::MenuField::Name => {
            app.clear_notice();
            app.name_input_pop();
        }
        _ => {}
    }
    None
}

fn handle_concept_input(app: &mut App, key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::Enter | KeyCode::Char(' ') => {
            if app.begin_quiz().is_ok() {
                return Some(Command::LoadQuestions);
            }
        }
        KeyCode::Esc | KeyCode::Char('m') => app.return_to_menu(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        _ => {}
    }
    None
}

fn handle_quiz_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.submit_selected(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.select_option(index);
            if app.selected_option() == index {
                app.submit_answer(index);
            }
        }
        KeyCode::Esc => app.return_to_menu(),
        _ => {}
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('s') | KeyCode::Char('S') => {
            if let Ok(record) = app.begin_save() {
                return Some(Command::SaveScore(record));
            }
        }
        KeyCode::Char('v') | KeyCode::Char('V') => return Some(Command::LoadRanking),
        KeyCode::Char('r') | KeyCode::Char('R') => {
            if app.begin_quiz().is_ok() {
                return Some(Command::LoadQuestions);
            }
        }
        KeyCode::Esc | KeyCode::Char('m') => app.return_to_menu(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        _ => {}
    }
    None
}

fn handle_ranking_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('b') | KeyCode::Backspace => app.back_to_result(),
        KeyCode::Esc | KeyCode::Char('m') => app.return_to_menu(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{FakeService, questions, sample_taxonomy};
    use crate::timer::{TickReceiver, tick_channel};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> (App, TickReceiver) {
        let (tx, rx) = tick_channel();
        let mut app = App::new(Config::default(), tx);
        app.set_taxonomy(sample_taxonomy());
        (app, rx)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, press(KeyCode::Char(c)));
        }
    }

    /// Name, then first course and first topic.
    fn fill_menu(app: &mut App) {
        type_text(app, "Alice");
        handle_key(app, press(KeyCode::Tab));
        handle_key(app, press(KeyCode::Right));
        handle_key(app, press(KeyCode::Tab));
        handle_key(app, press(KeyCode::Right));
    }

    #[test]
    fn test_typing_q_in_name_does_not_quit() {
        let (mut app, _rx) = app();
        type_text(&mut app, "Quinn");
        assert_eq!(app.form.name, "Quinn");
        assert!(!app.should_quit);

        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.form.name, "Quin");
    }

    #[test]
    fn test_enter_with_missing_fields_stays_on_menu() {
        let (mut app, _rx) = app();
        type_text(&mut app, "Alice");
        assert_eq!(handle_key(&mut app, press(KeyCode::Enter)), None);
        assert_eq!(app.screen, Screen::Menu);
    }

    #[test]
    fn test_menu_enter_requests_concept() {
        let (mut app, _rx) = app();
        fill_menu(&mut app);
        assert_eq!(app.selected_course(), Some("Elementary"));
        assert_eq!(app.selected_topic(), Some("Fractions"));

        assert_eq!(
            handle_key(&mut app, press(KeyCode::Enter)),
            Some(Command::LoadConcept)
        );
        assert_eq!(app.screen, Screen::ConceptView);
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Enter)),
            Some(Command::LoadQuestions)
        );
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let (mut app, _rx) = app();
        app.screen = Screen::Ranking;
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_info_pages_open_and_close() {
        let (mut app, _rx) = app();
        handle_key(&mut app, press(KeyCode::F(2)));
        assert_eq!(app.screen, Screen::Info(InfoPage::Contact));
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Menu);
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_full_round_through_keys() {
        let (mut app, _rx) = app();
        let service = FakeService::new().with_questions(questions(3));
        fill_menu(&mut app);
        // Question count: 10 -> 5.
        handle_key(&mut app, press(KeyCode::Tab));
        handle_key(&mut app, press(KeyCode::Left));
        assert_eq!(app.selected_count(), Some(5));

        let command = handle_key(&mut app, press(KeyCode::Enter)).unwrap();
        app.execute(command, &service).await;
        let command = handle_key(&mut app, press(KeyCode::Enter)).unwrap();
        app.execute(command, &service).await;
        assert_eq!(app.screen, Screen::InQuiz);

        handle_key(&mut app, press(KeyCode::Char('1')));
        handle_key(&mut app, press(KeyCode::Char('2')));
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Result);
        assert_eq!(app.quiz().unwrap().score_line(), "2 / 3");

        let command = handle_key(&mut app, press(KeyCode::Char('s'))).unwrap();
        assert!(matches!(command, Command::SaveScore(_)));
        app.execute(command, &service).await;
        assert_eq!(app.screen, Screen::Ranking);
        assert!(app.busy().is_none());

        handle_key(&mut app, press(KeyCode::Char('b')));
        assert_eq!(app.screen, Screen::Result);
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('s'))), None);

        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Menu);
        assert_eq!(app.form.name, "Alice");
    }
}
