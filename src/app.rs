//! The quiz engine: which screen is showing and what it takes to move on.
//!
//! Transitions that need the content service are split into a synchronous
//! `begin_*` step (validation, screen bookkeeping) and an async step that
//! performs the request, so the front end can draw a loading frame between
//! the two. The combined operations (`enter_concept_view`, `start_quiz`,
//! `save_score`, `view_ranking`) run both halves.

use tokio::time::Instant;

use crate::config::Config;
use crate::data::{TaxonomyCache, load_taxonomy};
use crate::error::{ServiceError, ValidationError};
use crate::models::{CourseTopicMap, Question, ScoreRecord};
use crate::ranking::{RankingScope, RankingView, present};
use crate::scoring::format_clock;
use crate::service::ContentService;
use crate::session::{QuizSession, Selection, SessionState};
use crate::timer::{Tick, TickSender, TickTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    ConceptView,
    InQuiz,
    Result,
    Ranking,
    Info(InfoPage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoPage {
    About,
    Contact,
    Privacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuField {
    Name,
    Course,
    Topic,
    Count,
}

impl MenuField {
    fn next(self) -> Self {
        match self {
            MenuField::Name => MenuField::Course,
            MenuField::Course => MenuField::Topic,
            MenuField::Topic => MenuField::Count,
            MenuField::Count => MenuField::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            MenuField::Name => MenuField::Count,
            MenuField::Course => MenuField::Name,
            MenuField::Topic => MenuField::Course,
            MenuField::Count => MenuField::Topic,
        }
    }
}

const NAME_MAX_LENGTH: usize = 20;

/// Inputs on the menu screen. Indexes point into the taxonomy and the
/// configured question counts.
#[derive(Debug, Clone)]
pub struct MenuForm {
    pub name: String,
    pub course: Option<usize>,
    pub topic: Option<usize>,
    pub count: Option<usize>,
    pub focus: MenuField,
}

/// What the concept screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Concept {
    Loading,
    Ready(String),
    /// The topic has no description; the quiz can be started directly.
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RankingState {
    Loading,
    Ready(RankingView),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// One-line message shown under the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Work that needs the content service, produced by key handling.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadConcept,
    LoadQuestions,
    SaveScore(ScoreRecord),
    LoadRanking,
}

impl Command {
    pub fn label(&self) -> &'static str {
        match self {
            Command::LoadConcept => "Loading concept...",
            Command::LoadQuestions => "Preparing questions...",
            Command::SaveScore(_) => "Saving score...",
            Command::LoadRanking => "Loading ranking...",
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub form: MenuForm,
    pub should_quit: bool,
    config: Config,
    taxonomy: CourseTopicMap,
    session: SessionState,
    concept: Concept,
    ranking: Option<(RankingScope, RankingState)>,
    notice: Option<Notice>,
    busy: Option<&'static str>,
    selected_option: usize,
    result_scroll: usize,
    clock: String,
    timer: Option<TickTask>,
    ticks: TickSender,
}

impl App {
    pub fn new(config: Config, ticks: TickSender) -> Self {
        let count = config
            .question_counts
            .iter()
            .position(|c| *c == config.default_question_count);

        Self {
            screen: Screen::Menu,
            form: MenuForm {
                name: String::new(),
                course: None,
                topic: None,
                count,
                focus: MenuField::Name,
            },
            should_quit: false,
            config,
            taxonomy: CourseTopicMap::default(),
            session: SessionState::new(),
            concept: Concept::Loading,
            ranking: None,
            notice: None,
            busy: None,
            selected_option: 0,
            result_scroll: 0,
            clock: format_clock(std::time::Duration::ZERO),
            timer: None,
            ticks,
        }
    }

    // ------------------------------------------------------------------
    // Accessors used by the renderers
    // ------------------------------------------------------------------

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn taxonomy(&self) -> &CourseTopicMap {
        &self.taxonomy
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn quiz(&self) -> Option<&QuizSession> {
        self.session.quiz()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.quiz().and_then(QuizSession::current_question)
    }

    pub fn concept(&self) -> &Concept {
        &self.concept
    }

    pub fn ranking(&self) -> Option<&(RankingScope, RankingState)> {
        self.ranking.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn busy(&self) -> Option<&'static str> {
        self.busy
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    /// Stopwatch text, `MM:SS`, or the time left when a budget applies.
    pub fn clock(&self) -> &str {
        &self.clock
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn selected_course(&self) -> Option<&str> {
        let courses = self.taxonomy.courses();
        self.form.course.and_then(|i| courses.get(i).copied())
    }

    pub fn selected_topic(&self) -> Option<&str> {
        let course = self.selected_course()?;
        let topics = self.taxonomy.topics(course);
        self.form
            .topic
            .and_then(|i| topics.get(i))
            .map(String::as_str)
    }

    pub fn selected_count(&self) -> Option<u32> {
        self.form
            .count
            .and_then(|i| self.config.question_counts.get(i).copied())
    }

    pub fn set_notice(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            text: text.into(),
        });
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    // ------------------------------------------------------------------
    // Menu
    // ------------------------------------------------------------------

    /// Loads the course list through the cache. Failure leaves the menu
    /// usable with an error notice.
    pub async fn load_taxonomy(&mut self, service: &dyn ContentService, cache: &TaxonomyCache) {
        let ttl = self.config.cache_ttl();
        match load_taxonomy(service, cache, ttl, chrono::Utc::now()).await {
            Ok(map) => self.set_taxonomy(map),
            Err(e) => {
                tracing::error!(error = %e, "failed to load course list");
                self.set_notice(NoticeKind::Error, format!("Could not load courses: {e}"));
            }
        }
    }

    pub fn set_taxonomy(&mut self, taxonomy: CourseTopicMap) {
        self.taxonomy = taxonomy;
        self.form.course = None;
        self.form.topic = None;
    }

    pub fn focus_next(&mut self) {
        self.form.focus = self.form.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.form.focus = self.form.focus.previous();
    }

    pub fn name_input_push(&mut self, c: char) {
        if self.form.name.chars().count() < NAME_MAX_LENGTH && !c.is_control() {
            self.form.name.push(c);
        }
    }

    pub fn name_input_pop(&mut self) {
        self.form.name.pop();
    }

    /// Cycles the focused selection forward (`step = 1`) or back (`-1`).
    pub fn cycle_selection(&mut self, step: isize) {
        match self.form.focus {
            MenuField::Name => {}
            MenuField::Course => {
                let len = self.taxonomy.courses().len();
                let next = cycle(self.form.course, len, step);
                if next != self.form.course {
                    self.form.course = next;
                    // Topics belong to the course.
                    self.form.topic = None;
                }
            }
            MenuField::Topic => {
                let len = self
                    .selected_course()
                    .map(|course| self.taxonomy.topics(course).len())
                    .unwrap_or(0);
                self.form.topic = cycle(self.form.topic, len, step);
            }
            MenuField::Count => {
                let len = self.config.question_counts.len();
                self.form.count = cycle(self.form.count, len, step);
            }
        }
    }

    pub fn open_info(&mut self, page: InfoPage) {
        if self.screen == Screen::Menu {
            self.clear_notice();
            self.screen = Screen::Info(page);
        }
    }

    pub fn close_info(&mut self) {
        if matches!(self.screen, Screen::Info(_)) {
            self.screen = Screen::Menu;
        }
    }

    // ------------------------------------------------------------------
    // Menu -> ConceptView
    // ------------------------------------------------------------------

    /// Validates the menu and records the selection. On error nothing
    /// changes except the notice.
    pub fn begin_concept_view(&mut self) -> Result<(), ValidationError> {
        if self.screen != Screen::Menu {
            return Err(ValidationError::MissingSelection);
        }

        let selection = Selection::from_inputs(
            &self.form.name,
            self.selected_course(),
            self.selected_topic(),
            self.selected_count(),
            self.config.default_question_count,
        );
        let selection = match selection {
            Ok(selection) => selection,
            Err(e) => {
                self.set_notice(NoticeKind::Error, e.to_string());
                return Err(e);
            }
        };

        tracing::info!(
            name = %selection.name,
            topic = %selection.topic,
            count = selection.question_count,
            "topic selected"
        );
        self.clear_notice();
        self.session.select(selection);
        self.concept = Concept::Loading;
        self.screen = Screen::ConceptView;
        Ok(())
    }

    /// Fetches the description. Never leaves the concept screen.
    pub async fn load_concept(&mut self, service: &dyn ContentService) {
        let Some(selection) = self.session.selection() else {
            return;
        };
        let topic = selection.topic.clone();

        self.concept = match service.description(&topic).await {
            Ok(Some(text)) => Concept::Ready(text),
            Ok(None) => Concept::Missing,
            Err(e) if e.is_transport() => {
                tracing::warn!(topic = %topic, error = %e, "description unavailable");
                Concept::Failed(e.to_string())
            }
            // The service answering without a concept is not a failure.
            Err(e) => {
                tracing::debug!(topic = %topic, error = %e, "no description for topic");
                Concept::Missing
            }
        };
    }

    pub async fn enter_concept_view(
        &mut self,
        service: &dyn ContentService,
    ) -> Result<(), ValidationError> {
        self.begin_concept_view()?;
        self.load_concept(service).await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // ConceptView -> InQuiz
    // ------------------------------------------------------------------

    /// Drops any running timer and the previous attempt. Requires a topic
    /// in the session; without one the engine goes back to the menu.
    pub fn begin_quiz(&mut self) -> Result<(), ValidationError> {
        self.timer = None;
        self.session.discard_quiz();
        self.selected_option = 0;
        self.result_scroll = 0;

        if self.session.selection().is_none() {
            let err = ValidationError::NoActiveTopic;
            self.screen = Screen::Menu;
            self.set_notice(NoticeKind::Error, err.to_string());
            return Err(err);
        }

        self.clear_notice();
        Ok(())
    }

    /// Fetches the question set and enters the quiz, or falls back to the
    /// menu when nothing playable came back.
    pub async fn load_questions(&mut self, service: &dyn ContentService) {
        let Some(selection) = self.session.selection() else {
            self.screen = Screen::Menu;
            return;
        };
        let topic = selection.topic.clone();
        let count = selection.question_count;

        let started = service
            .game_data(&topic, count)
            .await
            .and_then(|questions| {
                let budget = self.config.time_limit.budget_for(questions.len());
                QuizSession::start(questions, budget)
            });

        match started {
            Ok(quiz) => self.enter_quiz(quiz),
            Err(e) => self.abort_to_menu(&e),
        }
    }

    pub async fn start_quiz(&mut self, service: &dyn ContentService) -> Result<(), ValidationError> {
        self.begin_quiz()?;
        self.load_questions(service).await;
        Ok(())
    }

    fn enter_quiz(&mut self, quiz: QuizSession) {
        let attempt = quiz.attempt_id();
        tracing::info!(%attempt, questions = quiz.total_questions(), "quiz started");

        self.timer = Some(TickTask::spawn(
            attempt,
            self.config.tick_interval(),
            self.ticks.clone(),
        ));
        self.session.begin_quiz(quiz);
        self.refresh_clock(Instant::now());
        self.selected_option = 0;
        self.screen = Screen::InQuiz;
    }

    fn abort_to_menu(&mut self, error: &ServiceError) {
        tracing::error!(error = %error, "could not start quiz");
        self.timer = None;
        self.session.discard_quiz();
        self.screen = Screen::Menu;
        self.set_notice(
            NoticeKind::Error,
            format!("Could not load the questions: {error}"),
        );
    }

    // ------------------------------------------------------------------
    // InQuiz
    // ------------------------------------------------------------------

    pub fn select_next_option(&mut self) {
        let len = self.option_count();
        if len > 0 {
            self.selected_option = (self.selected_option + 1) % len;
        }
    }

    pub fn select_previous_option(&mut self) {
        let len = self.option_count();
        if len > 0 {
            self.selected_option = (self.selected_option + len - 1) % len;
        }
    }

    pub fn select_option(&mut self, index: usize) {
        if index < self.option_count() {
            self.selected_option = index;
        }
    }

    fn option_count(&self) -> usize {
        self.current_question().map_or(0, |q| q.choices.len())
    }

    pub fn submit_selected(&mut self) {
        self.submit_answer(self.selected_option);
    }

    /// Scores `choice` for the current question and advances, entering the
    /// result screen after the last question.
    pub fn submit_answer(&mut self, choice: usize) {
        self.submit_answer_at(choice, Instant::now());
    }

    /// Like `submit_answer`. An answer arriving after the time budget ran
    /// out is not scored; the quiz ends instead.
    pub fn submit_answer_at(&mut self, choice: usize, now: Instant) {
        if self.screen != Screen::InQuiz {
            return;
        }
        let Some(quiz) = self.session.quiz_mut() else {
            return;
        };
        if quiz.budget_exhausted_at(now) {
            tracing::info!(attempt = %quiz.attempt_id(), "answer after time budget ignored");
            self.finish_quiz(now);
            self.set_notice(NoticeKind::Info, "Time is up!");
            return;
        }
        let Some(outcome) = quiz.answer_at(choice, now) else {
            return;
        };

        tracing::debug!(
            index = quiz.current_index(),
            correct = outcome.correct,
            "answer submitted"
        );
        self.selected_option = 0;
        if outcome.finished {
            self.finish_quiz(now);
        }
    }

    /// Handles a stopwatch tick. Returns `false` for ticks of an attempt
    /// that is no longer running.
    pub fn on_tick(&mut self, tick: Tick) -> bool {
        self.on_tick_at(tick, Instant::now())
    }

    pub fn on_tick_at(&mut self, tick: Tick, now: Instant) -> bool {
        if self.screen != Screen::InQuiz {
            return false;
        }
        let Some(quiz) = self.session.quiz() else {
            return false;
        };
        if quiz.attempt_id() != tick.attempt || quiz.is_finished() {
            return false;
        }

        if quiz.budget_exhausted_at(now) {
            tracing::info!(attempt = %tick.attempt, "time budget exhausted");
            self.finish_quiz(now);
            self.set_notice(NoticeKind::Info, "Time is up!");
        } else {
            self.refresh_clock(now);
        }
        true
    }

    fn refresh_clock(&mut self, now: Instant) {
        let Some(quiz) = self.session.quiz() else {
            return;
        };
        self.clock = match quiz.remaining_at(now) {
            Some(left) => format!("{} left", format_clock(left)),
            None => format_clock(quiz.elapsed_at(now)),
        };
    }

    fn finish_quiz(&mut self, now: Instant) {
        self.timer = None;
        if let Some(quiz) = self.session.quiz_mut() {
            quiz.finish_at(now);
            tracing::info!(
                attempt = %quiz.attempt_id(),
                score = quiz.score(),
                total = quiz.total_questions(),
                elapsed = quiz.elapsed_seconds(),
                "quiz finished"
            );
        }
        self.result_scroll = 0;
        self.screen = Screen::Result;
    }

    // ------------------------------------------------------------------
    // Result -> Ranking
    // ------------------------------------------------------------------

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self
            .quiz()
            .map_or(0, |q| q.total_questions().saturating_sub(1));
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    fn ranking_scope(&self) -> Option<RankingScope> {
        let selection = self.session.selection()?;
        let topic = selection.topic.clone();
        Some(if self.config.per_mode_rankings {
            RankingScope::per_mode(topic, selection.question_count)
        } else {
            RankingScope::topic(topic)
        })
    }

    /// Builds the record to save for the finished attempt.
    pub fn begin_save(&mut self) -> Result<ScoreRecord, ValidationError> {
        let record = self.score_record();
        if let Err(e) = &record {
            self.set_notice(NoticeKind::Error, e.to_string());
        }
        record
    }

    fn score_record(&self) -> Result<ScoreRecord, ValidationError> {
        let quiz = self
            .session
            .quiz()
            .filter(|q| q.is_finished())
            .ok_or(ValidationError::NothingToSave)?;
        if quiz.is_saved() {
            return Err(ValidationError::AlreadySaved);
        }
        let selection = self
            .session
            .selection()
            .ok_or(ValidationError::NoActiveTopic)?;
        let scope = self.ranking_scope().ok_or(ValidationError::NoActiveTopic)?;

        Ok(ScoreRecord {
            name: selection.name.clone(),
            topic_key: scope.key(),
            question_count: selection.question_count,
            score: quiz.score(),
            elapsed_seconds: quiz.elapsed_seconds(),
        })
    }

    /// Posts `record`, then shows the ranking unless the request itself
    /// failed.
    pub async fn finish_save(&mut self, record: ScoreRecord, service: &dyn ContentService) {
        match service.save_score(&record).await {
            Ok(()) => {
                tracing::info!(name = %record.name, topic = %record.topic_key, "score saved");
                if let Some(quiz) = self.session.quiz_mut() {
                    quiz.mark_saved();
                }
                self.view_ranking(service).await;
                self.set_notice(NoticeKind::Info, "Score saved to the ranking!");
            }
            Err(e) if e.is_transport() => {
                tracing::error!(error = %e, "saving score failed");
                self.set_notice(NoticeKind::Error, format!("Could not save the score: {e}"));
            }
            Err(e) => {
                tracing::warn!(error = %e, "score save not confirmed");
                self.view_ranking(service).await;
                self.set_notice(NoticeKind::Error, format!("Save was not confirmed: {e}"));
            }
        }
    }

    pub async fn save_score(&mut self, service: &dyn ContentService) -> Result<(), ValidationError> {
        let record = self.begin_save()?;
        self.finish_save(record, service).await;
        Ok(())
    }

    /// Shows the ranking for the current topic. Failures stay on the
    /// ranking screen.
    pub async fn view_ranking(&mut self, service: &dyn ContentService) {
        let Some(scope) = self.ranking_scope() else {
            self.set_notice(NoticeKind::Error, ValidationError::NoActiveTopic.to_string());
            return;
        };

        self.clear_notice();
        self.screen = Screen::Ranking;
        self.ranking = Some((scope.clone(), RankingState::Loading));

        let state = match service.rankings(&scope).await {
            Ok(records) => RankingState::Ready(present(records, self.config.ranking_limit)),
            Err(e) => {
                tracing::warn!(scope = %scope.key(), error = %e, "ranking unavailable");
                RankingState::Failed(e.to_string())
            }
        };
        self.ranking = Some((scope, state));
    }

    pub fn back_to_result(&mut self) {
        if self.screen != Screen::Ranking {
            return;
        }
        self.clear_notice();
        self.screen = if self.quiz().is_some_and(QuizSession::is_finished) {
            Screen::Result
        } else {
            Screen::Menu
        };
    }

    // ------------------------------------------------------------------
    // Any -> Menu
    // ------------------------------------------------------------------

    /// Stops the timer and forgets the topic and quiz. The name, the menu
    /// inputs and the course list stay.
    pub fn return_to_menu(&mut self) {
        self.timer = None;
        self.session.clear();
        self.concept = Concept::Loading;
        self.ranking = None;
        self.busy = None;
        self.selected_option = 0;
        self.result_scroll = 0;
        self.clock = format_clock(std::time::Duration::ZERO);
        self.clear_notice();
        self.screen = Screen::Menu;
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn set_busy(&mut self, label: &'static str) {
        self.busy = Some(label);
    }

    pub fn clear_busy(&mut self) {
        self.busy = None;
    }

    pub async fn execute(&mut self, command: Command, service: &dyn ContentService) {
        match command {
            Command::LoadConcept => self.load_concept(service).await,
            Command::LoadQuestions => self.load_questions(service).await,
            Command::SaveScore(record) => self.finish_save(record, service).await,
            Command::LoadRanking => self.view_ranking(service).await,
        }
        self.busy = None;
    }
}

fn cycle(current: Option<usize>, len: usize, step: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let next = match current {
        None if step >= 0 => 0,
        None => len - 1,
        Some(i) => (i as isize + step).rem_euclid(len as isize) as usize,
    };
    Some(next)
}
