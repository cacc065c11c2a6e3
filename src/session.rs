//! Session state: who is playing, what they picked, and the quiz in progress.

use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::error::{ServiceError, ValidationError};
use crate::models::{Question, TopicKey};
use crate::scoring::{Stopwatch, elapsed_seconds};

/// A validated menu choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub topic: TopicKey,
    pub question_count: u32,
}

impl Selection {
    /// Checks the menu inputs in the order the user fills them in.
    pub fn from_inputs(
        name: &str,
        course: Option<&str>,
        topic: Option<&str>,
        question_count: Option<u32>,
        default_count: u32,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let (Some(course), Some(topic)) = (course, topic) else {
            return Err(ValidationError::MissingSelection);
        };

        Ok(Self {
            name: name.to_string(),
            topic: TopicKey::new(course, topic)?,
            question_count: question_count.filter(|c| *c > 0).unwrap_or(default_count),
        })
    }
}

/// How one question was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerRecord {
    /// `None` when the time budget ran out first.
    pub choice: Option<usize>,
    pub correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub finished: bool,
}

/// One attempt at a question set.
#[derive(Debug)]
pub struct QuizSession {
    attempt_id: Uuid,
    questions: Vec<Question>,
    current_index: usize,
    score: u32,
    answers: Vec<AnswerRecord>,
    stopwatch: Stopwatch,
    time_budget: Option<Duration>,
    saved: bool,
}

impl QuizSession {
    /// Starts the clock on `questions`. An empty set cannot be played.
    pub fn start(questions: Vec<Question>, time_budget: Option<Duration>) -> Result<Self, ServiceError> {
        Self::start_at(questions, time_budget, Instant::now())
    }

    pub fn start_at(
        questions: Vec<Question>,
        time_budget: Option<Duration>,
        now: Instant,
    ) -> Result<Self, ServiceError> {
        if questions.is_empty() {
            return Err(ServiceError::data_shape("the question set is empty"));
        }

        Ok(Self {
            attempt_id: Uuid::new_v4(),
            answers: Vec::with_capacity(questions.len()),
            questions,
            current_index: 0,
            score: 0,
            stopwatch: Stopwatch::started_at(now),
            time_budget,
            saved: false,
        })
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.is_finished() {
            return None;
        }
        self.questions.get(self.current_index)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// `"<score> / <total>"`
    pub fn score_line(&self) -> String {
        format!("{} / {}", self.score, self.total_questions())
    }

    pub fn is_finished(&self) -> bool {
        self.stopwatch.is_stopped()
    }

    /// Records `choice` for the current question and moves on. Ignored once
    /// finished or when `choice` is not one of the question's options.
    pub fn answer(&mut self, choice: usize) -> Option<AnswerOutcome> {
        self.answer_at(choice, Instant::now())
    }

    pub fn answer_at(&mut self, choice: usize, now: Instant) -> Option<AnswerOutcome> {
        if self.budget_exhausted_at(now) {
            return None;
        }
        let question = self.current_question()?;
        if choice >= question.choices.len() {
            return None;
        }

        let correct = question.is_correct(choice);
        self.answers.push(AnswerRecord {
            choice: Some(choice),
            correct,
        });
        if correct {
            self.score += 1;
        }
        self.current_index += 1;

        let finished = self.current_index >= self.questions.len();
        if finished {
            self.stopwatch.stop_at(now);
        }
        Some(AnswerOutcome { correct, finished })
    }

    /// Ends the attempt now. Unanswered questions count as wrong.
    pub fn finish_at(&mut self, now: Instant) {
        if self.is_finished() {
            return;
        }
        self.stopwatch.stop_at(now);
        while self.answers.len() < self.questions.len() {
            self.answers.push(AnswerRecord {
                choice: None,
                correct: false,
            });
        }
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.stopwatch.elapsed_at(now)
    }

    /// Final elapsed seconds. Only meaningful once finished.
    pub fn elapsed_seconds(&self) -> f64 {
        elapsed_seconds(self.stopwatch.elapsed())
    }

    /// Time left on the budget, if the attempt has one.
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        self.time_budget
            .map(|budget| budget.saturating_sub(self.elapsed_at(now)))
    }

    pub fn budget_exhausted_at(&self, now: Instant) -> bool {
        self.remaining_at(now).is_some_and(|left| left.is_zero())
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn mark_saved(&mut self) {
        self.saved = true;
    }
}

/// Everything the engine knows about the current player.
#[derive(Debug, Default)]
pub struct SessionState {
    selection: Option<Selection>,
    quiz: Option<QuizSession>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
        self.quiz = None;
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn begin_quiz(&mut self, quiz: QuizSession) {
        self.quiz = Some(quiz);
    }

    pub fn discard_quiz(&mut self) {
        self.quiz = None;
    }

    pub fn quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    pub fn quiz_mut(&mut self) -> Option<&mut QuizSession> {
        self.quiz.as_mut()
    }

    /// Forgets the topic and the quiz.
    pub fn clear(&mut self) {
        self.selection = None;
        self.quiz = None;
    }
}
