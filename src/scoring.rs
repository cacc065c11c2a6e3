//! Answer normalization, elapsed time and time budgets.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// How long a quiz may run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum TimeLimit {
    /// No limit, the clock only measures.
    #[default]
    Stopwatch,
    /// The quiz ends after `seconds_per_question * question_count` seconds.
    Budget {
        #[serde(rename = "secondsPerQuestion")]
        seconds_per_question: u32,
    },
}

impl TimeLimit {
    /// Total budget for a quiz of `question_count` questions, if limited.
    pub fn budget_for(&self, question_count: usize) -> Option<Duration> {
        match *self {
            TimeLimit::Stopwatch => None,
            TimeLimit::Budget {
                seconds_per_question,
            } => Some(Duration::from_secs(
                u64::from(seconds_per_question) * question_count as u64,
            )),
        }
    }
}

/// Canonical form used to compare text answers: surrounding and internal
/// whitespace removed.
pub fn normalize_answer(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn answers_match(choice: &str, answer: &str) -> bool {
    normalize_answer(choice) == normalize_answer(answer)
}

/// Start and end instants of one attempt.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started_at: Instant,
    stopped_at: Option<Instant>,
}

impl Stopwatch {
    pub fn started_at(started_at: Instant) -> Self {
        Self {
            started_at,
            stopped_at: None,
        }
    }

    /// Freezes the end time. Later calls keep the first value.
    pub fn stop_at(&mut self, now: Instant) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(now.max(self.started_at));
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    /// Elapsed time up to `now`, or up to the stop time once stopped.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        let end = self.stopped_at.unwrap_or(now);
        end.saturating_duration_since(self.started_at)
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }
}

/// Elapsed seconds with millisecond precision.
pub fn elapsed_seconds(elapsed: Duration) -> f64 {
    elapsed.as_millis() as f64 / 1000.0
}

/// `MM:SS` clock shown while answering.
pub fn format_clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Final time shown on the result screen, e.g. `12.34s`.
pub fn format_elapsed(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}
