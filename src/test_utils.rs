#[cfg(test)]
pub mod fixtures {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::{ServiceError, ServiceResult};
    use crate::models::{Choice, CourseTopicMap, Question, ScoreRecord, TopicKey};
    use crate::protocol::decode_envelope;
    use crate::ranking::RankingScope;
    use crate::service::ContentService;

    /// A unique path under the system temp dir.
    pub fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("math-physical-{label}-{}.json", uuid::Uuid::new_v4()))
    }

    /// A question whose first choice is the correct one.
    pub fn question(n: usize) -> Question {
        Question::new(
            format!("What is {n} + {n}?"),
            vec![
                Choice::new((n * 2).to_string(), true),
                Choice::new((n * 2 + 1).to_string(), false),
                Choice::new((n * 2 + 2).to_string(), false),
            ],
        )
    }

    pub fn questions(count: usize) -> Vec<Question> {
        (1..=count).map(question).collect()
    }

    pub fn sample_taxonomy() -> CourseTopicMap {
        CourseTopicMap::from([
            ("Elementary", &["Fractions", "Decimals"][..]),
            ("Middle", &["Equations"][..]),
        ])
    }

    fn unavailable() -> ServiceError {
        ServiceError::Status { status: 503 }
    }

    /// In-memory content service that records which actions were called.
    #[derive(Default)]
    pub struct FakeService {
        taxonomy: Option<CourseTopicMap>,
        description: Option<String>,
        fail_description: bool,
        reject_description: bool,
        questions: Vec<Question>,
        fail_questions: bool,
        rankings: Vec<ScoreRecord>,
        fail_rankings: bool,
        save: SaveOutcome,
        calls: Mutex<Vec<String>>,
        saved: Mutex<Vec<ScoreRecord>>,
        ranking_keys: Mutex<Vec<String>>,
    }

    #[derive(Default, Clone, Copy)]
    pub enum SaveOutcome {
        #[default]
        Saved,
        Rejected,
        Unreachable,
    }

    impl FakeService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_taxonomy(mut self, taxonomy: CourseTopicMap) -> Self {
            self.taxonomy = Some(taxonomy);
            self
        }

        pub fn with_description(mut self, text: &str) -> Self {
            self.description = Some(text.to_string());
            self
        }

        pub fn failing_description(mut self) -> Self {
            self.fail_description = true;
            self
        }

        /// Answers `getDescription` with `{ok: false}`.
        pub fn rejecting_description(mut self) -> Self {
            self.reject_description = true;
            self
        }

        pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
            self.questions = questions;
            self
        }

        pub fn failing_questions(mut self) -> Self {
            self.fail_questions = true;
            self
        }

        pub fn with_rankings(mut self, rankings: Vec<ScoreRecord>) -> Self {
            self.rankings = rankings;
            self
        }

        pub fn failing_rankings(mut self) -> Self {
            self.fail_rankings = true;
            self
        }

        pub fn with_save(mut self, outcome: SaveOutcome) -> Self {
            self.save = outcome;
            self
        }

        pub fn call_count(&self, action: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.as_str() == action)
                .count()
        }

        pub fn saved(&self) -> Vec<ScoreRecord> {
            self.saved.lock().unwrap().clone()
        }

        pub fn ranking_keys(&self) -> Vec<String> {
            self.ranking_keys.lock().unwrap().clone()
        }

        fn record(&self, action: &str) {
            self.calls.lock().unwrap().push(action.to_string());
        }
    }

    #[async_trait]
    impl ContentService for FakeService {
        async fn courses_and_topics(&self) -> ServiceResult<CourseTopicMap> {
            self.record("getCoursesAndTopics");
            self.taxonomy.clone().ok_or_else(unavailable)
        }

        async fn description(&self, _topic: &TopicKey) -> ServiceResult<Option<String>> {
            self.record("getDescription");
            if self.fail_description {
                return Err(unavailable());
            }
            if self.reject_description {
                return decode_envelope(serde_json::json!({
                    "ok": false,
                    "error": "no description"
                }));
            }
            Ok(self.description.clone())
        }

        async fn game_data(&self, _topic: &TopicKey, count: u32) -> ServiceResult<Vec<Question>> {
            self.record("getGameData");
            if self.fail_questions {
                return Err(unavailable());
            }
            Ok(self.questions.iter().take(count as usize).cloned().collect())
        }

        async fn save_score(&self, record: &ScoreRecord) -> ServiceResult<()> {
            self.record("saveScore");
            match self.save {
                SaveOutcome::Saved => {
                    self.saved.lock().unwrap().push(record.clone());
                    Ok(())
                }
                SaveOutcome::Rejected => Err(ServiceError::rejected("sheet is locked")),
                SaveOutcome::Unreachable => Err(unavailable()),
            }
        }

        async fn rankings(&self, scope: &RankingScope) -> ServiceResult<Vec<ScoreRecord>> {
            self.record("getRankings");
            self.ranking_keys.lock().unwrap().push(scope.key());
            if self.fail_rankings {
                return Err(unavailable());
            }
            Ok(self.rankings.clone())
        }
    }
}
