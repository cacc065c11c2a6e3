//! Client side of the remote content service.
//!
//! The service owns the question banks, concept descriptions and rankings.
//! Everything goes through [`ContentService`] so the engine can be driven
//! by the HTTP client or by an in-memory fake.

mod http;

use async_trait::async_trait;

use crate::error::ServiceResult;
use crate::models::{CourseTopicMap, Question, ScoreRecord, TopicKey};
use crate::ranking::RankingScope;

pub use http::HttpContentService;

#[async_trait]
pub trait ContentService: Send + Sync {
    /// `getCoursesAndTopics`
    async fn courses_and_topics(&self) -> ServiceResult<CourseTopicMap>;

    /// `getDescription`. `None` when the topic has no concept text.
    async fn description(&self, topic: &TopicKey) -> ServiceResult<Option<String>>;

    /// `getGameData`. May return fewer questions than requested.
    async fn game_data(&self, topic: &TopicKey, count: u32) -> ServiceResult<Vec<Question>>;

    /// `saveScore`
    async fn save_score(&self, record: &ScoreRecord) -> ServiceResult<()>;

    /// `getRankings`, unsorted.
    async fn rankings(&self, scope: &RankingScope) -> ServiceResult<Vec<ScoreRecord>>;
}
