use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{CourseTopicMap, Question, ScoreRecord, TopicKey};
use crate::protocol::{RawQuestion, RawScoreRecord, decode_ack, decode_envelope, into_questions};
use crate::ranking::RankingScope;

use super::ContentService;

/// Talks to the spreadsheet web app with `GET ?action=...` requests.
pub struct HttpContentService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpContentService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ServiceResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn request(&self, action: &str, params: &[(&str, String)]) -> ServiceResult<reqwest::Request> {
        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        query.push(("action", action));
        query.extend(params.iter().map(|(key, value)| (*key, value.as_str())));

        Ok(self.client.get(&self.base_url).query(&query).build()?)
    }

    async fn call(&self, action: &str, params: &[(&str, String)]) -> ServiceResult<Value> {
        let request = self.request(action, params)?;
        tracing::debug!(action, "sending request");

        let response = self.client.execute(request).await.inspect_err(|e| {
            tracing::warn!(action, error = %e, "request failed");
        })?;

        let status = response.status();
        check_status(status).inspect_err(|_| {
            tracing::warn!(action, status = status.as_u16(), "unexpected status");
        })?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ContentService for HttpContentService {
    async fn courses_and_topics(&self) -> ServiceResult<CourseTopicMap> {
        let payload = self.call("getCoursesAndTopics", &[]).await?;
        Ok(CourseTopicMap::new(decode_envelope(payload)?))
    }

    async fn description(&self, topic: &TopicKey) -> ServiceResult<Option<String>> {
        let payload = self
            .call("getDescription", &[("topic", topic.to_string())])
            .await?;

        description_text(decode_envelope(payload)?)
    }

    async fn game_data(&self, topic: &TopicKey, count: u32) -> ServiceResult<Vec<Question>> {
        let payload = self
            .call(
                "getGameData",
                &[("sheetName", topic.to_string()), ("count", count.to_string())],
            )
            .await?;

        let raw: Vec<RawQuestion> = decode_envelope(payload)?;
        into_questions(raw)
    }

    async fn save_score(&self, record: &ScoreRecord) -> ServiceResult<()> {
        let payload = self
            .call(
                "saveScore",
                &[
                    ("name", record.name.clone()),
                    ("topic", record.topic_key.clone()),
                    ("totalQ", record.question_count.to_string()),
                    ("score", record.score.to_string()),
                    ("timeSec", record.time_sec_param()),
                ],
            )
            .await?;
        decode_ack(payload)
    }

    async fn rankings(&self, scope: &RankingScope) -> ServiceResult<Vec<ScoreRecord>> {
        let payload = self.call("getRankings", &ranking_params(scope)).await?;
        ranking_records(decode_envelope(payload)?, scope)
    }
}

fn check_status(status: reqwest::StatusCode) -> ServiceResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ServiceError::Status {
            status: status.as_u16(),
        })
    }
}

/// Blank text, `null` and `false` all mean the topic has no concept yet.
fn description_text(data: Value) -> ServiceResult<Option<String>> {
    match data {
        Value::String(text) if !text.trim().is_empty() => Ok(Some(text)),
        Value::String(_) | Value::Null | Value::Bool(false) => Ok(None),
        other => Err(ServiceError::data_shape(format!(
            "description is not text: {other}"
        ))),
    }
}

/// `qCount` is only sent for per-mode scopes.
fn ranking_params(scope: &RankingScope) -> Vec<(&'static str, String)> {
    let mut params = vec![("topic", scope.key())];
    if let Some(count) = scope.question_count() {
        params.push(("qCount", count.to_string()));
    }
    params
}

/// Rows missing a topic or count take them from the scope they were
/// requested for.
fn ranking_records(raw: Vec<RawScoreRecord>, scope: &RankingScope) -> ServiceResult<Vec<ScoreRecord>> {
    let key = scope.key();
    let default_count = scope.question_count().unwrap_or_default();
    raw.into_iter()
        .map(|row| row.into_record(&key, default_count))
        .collect()
}
