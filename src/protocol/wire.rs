//! Wire shapes returned by the content service and their conversion into
//! the internal models.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Choice, Question, ScoreRecord};
use crate::scoring::answers_match;

/// A question as sent by the service. Choices come either as plain strings
/// with a separate `answer`, or as `{text, isCorrect}` objects.
#[derive(Debug, Deserialize)]
pub struct RawQuestion {
    #[serde(default, alias = "prompt", alias = "text")]
    question: Option<String>,
    #[serde(default)]
    choices: Vec<RawChoice>,
    #[serde(default)]
    answer: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawChoice {
    Flagged {
        text: Value,
        #[serde(rename = "isCorrect")]
        is_correct: bool,
    },
    Plain(Value),
}

impl RawQuestion {
    pub fn into_question(self, index: usize) -> ServiceResult<Question> {
        let prompt = self
            .question
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ServiceError::data_shape(format!("question {} has no text", index + 1)))?;

        if self.choices.is_empty() {
            return Err(ServiceError::data_shape(format!(
                "question {} has no choices",
                index + 1
            )));
        }

        let answer = self.answer.as_ref().and_then(scalar_text);
        let mut choices = Vec::with_capacity(self.choices.len());
        for raw in self.choices {
            let choice = match raw {
                RawChoice::Flagged { text, is_correct } => Choice::new(
                    require_text(&text, index)?,
                    is_correct,
                ),
                RawChoice::Plain(value) => {
                    let text = require_text(&value, index)?;
                    let is_correct = answer
                        .as_deref()
                        .is_some_and(|answer| answers_match(&text, answer));
                    Choice::new(text, is_correct)
                }
            };
            choices.push(choice);
        }

        if !choices.iter().any(|c| c.is_correct) {
            return Err(ServiceError::data_shape(format!(
                "question {} has no correct choice",
                index + 1
            )));
        }

        Ok(Question::new(prompt, choices))
    }
}

/// Converts a whole question list, failing on the first malformed entry.
pub fn into_questions(raw: Vec<RawQuestion>) -> ServiceResult<Vec<Question>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, question)| question.into_question(index))
        .collect()
}

/// A ranking row. Sheets written by older deployments use Korean column
/// names, newer ones English keys.
#[derive(Debug, Deserialize)]
pub struct RawScoreRecord {
    #[serde(rename = "name", alias = "이름")]
    name: Value,
    #[serde(default, rename = "topicKey", alias = "topic")]
    topic_key: Option<String>,
    #[serde(rename = "score", alias = "점수")]
    score: Value,
    #[serde(
        default,
        rename = "questionCount",
        alias = "totalQ",
        alias = "문제수"
    )]
    question_count: Option<Value>,
    #[serde(rename = "elapsedSeconds", alias = "timeSec", alias = "소요시간")]
    elapsed_seconds: Value,
}

impl RawScoreRecord {
    pub fn into_record(self, default_topic: &str, default_count: u32) -> ServiceResult<ScoreRecord> {
        let name = scalar_text(&self.name)
            .ok_or_else(|| ServiceError::data_shape("ranking row without a name"))?;
        let score = as_count(&self.score)
            .ok_or_else(|| ServiceError::data_shape(format!("invalid score for {name}")))?;
        let question_count = match &self.question_count {
            Some(value) => as_count(value).ok_or_else(|| {
                ServiceError::data_shape(format!("invalid question count for {name}"))
            })?,
            None => default_count,
        };
        let elapsed_seconds = as_number(&self.elapsed_seconds)
            .filter(|secs| *secs >= 0.0)
            .ok_or_else(|| ServiceError::data_shape(format!("invalid time for {name}")))?;

        Ok(ScoreRecord {
            name,
            topic_key: self
                .topic_key
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| default_topic.to_string()),
            question_count,
            score,
            elapsed_seconds,
        })
    }
}

fn require_text(value: &Value, index: usize) -> ServiceResult<String> {
    scalar_text(value).ok_or_else(|| {
        ServiceError::data_shape(format!("question {} has an invalid choice", index + 1))
    })
}

/// Text of a string, number or boolean. Spreadsheet cells arrive as any of
/// these.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('s').trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn as_count(value: &Value) -> Option<u32> {
    let n = as_number(value)?;
    if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n as u32)
}
