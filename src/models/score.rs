use serde::Serialize;

/// Result of one finished attempt, as stored by the ranking service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub name: String,
    pub topic_key: String,
    pub question_count: u32,
    pub score: u32,
    pub elapsed_seconds: f64,
}

impl ScoreRecord {
    /// Elapsed time as sent to the service, two decimals.
    pub fn time_sec_param(&self) -> String {
        format!("{:.2}", self.elapsed_seconds)
    }
}
