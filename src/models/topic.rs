use std::fmt;

use crate::error::ValidationError;

/// Address of a question bank: `<course>topic`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicKey {
    key: String,
    course: String,
    topic: String,
}

impl TopicKey {
    pub fn new(course: &str, topic: &str) -> Result<Self, ValidationError> {
        let course = course.trim();
        let topic = topic.trim();
        if course.is_empty() || topic.is_empty() {
            return Err(ValidationError::EmptyTopicKey);
        }

        Ok(Self {
            key: format!("<{}>{}", course, topic),
            course: course.to_string(),
            topic: topic.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Key of the ranking kept per question count: `<course>topic_Q<count>`.
    pub fn ranking_key(&self, question_count: u32) -> String {
        format!("{}_Q{}", self.key, question_count)
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
