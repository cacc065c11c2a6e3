use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Courses and the topics available in each, in the order the service
/// listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseTopicMap(IndexMap<String, Vec<String>>);

impl CourseTopicMap {
    /// Builds the map, dropping blank course and topic names.
    pub fn new(raw: IndexMap<String, Vec<String>>) -> Self {
        let map = raw
            .into_iter()
            .filter_map(|(course, topics)| {
                let course = course.trim().to_string();
                if course.is_empty() {
                    return None;
                }
                let topics: Vec<String> = topics
                    .into_iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
                Some((course, topics))
            })
            .collect();
        Self(map)
    }

    pub fn courses(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn topics(&self, course: &str) -> &[String] {
        self.0.get(course).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &[&str]); N]> for CourseTopicMap {
    fn from(entries: [(&str, &[&str]); N]) -> Self {
        Self::new(
            entries
                .into_iter()
                .map(|(course, topics)| {
                    (
                        course.to_string(),
                        topics.iter().map(|t| t.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}
