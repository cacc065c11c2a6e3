//! Ordering and badging of ranking rows.

use std::cmp::Ordering;

use crate::models::{ScoreRecord, TopicKey};

/// Which ranking a score belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingScope {
    topic: TopicKey,
    question_count: Option<u32>,
}

impl RankingScope {
    /// One ranking for the topic regardless of question count.
    pub fn topic(topic: TopicKey) -> Self {
        Self {
            topic,
            question_count: None,
        }
    }

    /// A separate ranking per question count.
    pub fn per_mode(topic: TopicKey, question_count: u32) -> Self {
        Self {
            topic,
            question_count: Some(question_count),
        }
    }

    /// Key sent as the `topic` parameter.
    pub fn key(&self) -> String {
        match self.question_count {
            Some(count) => self.topic.ranking_key(count),
            None => self.topic.to_string(),
        }
    }

    pub fn question_count(&self) -> Option<u32> {
        self.question_count
    }

    /// Heading shown above the table, e.g. `Fractions · 10 questions`.
    pub fn label(&self) -> String {
        match self.question_count {
            Some(count) => format!("{} · {} questions", self.topic.topic(), count),
            None => self.topic.topic().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Medal::Gold => "♛",
            Medal::Silver => "◆",
            Medal::Bronze => "●",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub rank: usize,
    pub medal: Option<Medal>,
    pub record: ScoreRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RankingView {
    /// No one has saved a score for this scope yet.
    Empty,
    Ranked(Vec<RankedEntry>),
}

/// Higher score first, then faster time.
pub fn compare_records(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.elapsed_seconds.total_cmp(&b.elapsed_seconds))
}

/// Sorts `records`, keeps the first `limit` and numbers them from 1.
/// The sort is stable, so rows that tie on both keys keep service order.
pub fn present(mut records: Vec<ScoreRecord>, limit: usize) -> RankingView {
    if records.is_empty() {
        return RankingView::Empty;
    }

    records.sort_by(compare_records);
    let entries = records
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, record)| {
            let rank = index + 1;
            RankedEntry {
                rank,
                medal: Medal::for_rank(rank),
                record,
            }
        })
        .collect();

    RankingView::Ranked(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, score: u32, elapsed_seconds: f64) -> ScoreRecord {
        ScoreRecord {
            name: name.to_string(),
            topic_key: "<Elementary>Fractions".to_string(),
            question_count: 10,
            score,
            elapsed_seconds,
        }
    }

    fn order(view: &RankingView) -> Vec<(u32, f64)> {
        match view {
            RankingView::Ranked(entries) => entries
                .iter()
                .map(|e| (e.record.score, e.record.elapsed_seconds))
                .collect(),
            RankingView::Empty => Vec::new(),
        }
    }

    #[test]
    fn test_score_then_time_ordering() {
        let view = present(
            vec![record("a", 8, 12.3), record("b", 8, 9.1), record("c", 5, 2.0)],
            10,
        );
        assert_eq!(order(&view), vec![(8, 9.1), (8, 12.3), (5, 2.0)]);
    }

    #[test]
    fn test_medals_for_top_three() {
        let view = present(
            (0..5).map(|i| record("p", 10 - i, 1.0)).collect(),
            10,
        );
        let RankingView::Ranked(entries) = view else {
            panic!("expected entries");
        };
        assert_eq!(entries[0].medal, Some(Medal::Gold));
        assert_eq!(entries[1].medal, Some(Medal::Silver));
        assert_eq!(entries[2].medal, Some(Medal::Bronze));
        assert_eq!(entries[3].medal, None);
        assert_eq!(entries[4].rank, 5);
    }

    #[test]
    fn test_limit_truncates() {
        let view = present((0..15).map(|i| record("p", i, 1.0)).collect(), 10);
        let RankingView::Ranked(entries) = view else {
            panic!("expected entries");
        };
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].record.score, 14);
    }

    #[test]
    fn test_full_ties_keep_input_order() {
        let view = present(vec![record("first", 3, 4.0), record("second", 3, 4.0)], 10);
        let RankingView::Ranked(entries) = view else {
            panic!("expected entries");
        };
        assert_eq!(entries[0].record.name, "first");
        assert_eq!(entries[1].record.name, "second");
    }

    #[test]
    fn test_empty_is_explicit() {
        assert_eq!(present(Vec::new(), 10), RankingView::Empty);
    }

    #[test]
    fn test_scope_keys() {
        let topic = TopicKey::new("Elementary", "Fractions").unwrap();
        assert_eq!(RankingScope::topic(topic.clone()).key(), "<Elementary>Fractions");

        let scope = RankingScope::per_mode(topic, 10);
        assert_eq!(scope.key(), "<Elementary>Fractions_Q10");
        assert_eq!(scope.label(), "Fractions · 10 questions");
    }
}
