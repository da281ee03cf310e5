//! Aggregate and per-topic answer statistics.

use serde::{Deserialize, Serialize};

/// Separates the topic prefix from the rest of an item id (`"Verbs:3"`).
pub const TOPIC_DELIMITER: char = ':';
pub const UNKNOWN_TOPIC: &str = "unknown";

/// Counters across every answer recorded by one scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_reviews: u64,
    pub total_correct: u64,
    pub total_incorrect: u64,
    pub streak: u64,
    pub best_streak: u64,
}

impl AggregateStats {
    pub fn record(&mut self, is_correct: bool) {
        if is_correct {
            self.total_correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.total_incorrect += 1;
            self.streak = 0;
        }
        self.total_reviews += 1;
    }

    pub fn accuracy(&self) -> f64 {
        percentage(self.total_correct, self.total_reviews)
    }

    pub(crate) fn normalize(&mut self) {
        self.total_reviews = self.total_correct + self.total_incorrect;
        self.best_streak = self.best_streak.max(self.streak);
    }
}

/// Aggregate counters plus the derived accuracy, as reported to callers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StatsSnapshot {
    #[serde(flatten)]
    pub stats: AggregateStats,
    pub accuracy: f64,
}

impl From<AggregateStats> for StatsSnapshot {
    fn from(stats: AggregateStats) -> Self {
        Self {
            accuracy: stats.accuracy(),
            stats,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TopicStats {
    pub correct: u64,
    pub incorrect: u64,
    pub total: u64,
    pub accuracy: f64,
}

impl TopicStats {
    pub(crate) fn add(&mut self, correct: u64, incorrect: u64) {
        self.correct += correct;
        self.incorrect += incorrect;
        self.total += correct + incorrect;
        self.accuracy = percentage(self.correct, self.total);
    }
}

/// Topic an item id belongs to: the text before the first delimiter, or
/// [`UNKNOWN_TOPIC`] when there is none.
pub fn topic_of(item_id: &str) -> &str {
    item_id
        .split_once(TOPIC_DELIMITER)
        .map(|(topic, _)| topic)
        .unwrap_or(UNKNOWN_TOPIC)
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
