use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const MAX_EASE_FACTOR: f64 = 2.5;

/// Review history and schedule for a single item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub item_id: String,
    pub last_seen: Option<DateTime<Utc>>,
    pub correct_count: u64,
    pub incorrect_count: u64,
    pub next_review: DateTime<Utc>,
    pub interval_days: f64,
    pub ease_factor: f64,
}

impl ReviewRecord {
    /// A never-reviewed record that is due immediately.
    pub fn new(item_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            item_id: item_id.into(),
            last_seen: None,
            correct_count: 0,
            incorrect_count: 0,
            next_review: now,
            interval_days: 0.0,
            ease_factor: DEFAULT_EASE_FACTOR,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    pub fn total_answers(&self) -> u64 {
        self.correct_count + self.incorrect_count
    }

    /// Pulls decoded values back inside the record invariants.
    pub(crate) fn normalize(&mut self) {
        self.ease_factor = if self.ease_factor.is_finite() {
            self.ease_factor.clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR)
        } else {
            DEFAULT_EASE_FACTOR
        };
        if !self.interval_days.is_finite() || self.interval_days < 0.0 {
            self.interval_days = 0.0;
        }
    }
}
