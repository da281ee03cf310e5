//! Spaced repetition scheduler.
//!
//! Owns one [`ReviewRecord`] per item plus the [`AggregateStats`] for a single
//! learner. Records are created lazily, either when an item is first looked up
//! as a due candidate or when it is first answered. All operations are
//! synchronous and in-memory; hosts that share a scheduler between tasks must
//! serialize access themselves (e.g. behind a `Mutex`).

use super::snapshot::Snapshot;
use super::stats::topic_of;
use super::{sm2, AggregateStats, ReviewRecord, StatsSnapshot, TopicStats};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

pub struct Scheduler<C: Clock = SystemClock> {
    records: HashMap<String, ReviewRecord>,
    stats: AggregateStats,
    clock: C,
}

impl Scheduler<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Scheduler<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Scheduler<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            records: HashMap::new(),
            stats: AggregateStats::default(),
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn record(&self, item_id: &str) -> Option<&ReviewRecord> {
        self.records.get(item_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record for `item_id`, inserting a default one if needed.
    pub fn get_or_create_record(&mut self, item_id: &str) -> Result<&ReviewRecord> {
        self.entry(item_id).map(|record| &*record)
    }

    fn entry(&mut self, item_id: &str) -> Result<&mut ReviewRecord> {
        if item_id.is_empty() {
            return Err(Error::InvalidItemId);
        }
        let now = self.clock.now();
        Ok(self
            .records
            .entry(item_id.to_string())
            .or_insert_with(|| ReviewRecord::new(item_id, now)))
    }

    /// Records one answer and reschedules the item.
    pub fn record_answer(&mut self, item_id: &str, is_correct: bool) -> Result<&ReviewRecord> {
        if item_id.is_empty() {
            return Err(Error::InvalidItemId);
        }
        let now = self.clock.now();
        self.stats.record(is_correct);

        let record = self.entry(item_id)?;
        if is_correct {
            record.correct_count += 1;
        } else {
            record.incorrect_count += 1;
        }

        let schedule = sm2::next_schedule(record, is_correct);
        record.interval_days = schedule.interval_days;
        record.ease_factor = schedule.ease_factor;
        record.last_seen = Some(now);
        record.next_review = sm2::review_time_after(now, schedule.interval_days);

        debug!(
            item_id,
            is_correct,
            interval_days = record.interval_days,
            ease_factor = record.ease_factor,
            next_review = %record.next_review,
            "recorded answer"
        );
        Ok(record)
    }

    /// Builds the review queue: every due item, earliest first, followed by
    /// at most `limit / 4` upcoming items.
    ///
    /// Unknown ids get default records first, so new items are due at once.
    /// A `limit` of zero is treated as one.
    pub fn get_due_questions<S: AsRef<str>>(
        &mut self,
        all_item_ids: &[S],
        limit: usize,
    ) -> Result<Vec<String>> {
        if all_item_ids.iter().any(|id| id.as_ref().is_empty()) {
            return Err(Error::InvalidItemId);
        }
        for item_id in all_item_ids {
            self.entry(item_id.as_ref())?;
        }

        let limit = limit.max(1);
        let upcoming_cap = limit / 4;
        let now = self.clock.now();

        let mut candidates: Vec<(&str, DateTime<Utc>)> = all_item_ids
            .iter()
            .map(|id| {
                let id = id.as_ref();
                let next_review = self.records.get(id).map_or(now, |record| record.next_review);
                (id, next_review)
            })
            .collect();
        // Stable, so equal timestamps keep their input order.
        candidates.sort_by_key(|&(_, next_review)| next_review);

        let mut due = Vec::new();
        let mut upcoming = Vec::new();
        for (item_id, next_review) in candidates {
            if next_review <= now {
                due.push(item_id.to_string());
            } else if upcoming.len() < upcoming_cap {
                upcoming.push(item_id.to_string());
            }

            if due.len() + upcoming.len() >= limit {
                break;
            }
        }

        debug!(due = due.len(), upcoming = upcoming.len(), limit, "built review queue");
        due.extend(upcoming);
        Ok(due)
    }

    pub fn get_stats(&self) -> StatsSnapshot {
        StatsSnapshot::from(self.stats)
    }

    /// Per-topic totals, keyed and sorted by topic name.
    pub fn get_topic_stats(&self) -> BTreeMap<String, TopicStats> {
        let mut topics: BTreeMap<String, TopicStats> = BTreeMap::new();
        for record in self.records.values() {
            topics
                .entry(topic_of(&record.item_id).to_string())
                .or_default()
                .add(record.correct_count, record.incorrect_count);
        }
        topics
    }

    pub fn export(&self) -> Snapshot {
        Snapshot {
            records: self
                .records
                .iter()
                .map(|(id, record)| (id.clone(), record.clone()))
                .collect(),
            stats: self.stats,
        }
    }

    /// Replaces all in-memory state with `snapshot`.
    pub fn import(&mut self, snapshot: Snapshot) {
        self.records = snapshot
            .records
            .into_iter()
            .filter(|(id, _)| !id.is_empty())
            .map(|(id, mut record)| {
                record.item_id.clone_from(&id);
                record.normalize();
                (id, record)
            })
            .collect();
        self.stats = snapshot.stats;
        self.stats.normalize();
        info!(records = self.records.len(), "imported scheduler state");
    }

    /// Restores from a stored JSON document without ever failing.
    ///
    /// `null` or `{}` leaves the current state untouched; otherwise see
    /// [`Snapshot::from_value`] for how partial documents are defaulted.
    pub fn import_value(&mut self, value: &Value) {
        match Snapshot::from_value(value, self.clock.now()) {
            Some(snapshot) => self.import(snapshot),
            None => debug!("no stored scheduler state to import"),
        }
    }
}
