//! Serializable scheduler state.
//!
//! The JSON shape is `{"records": {id: record}, "stats": {...}}` with
//! RFC 3339 timestamps. [`Snapshot::from_value`] is the tolerant decoder used
//! when reading state back from a store: anything it cannot make sense of is
//! replaced by defaults instead of failing the whole restore.

use super::review_record::DEFAULT_EASE_FACTOR;
use super::{AggregateStats, ReviewRecord};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub records: BTreeMap<String, ReviewRecord>,
    #[serde(default)]
    pub stats: AggregateStats,
}

impl Snapshot {
    /// Decodes a stored snapshot, defaulting whatever is missing or malformed.
    ///
    /// Returns `None` for `null`, an empty object, or a non-object value;
    /// callers treat that as "nothing stored". `now` seeds `next_review` for
    /// records that lack one.
    pub fn from_value(value: &Value, now: DateTime<Utc>) -> Option<Self> {
        let fields = match value {
            Value::Object(fields) if !fields.is_empty() => fields,
            Value::Null | Value::Object(_) => return None,
            other => {
                warn!(kind = value_kind(other), "ignoring snapshot that is not an object");
                return None;
            }
        };

        let records = match fields.get("records") {
            None => BTreeMap::new(),
            Some(Value::Object(entries)) => decode_records(entries, now),
            Some(other) => {
                warn!(kind = value_kind(other), "malformed snapshot records, starting empty");
                BTreeMap::new()
            }
        };

        let stats = match fields.get("stats") {
            None => AggregateStats::default(),
            Some(Value::Object(stats)) => decode_stats(stats),
            Some(other) => {
                warn!(kind = value_kind(other), "malformed snapshot stats, starting from zero");
                AggregateStats::default()
            }
        };

        Some(Self { records, stats })
    }
}

fn decode_records(
    entries: &Map<String, Value>,
    now: DateTime<Utc>,
) -> BTreeMap<String, ReviewRecord> {
    entries
        .iter()
        .filter(|(item_id, _)| !item_id.is_empty())
        .filter_map(|(item_id, entry)| match entry {
            Value::Object(fields) => Some((item_id.clone(), decode_record(item_id, fields, now))),
            other => {
                warn!(%item_id, kind = value_kind(other), "dropping malformed review record");
                None
            }
        })
        .collect()
}

// The mapping key is authoritative for the id; a stored `item_id` (or the
// older `question_id`) is not consulted.
fn decode_record(item_id: &str, fields: &Map<String, Value>, now: DateTime<Utc>) -> ReviewRecord {
    let mut record = ReviewRecord {
        item_id: item_id.to_string(),
        last_seen: fields.get("last_seen").and_then(timestamp),
        correct_count: fields.get("correct_count").and_then(count).unwrap_or(0),
        incorrect_count: fields.get("incorrect_count").and_then(count).unwrap_or(0),
        next_review: fields.get("next_review").and_then(timestamp).unwrap_or(now),
        interval_days: fields.get("interval_days").and_then(Value::as_f64).unwrap_or(0.0),
        ease_factor: fields
            .get("ease_factor")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_EASE_FACTOR),
    };
    record.normalize();
    record
}

fn decode_stats(fields: &Map<String, Value>) -> AggregateStats {
    let field = |name: &str| fields.get(name).and_then(count).unwrap_or(0);
    let mut stats = AggregateStats {
        total_reviews: field("total_reviews"),
        total_correct: field("total_correct"),
        total_incorrect: field("total_incorrect"),
        streak: field("streak"),
        best_streak: field("best_streak"),
    };
    stats.normalize();
    stats
}

fn count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n as u64)
    })
}

/// Whatever chrono's serde writes (including signed years past 9999), or a
/// naive ISO-8601 timestamp read as UTC.
fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    text.parse::<DateTime<Utc>>()
        .ok()
        .or_else(|| text.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc()))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_null_and_empty_are_nothing_stored() {
        assert_eq!(Snapshot::from_value(&Value::Null, now()), None);
        assert_eq!(Snapshot::from_value(&json!({}), now()), None);
        assert_eq!(Snapshot::from_value(&json!("srs"), now()), None);
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let snapshot = Snapshot::from_value(&json!({"version": 2}), now()).unwrap();
        assert!(snapshot.records.is_empty());
        assert_eq!(snapshot.stats, AggregateStats::default());
    }

    #[test]
    fn test_malformed_keys_fall_back_to_defaults() {
        let value = json!({"records": [1, 2, 3], "stats": "lots"});
        let snapshot = Snapshot::from_value(&value, now()).unwrap();
        assert!(snapshot.records.is_empty());
        assert_eq!(snapshot.stats, AggregateStats::default());
    }

    #[test]
    fn test_partial_record_takes_defaults() {
        let value = json!({
            "records": {
                "Verbs:3": {"correct_count": 2, "ease_factor": "high"},
                "broken": 17
            }
        });
        let snapshot = Snapshot::from_value(&value, now()).unwrap();
        assert_eq!(snapshot.records.len(), 1);

        let record = &snapshot.records["Verbs:3"];
        assert_eq!(record.item_id, "Verbs:3");
        assert_eq!(record.correct_count, 2);
        assert_eq!(record.incorrect_count, 0);
        assert_eq!(record.last_seen, None);
        assert_eq!(record.next_review, now());
        assert_eq!(record.interval_days, 0.0);
        assert_eq!(record.ease_factor, DEFAULT_EASE_FACTOR);
    }

    #[test]
    fn test_legacy_record_shape() {
        let value = json!({
            "records": {
                "Articles:0": {
                    "question_id": "Articles:0",
                    "last_seen": "2024-02-20T09:15:30.123456",
                    "correct_count": 3,
                    "incorrect_count": 1,
                    "next_review": "2024-03-06T09:15:30.123456",
                    "interval_days": 15,
                    "ease_factor": 2.5
                }
            },
            "stats": {
                "total_reviews": 4,
                "total_correct": 3,
                "total_incorrect": 1,
                "streak": 3,
                "best_streak": 3
            }
        });
        let snapshot = Snapshot::from_value(&value, now()).unwrap();
        let record = &snapshot.records["Articles:0"];

        let last_seen = Utc.with_ymd_and_hms(2024, 2, 20, 9, 15, 30).unwrap()
            + chrono::Duration::microseconds(123_456);
        assert_eq!(record.last_seen, Some(last_seen));
        assert_eq!(record.interval_days, 15.0);
        assert_eq!(snapshot.stats.total_reviews, 4);
        assert_eq!(snapshot.stats.best_streak, 3);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let value = json!({
            "records": {"Time:1": {"ease_factor": 0.2, "interval_days": -3.0}},
            "stats": {"total_correct": 2, "total_incorrect": -1}
        });
        let snapshot = Snapshot::from_value(&value, now()).unwrap();
        let record = &snapshot.records["Time:1"];
        assert_eq!(record.ease_factor, 1.3);
        assert_eq!(record.interval_days, 0.0);
        assert_eq!(snapshot.stats.total_incorrect, 0);
        assert_eq!(snapshot.stats.total_reviews, 2);
    }

    #[test]
    fn test_serialized_shape() {
        let mut snapshot = Snapshot::default();
        snapshot
            .records
            .insert("Colors:0".into(), ReviewRecord::new("Colors:0", now()));
        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["records"]["Colors:0"]["next_review"], "2024-03-01T12:00:00Z");
        assert_eq!(value["records"]["Colors:0"]["last_seen"], Value::Null);
        assert_eq!(value["stats"]["best_streak"], 0);
        assert_eq!(Snapshot::from_value(&value, now()), Some(snapshot));
    }

    #[test]
    fn test_far_future_timestamps_survive_decoding() {
        let far = Utc.with_ymd_and_hms(17323, 5, 31, 22, 44, 40).unwrap();
        let mut snapshot = Snapshot::default();
        for (item_id, next_review) in [("Verbs:0", far), ("Verbs:1", DateTime::<Utc>::MAX_UTC)] {
            let mut record = ReviewRecord::new(item_id, now());
            record.last_seen = Some(now());
            record.next_review = next_review;
            snapshot.records.insert(item_id.into(), record);
        }
        let value = serde_json::to_value(&snapshot).unwrap();

        assert!(value["records"]["Verbs:0"]["next_review"]
            .as_str()
            .unwrap()
            .starts_with("+17323-"));
        assert_eq!(Snapshot::from_value(&value, now()), Some(snapshot));
    }
}
