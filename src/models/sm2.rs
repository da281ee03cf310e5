//! Simplified SM-2 (SuperMemo 2) scheduling.
//!
//! Answers are binary rather than graded 0-5:
//! - 1st correct answer: review again in 1 day
//! - 2nd correct answer: review again in 6 days
//! - later correct answers: previous interval multiplied by the ease factor
//! - every correct answer raises the ease factor by 0.1, capped at 2.5
//! - an incorrect answer schedules the item ~10 minutes out and lowers the
//!   ease factor by 0.2, with a floor of 1.3

use super::review_record::{MAX_EASE_FACTOR, MIN_EASE_FACTOR};
use super::ReviewRecord;
use chrono::{DateTime, Duration, Utc};

/// Interval after a wrong answer, ~10 minutes expressed in days.
pub const RELEARN_INTERVAL_DAYS: f64 = 0.007;

const EASE_BONUS: f64 = 0.1;
const EASE_PENALTY: f64 = 0.2;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// New spacing for an item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Schedule {
    pub interval_days: f64,
    pub ease_factor: f64,
}

/// Computes the schedule that follows an answer.
///
/// `record` must already carry the incremented answer counts, so the first
/// correct answer sees `correct_count == 1`.
pub fn next_schedule(record: &ReviewRecord, is_correct: bool) -> Schedule {
    if is_correct {
        let interval_days = match record.correct_count {
            0 | 1 => 1.0,
            2 => 6.0,
            _ => record.interval_days * record.ease_factor,
        };
        Schedule {
            interval_days,
            ease_factor: (record.ease_factor + EASE_BONUS).min(MAX_EASE_FACTOR),
        }
    } else {
        Schedule {
            interval_days: RELEARN_INTERVAL_DAYS,
            ease_factor: (record.ease_factor - EASE_PENALTY).max(MIN_EASE_FACTOR),
        }
    }
}

/// Adds a fractional number of days to `now`, saturating at the latest
/// representable timestamp.
pub fn review_time_after(now: DateTime<Utc>, interval_days: f64) -> DateTime<Utc> {
    let millis = (interval_days.max(0.0) * MILLIS_PER_DAY).round() as i64;
    Duration::try_milliseconds(millis)
        .and_then(|offset| now.checked_add_signed(offset))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(correct_count: u64, interval_days: f64, ease_factor: f64) -> ReviewRecord {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        ReviewRecord {
            correct_count,
            interval_days,
            ease_factor,
            ..ReviewRecord::new("Verbs:1", now)
        }
    }

    #[test]
    fn test_first_correct_answer() {
        let next = next_schedule(&record(1, 0.0, 2.5), true);
        assert_eq!(next.interval_days, 1.0);
        assert_eq!(next.ease_factor, 2.5);
    }

    #[test]
    fn test_second_correct_answer() {
        let next = next_schedule(&record(2, 1.0, 2.5), true);
        assert_eq!(next.interval_days, 6.0);
    }

    #[test]
    fn test_later_correct_answers_multiply_by_ease() {
        let next = next_schedule(&record(3, 6.0, 2.0), true);
        assert!((next.interval_days - 12.0).abs() < 1e-9);
        assert!((next.ease_factor - 2.1).abs() < 1e-9);
    }

    #[test]
    fn test_incorrect_answer_relearns_soon() {
        let next = next_schedule(&record(5, 40.0, 2.5), false);
        assert_eq!(next.interval_days, RELEARN_INTERVAL_DAYS);
        assert!((next.ease_factor - 2.3).abs() < 1e-9);
    }

    #[test]
    fn test_ease_floor() {
        let next = next_schedule(&record(0, 0.007, 1.4), false);
        assert_eq!(next.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_review_time_after_fractional_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            review_time_after(now, RELEARN_INTERVAL_DAYS),
            now + Duration::milliseconds(604_800)
        );
        assert_eq!(review_time_after(now, 1.5), now + Duration::hours(36));
    }

    #[test]
    fn test_review_time_after_saturates() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(review_time_after(now, 1e300), DateTime::<Utc>::MAX_UTC);
    }
}
