use chrono::{DateTime, Duration, NaiveDateTime, Utc};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Shifts `at` by a fractional number of hours.
pub fn add_hours(at: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    at + Duration::milliseconds((hours * MILLIS_PER_HOUR).round() as i64)
}

/// Fractional hours from `earlier` to `later`, negative when they are swapped.
pub fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

pub fn to_naive(at: DateTime<Utc>) -> NaiveDateTime {
    at.naive_utc()
}

pub fn from_naive(at: NaiveDateTime) -> DateTime<Utc> {
    at.and_utc()
}
