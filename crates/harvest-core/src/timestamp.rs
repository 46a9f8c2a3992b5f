//! Epoch timestamp normalization.
//!
//! Event payloads carry `start_timestamp` as epoch seconds, though some
//! captures report milliseconds instead. This module converts either into a
//! human-readable America/Chicago local time string with a DST-aware
//! timezone abbreviation, e.g. `2025-10-04 9:00 PM CDT`.

use chrono::{LocalResult, TimeZone, Utc};
use chrono_tz::America::Chicago;
use serde_json::Value;

/// Values above this are assumed to be epoch milliseconds.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Convert an epoch timestamp (seconds or milliseconds) to an
/// America/Chicago local time string.
///
/// Returns an empty string for out-of-range input; never panics.
pub fn central_time_from_timestamp(ts: i64) -> String {
    let secs = if ts.unsigned_abs() > MILLIS_THRESHOLD as u64 {
        ts / 1000
    } else {
        ts
    };
    match Utc.timestamp_opt(secs, 0) {
        LocalResult::Single(dt_utc) => {
            let dt_local = dt_utc.with_timezone(&Chicago);
            dt_local.format("%Y-%m-%d %-I:%M %p %Z").to_string()
        }
        _ => String::new(),
    }
}

/// Convert a raw JSON `start_timestamp` value to a formatted local time.
///
/// Accepts integers, floats, and numeric strings; anything else yields an
/// empty string.
pub fn central_time_from_value(value: &Value) -> String {
    match epoch_from_value(value) {
        Some(ts) => central_time_from_timestamp(ts),
        None => String::new(),
    }
}

fn epoch_from_value(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if let Some(f) = value.as_f64() {
        return Some(f as i64);
    }
    value.as_str()?.trim().parse().ok()
}
