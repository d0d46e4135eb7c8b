//! Relative time labels for publication dates.

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Human-friendly age of `then` as seen from `now`.
///
/// Times in the future read as "just now".
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if seconds < 60 {
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 7 {
        format!("{} days ago", days)
    } else if then.year() == now.year() {
        then.format("%m-%d").to_string()
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Interpret an epoch timestamp. Ten-digit values are seconds, anything
/// else is milliseconds.
pub fn from_timestamp(timestamp: i64) -> Option<DateTime<Utc>> {
    if timestamp.unsigned_abs().to_string().len() == 10 {
        Utc.timestamp_opt(timestamp, 0).single()
    } else {
        Utc.timestamp_millis_opt(timestamp).single()
    }
}

/// Parse an RFC 3339 `published` value such as `2024-01-15T18:00:00Z`
pub fn parse_published(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Relative label for a `published` value, if it parses
pub fn published_label(value: &str, now: DateTime<Utc>) -> Option<String> {
    parse_published(value).map(|then| format_relative(then, now))
}
