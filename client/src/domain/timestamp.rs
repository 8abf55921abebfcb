//! Lenient timestamp parsing for API payloads.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse an API timestamp.
///
/// Accepts RFC 3339 and naive `YYYY-MM-DDTHH:MM:SS[.fff]` values (taken as
/// UTC). Anything else yields `None` so a bad date never discards the record
/// carrying it.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Calendar date in long form, e.g. `1 March 2024`.
pub fn long_date(at: DateTime<Utc>) -> String {
    at.date_naive().format("%-d %B %Y").to_string()
}
