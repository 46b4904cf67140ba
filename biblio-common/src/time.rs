//! Date parsing and formatting utilities

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse a date string in any of the accepted input forms.
///
/// Accepts RFC 3339 timestamps (`2020-01-01T00:00:00Z`), space-separated
/// date-times (`2020-01-01 00:00:00`), and bare dates (`2020-01-01`).
/// Bare dates resolve to midnight UTC. Returns `None` when the string
/// matches none of these forms.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight));
    }

    None
}

/// Format a timestamp in the canonical stored form.
///
/// The canonical form is RFC 3339 with whole seconds and a `Z` suffix
/// (`2020-01-01T00:00:00Z`). It is fixed-width, so lexicographic order
/// over stored values matches chronological order.
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a date string and re-emit it in the canonical stored form.
pub fn canonicalize_date(input: &str) -> Option<String> {
    parse_date(input).map(|dt| format_date(&dt))
}
