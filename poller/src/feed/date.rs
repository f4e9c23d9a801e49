//! Publication dates
//!
//! GitHub reports ISO 8601 timestamps (`2024-01-01T12:00:00Z`); RSS wants
//! RFC 2822 in GMT (`Mon, 01 Jan 2024 12:00:00 GMT`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::DateError;

/// RFC 2822 with the literal `GMT` zone, as feed readers expect
pub const RSS_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO 8601-like timestamp. Timestamps without an offset are UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, DateError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = trimmed
        .strip_suffix('Z')
        .or_else(|| trimmed.strip_suffix('z'))
        .unwrap_or(trimmed);

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Ok(dt.and_utc());
        }
    }

    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| DateError::Invalid {
            input: input.to_string(),
        })
}

/// Render an instant as an RSS `pubDate`
pub fn to_rss_date(dt: &DateTime<Utc>) -> String {
    dt.format(RSS_DATE_FORMAT).to_string()
}

/// Source timestamp → RSS `pubDate`
pub fn format_rfc2822(input: &str) -> Result<String, DateError> {
    parse_timestamp(input).map(|dt| to_rss_date(&dt))
}
