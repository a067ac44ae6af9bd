//! Timestamp parsing for dates submitted by browsers.
//!
//! Date pickers send `datetime-local` values without an offset
//! (`2025-03-14T19:30`), API clients may send full RFC 3339 values.
//! Offset-less values are interpreted in the service's configured UTC offset.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Errors produced while parsing a timestamp.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("Timestamp is empty")]
    Empty,

    #[error("Unrecognized timestamp: {0}")]
    Invalid(String),

    #[error("UTC offset out of range: {0} hours")]
    InvalidOffset(i32),
}

/// Builds a fixed offset from whole hours east of UTC.
pub fn fixed_offset(utc_offset_hours: i32) -> Result<FixedOffset, TimestampError> {
    utc_offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or(TimestampError::InvalidOffset(utc_offset_hours))
}

/// Parses an RFC 3339 timestamp, a `datetime-local` value or a plain date.
///
/// Plain dates resolve to midnight in the given offset.
pub fn parse_timestamp(input: &str, utc_offset_hours: i32) -> Result<DateTime<Utc>, TimestampError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TimestampError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let offset = fixed_offset(utc_offset_hours)?;

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| TimestampError::Invalid(input.to_string()))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| TimestampError::Invalid(input.to_string()))
}
