//! # Time Utilities
//!
//! Utilities for time formatting and manipulation using chrono.

use chrono::{DateTime, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format time as RFC3339 string.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// Milliseconds elapsed from `start` to `end`, never negative.
pub fn elapsed_ms(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    (end - start).num_milliseconds().max(0) as u64
}

/// Parse RFC3339 string to UTC DateTime.
pub fn parse_utc(moment: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(moment)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::FailToDateParse(moment.to_string()))
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    FailToDateParse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse_round_trip() {
        let parsed = parse_utc("2026-01-12T09:30:00Z").unwrap();
        assert_eq!(format_time(parsed), "2026-01-12T09:30:00+00:00");
        assert!(parse_utc("Jan 12, 2026").is_err());
    }

    #[test]
    fn test_elapsed_ms() {
        let start = parse_utc("2026-01-12T09:30:00Z").unwrap();
        let end = parse_utc("2026-01-12T09:30:01.500Z").unwrap();
        assert_eq!(elapsed_ms(start, end), 1500);
        assert_eq!(elapsed_ms(end, start), 0);
    }
}
