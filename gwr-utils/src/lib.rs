//! Shared utility functions for GWR crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};

    /// Timestamp formats accepted for naive (zone-less) readings, tried in order.
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    /// Format a NaiveDateTime as "YYYY-MM-DD HH:MM:SS"
    pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
        timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Format the calendar date of a timestamp as "YYYY-MM-DD"
    pub fn format_date(timestamp: &NaiveDateTime) -> String {
        timestamp.format("%Y-%m-%d").to_string()
    }

    /// Parse a timestamp string.
    ///
    /// Accepts a bare date ("YYYY-MM-DD", read as midnight), a naive date-time
    /// with a space or `T` separator, or an RFC 3339 timestamp with an offset,
    /// which is converted to UTC before the offset is dropped.
    pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, DateError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DateError("empty timestamp".to_string()));
        }
        for format in NAIVE_FORMATS {
            if let Ok(timestamp) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(timestamp);
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default());
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.naive_utc())
            .map_err(|_| DateError(format!("unrecognised timestamp '{}'", s)))
    }

    /// Whole days elapsed from `from` to `to`, truncated toward zero.
    pub fn whole_days_between(from: &NaiveDateTime, to: &NaiveDateTime) -> i64 {
        (*to - *from).num_days()
    }

    /// A span of `n` days, or `None` if it does not fit in a `TimeDelta`.
    pub fn days(n: i64) -> Option<TimeDelta> {
        TimeDelta::try_days(n)
    }

    /// `timestamp` moved `n` days into the past, or `None` when the result
    /// falls outside the representable date range.
    pub fn days_before(timestamp: &NaiveDateTime, n: i64) -> Option<NaiveDateTime> {
        timestamp.checked_sub_signed(days(n)?)
    }

}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
