use chrono::NaiveDateTime;
use gwr_utils::dates::days_before;
use serde::{Deserialize, Serialize};

/// Length of a "year" when shifting a window into the past. Fixed at 365
/// days so that shifted windows stay the same length regardless of leap years.
pub const DAYS_PER_YEAR: i64 = 365;

/// A closed time interval `[start, end]` over reading timestamps.
#[derive(Clone, Eq, PartialEq, Copy, Debug, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    /// The `length_days` days leading up to and including `end`.
    ///
    /// `None` when the start would fall before the earliest representable date.
    pub fn trailing(end: NaiveDateTime, length_days: u32) -> Option<DateWindow> {
        Some(DateWindow {
            start: days_before(&end, i64::from(length_days))?,
            end,
        })
    }

    /// The same window moved `years` years (of 365 days) into the past, or
    /// `None` once that leaves the representable date range.
    pub fn shifted_back_years(&self, years: u32) -> Option<DateWindow> {
        let shift = DAYS_PER_YEAR * i64::from(years);
        Some(DateWindow {
            start: days_before(&self.start, shift)?,
            end: days_before(&self.end, shift)?,
        })
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        self.start <= *timestamp && *timestamp <= self.end
    }
}
