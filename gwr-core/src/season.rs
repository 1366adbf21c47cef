use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hydrological season of the Indian subcontinent's monsoon calendar.
///
/// Recharge follows the monsoon, so the same net change in depth means very
/// different things in June and in April. The season is a pure function of
/// the calendar month:
///
/// | months        | season               |
/// |---------------|----------------------|
/// | Mar, Apr, May | Summer/Pre-Monsoon   |
/// | Jun - Sep     | Monsoon              |
/// | Oct, Nov      | Post-Monsoon         |
/// | Dec, Jan, Feb | Winter               |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    #[serde(rename = "Summer/Pre-Monsoon")]
    PreMonsoon,
    #[serde(rename = "Monsoon")]
    Monsoon,
    #[serde(rename = "Post-Monsoon")]
    PostMonsoon,
    #[serde(rename = "Winter")]
    Winter,
}

impl Season {
    /// Season for a calendar month (1 = January). Months outside 1..=12 are
    /// never produced by chrono; they fall through to `Winter`.
    pub fn from_month(month: u32) -> Season {
        match month {
            3..=5 => Season::PreMonsoon,
            6..=9 => Season::Monsoon,
            10 | 11 => Season::PostMonsoon,
            _ => Season::Winter,
        }
    }

    pub fn for_date(timestamp: &NaiveDateTime) -> Season {
        Season::from_month(timestamp.month())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::PreMonsoon => "Summer/Pre-Monsoon",
            Season::Monsoon => "Monsoon",
            Season::PostMonsoon => "Post-Monsoon",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
