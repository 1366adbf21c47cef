use crate::config::StrengthBands;
use crate::error::ConfigError;
use crate::regression::least_squares_slope;
use gwr_core::reading::{sorted_by_timestamp, Reading};
use gwr_core::window::DateWindow;
use gwr_utils::dates::whole_days_between;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fewest usable in-window readings that can define a line.
pub const MIN_TREND_POINTS: usize = 2;

/// Direction of the water table over the trend window.
///
/// Depth is measured below ground, so a rising depth means a falling water
/// table: a positive slope is `Depleting`, a negative slope `Recharging`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendStatus {
    Recharging,
    Stable,
    Depleting,
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
}

impl fmt::Display for TrendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendStatus::Recharging => write!(f, "Recharging"),
            TrendStatus::Stable => write!(f, "Stable"),
            TrendStatus::Depleting => write!(f, "Depleting"),
            TrendStatus::InsufficientData => write!(f, "Insufficient Data"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrendStrength {
    Low,
    Medium,
    Strong,
}

impl fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendStrength::Low => write!(f, "Low"),
            TrendStrength::Medium => write!(f, "Medium"),
            TrendStrength::Strong => write!(f, "Strong"),
        }
    }
}

/// Outcome of a trend fit over one station's series.
///
/// An `InsufficientData` result carries zero slope and magnitude and a `Low`
/// strength; only `points_used` is meaningful. Check [`is_conclusive`]
/// before reading the numbers.
///
/// [`is_conclusive`]: TrendResult::is_conclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub status: TrendStatus,
    pub slope_m_per_day: f64,
    pub strength: TrendStrength,
    /// Signed change in meters attributed to the trend over the whole window.
    pub magnitude_m: f64,
    pub window_days: u32,
    pub points_used: usize,
}

impl TrendResult {
    pub fn insufficient(window_days: u32, points_used: usize) -> Self {
        TrendResult {
            status: TrendStatus::InsufficientData,
            slope_m_per_day: 0.0,
            strength: TrendStrength::Low,
            magnitude_m: 0.0,
            window_days,
            points_used,
        }
    }

    pub fn is_conclusive(&self) -> bool {
        self.status != TrendStatus::InsufficientData
    }
}

/// Linear-regression trend estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendEngine {
    bands: StrengthBands,
}

impl TrendEngine {
    pub fn new(bands: StrengthBands) -> Result<Self, ConfigError> {
        bands.validate()?;
        Ok(TrendEngine { bands })
    }

    pub fn classify_status(slope: f64) -> TrendStatus {
        if slope < 0.0 {
            TrendStatus::Recharging
        } else if slope > 0.0 {
            TrendStatus::Depleting
        } else {
            TrendStatus::Stable
        }
    }

    pub fn classify_strength(&self, slope: f64) -> TrendStrength {
        let abs_slope = slope.abs();
        if abs_slope < self.bands.low_m_per_day {
            TrendStrength::Low
        } else if abs_slope < self.bands.medium_m_per_day {
            TrendStrength::Medium
        } else {
            TrendStrength::Strong
        }
    }

    /// Fit a trend over the `window_days` days ending at the latest reading.
    ///
    /// The x axis is whole days elapsed since the first usable in-window
    /// reading, not the reading's position, so irregular sampling does not
    /// distort the slope. Readings without a usable depth are ignored.
    pub fn compute(&self, series: &[Reading], window_days: u32) -> TrendResult {
        let Some(latest) = series.iter().map(|r| r.timestamp).max() else {
            warn!("No readings provided for trend calculation");
            return TrendResult::insufficient(window_days, 0);
        };
        let Some(window) = DateWindow::trailing(latest, window_days) else {
            warn!(
                "Trend window of {} days before {} is out of range",
                window_days, latest
            );
            return TrendResult::insufficient(window_days, 0);
        };

        let points: Vec<_> = sorted_by_timestamp(series)
            .into_iter()
            .filter(|r| window.contains(&r.timestamp))
            .filter_map(|r| r.usable_depth().map(|depth| (r.timestamp, depth)))
            .collect();

        if points.len() < MIN_TREND_POINTS {
            warn!(
                "Insufficient data for trend: {} points (need at least {})",
                points.len(),
                MIN_TREND_POINTS
            );
            return TrendResult::insufficient(window_days, points.len());
        }

        let first = points[0].0;
        let xs: Vec<f64> = points
            .iter()
            .map(|(ts, _)| whole_days_between(&first, ts) as f64)
            .collect();
        let ys: Vec<f64> = points.iter().map(|(_, depth)| *depth).collect();

        let slope = if ys.iter().all(|y| *y == ys[0]) {
            debug!("All readings identical, slope = 0.0");
            0.0
        } else {
            match least_squares_slope(&xs, &ys) {
                Some(slope) => slope,
                None => {
                    // every reading falls on the same day
                    debug!("Zero day spread across {} readings, slope = 0.0", points.len());
                    0.0
                }
            }
        };

        if !slope.is_finite() {
            // depths large enough to overflow the regression sums
            warn!(
                "Non-finite trend slope over {} points, treating as insufficient data",
                points.len()
            );
            return TrendResult::insufficient(window_days, points.len());
        }

        let station = series.first().map(|r| r.station_id.as_str()).unwrap_or_default();
        debug!("{} trend slope = {} m/day over {} points", station, slope, points.len());

        TrendResult {
            status: Self::classify_status(slope),
            slope_m_per_day: slope,
            strength: self.classify_strength(slope),
            magnitude_m: slope * f64::from(window_days),
            window_days,
            points_used: points.len(),
        }
    }
}
