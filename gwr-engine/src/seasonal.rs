use crate::config::{DEFAULT_SEASONAL_WINDOW_DAYS, DEFAULT_SEASONAL_YEARS};
use chrono::NaiveDateTime;
use gwr_core::reading::Reading;
use gwr_core::season::Season;
use gwr_core::window::DateWindow;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Comparison of the current window's net change with the same calendar
/// window in prior years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalResult {
    /// Last minus first depth in the current window (meters, signed).
    pub actual_change_m: f64,
    /// Mean net change of the same window in the contributing prior years.
    pub historical_baseline_m: f64,
    /// `actual_change_m - historical_baseline_m`.
    pub deviation_m: f64,
    pub season_label: Season,
    /// Number of prior years that contributed to the baseline.
    pub years_used: u32,
}

/// Multi-year rolling-window seasonal comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalEngine;

/// Usable `(timestamp, depth)` pairs in ascending order. Ties on timestamp
/// are broken by depth so the order never depends on input order.
fn usable_points(series: &[Reading]) -> Vec<(NaiveDateTime, f64)> {
    let mut points: Vec<_> = series
        .iter()
        .filter_map(|r| r.usable_depth().map(|depth| (r.timestamp, depth)))
        .collect();
    points.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
    points
}

/// Net change (last minus first) over the points inside `window`, if the
/// window holds at least two of them.
fn net_change(points: &[(NaiveDateTime, f64)], window: &DateWindow) -> Option<f64> {
    let mut in_window = points.iter().filter(|(ts, _)| window.contains(ts));
    let (_, first) = in_window.next()?;
    let (_, last) = in_window.last()?;
    Some(last - first)
}

impl SeasonalEngine {
    pub fn new() -> Self {
        SeasonalEngine
    }

    /// Compare the trailing `window_days` window ending at `reference_date`
    /// with the same window shifted back 1..=`years` years (365 days each).
    ///
    /// `reference_date` defaults to the latest reading; the wall clock is
    /// never consulted. Returns `None` when the current window has fewer
    /// than two usable readings or no prior year does.
    pub fn compute(
        &self,
        series: &[Reading],
        window_days: u32,
        years: u32,
        reference_date: Option<NaiveDateTime>,
    ) -> Option<SeasonalResult> {
        let points = usable_points(series);
        let Some(reference) = reference_date.or_else(|| series.iter().map(|r| r.timestamp).max())
        else {
            warn!("No readings provided for seasonal deviation calculation");
            return None;
        };

        let Some(current) = DateWindow::trailing(reference, window_days) else {
            warn!(
                "Seasonal window of {} days before {} is out of range",
                window_days, reference
            );
            return None;
        };
        let Some(actual_change) = net_change(&points, &current) else {
            warn!(
                "Insufficient data for seasonal deviation: {} points in window (need at least 2)",
                points.iter().filter(|(ts, _)| current.contains(ts)).count()
            );
            return None;
        };

        // shifting stops at the first year that leaves the calendar
        let historical_changes: Vec<f64> = (1..=years)
            .map_while(|k| current.shifted_back_years(k).map(|window| (k, window)))
            .filter_map(|(k, window)| {
                let change = net_change(&points, &window);
                if change.is_none() {
                    debug!("No usable window {} year(s) back, skipping", k);
                }
                change
            })
            .collect();

        if historical_changes.is_empty() {
            info!("No valid historical windows found for seasonal baseline");
            return None;
        }

        let historical_baseline =
            historical_changes.iter().sum::<f64>() / historical_changes.len() as f64;

        Some(SeasonalResult {
            actual_change_m: actual_change,
            historical_baseline_m: historical_baseline,
            deviation_m: actual_change - historical_baseline,
            season_label: Season::for_date(&reference),
            years_used: historical_changes.len() as u32,
        })
    }

    /// [`compute`](Self::compute) with a 90-day window and three prior years.
    pub fn compute_default(
        &self,
        series: &[Reading],
        reference_date: Option<NaiveDateTime>,
    ) -> Option<SeasonalResult> {
        self.compute(
            series,
            DEFAULT_SEASONAL_WINDOW_DAYS,
            DEFAULT_SEASONAL_YEARS,
            reference_date,
        )
    }
}
