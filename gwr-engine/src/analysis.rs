use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::risk::{RiskResult, RiskScorer};
use crate::seasonal::{SeasonalEngine, SeasonalResult};
use crate::trend::{TrendEngine, TrendResult};
use chrono::NaiveDateTime;
use gwr_core::reading::Reading;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Station id reported when the series is empty.
pub const UNKNOWN_STATION: &str = "unknown";
/// Note attached to results that carry no usable risk.
pub const INSUFFICIENT_DATA_NOTE: &str = "Insufficient data for calculation";

/// Everything the engine derives for one station at one reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub station_id: String,
    /// The caller's reference date, or the latest reading when none was given.
    pub calculation_date: Option<NaiveDateTime>,
    /// Number of readings supplied for the station, usable or not.
    pub points_used: usize,
    pub trend_period_days: u32,
    pub trend: TrendResult,
    pub seasonal: Option<SeasonalResult>,
    pub risk: RiskResult,
    pub notes: Option<String>,
}

/// Runs trend, seasonal and risk analysis over one station's series.
///
/// Built once from a validated [`EngineConfig`] and then shared freely; it
/// holds no mutable state.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: EngineConfig,
    trend: TrendEngine,
    seasonal: SeasonalEngine,
    risk: RiskScorer,
}

impl Analyzer {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Analyzer {
            trend: TrendEngine::new(config.strength_bands())?,
            seasonal: SeasonalEngine::new(),
            risk: RiskScorer::new(config.risk_config())?,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a series for one station.
    ///
    /// The trend window always ends at the latest reading. The seasonal
    /// window ends at `reference_date`, or at the latest reading when none
    /// is given.
    pub fn analyze(
        &self,
        series: &[Reading],
        reference_date: Option<NaiveDateTime>,
    ) -> AnalysisResult {
        let Some(first) = series.first() else {
            warn!("No readings supplied, returning empty analysis");
            return self.empty_result(reference_date);
        };

        let station_id = first.station_id.clone();
        if series.iter().any(|r| r.station_id != station_id) {
            warn!(
                "Series for {} contains readings from other stations; analysing it as one series",
                station_id
            );
        }

        let calculation_date = reference_date.or_else(|| series.iter().map(|r| r.timestamp).max());

        let trend = self.trend.compute(series, self.config.trend_window_days);
        let seasonal = self.seasonal.compute(
            series,
            self.config.seasonal_window_days,
            self.config.seasonal_years,
            calculation_date,
        );
        let risk = self.risk.score(Some(&trend), seasonal.as_ref());

        debug!(
            "{}: trend={} seasonal={} risk={:?}",
            station_id,
            trend.status,
            seasonal.is_some(),
            risk.risk_index
        );

        let notes = if risk.is_defined() {
            None
        } else {
            Some(INSUFFICIENT_DATA_NOTE.to_string())
        };

        AnalysisResult {
            station_id,
            calculation_date,
            points_used: series.len(),
            trend_period_days: self.config.trend_window_days,
            trend,
            seasonal,
            risk,
            notes,
        }
    }

    fn empty_result(&self, reference_date: Option<NaiveDateTime>) -> AnalysisResult {
        AnalysisResult {
            station_id: UNKNOWN_STATION.to_string(),
            calculation_date: reference_date,
            points_used: 0,
            trend_period_days: self.config.trend_window_days,
            trend: TrendResult::insufficient(self.config.trend_window_days, 0),
            seasonal: None,
            risk: RiskResult::undefined(),
            notes: Some(INSUFFICIENT_DATA_NOTE.to_string()),
        }
    }
}
