use crate::config::RiskConfig;
use crate::error::ConfigError;
use crate::seasonal::SeasonalResult;
use crate::trend::{TrendResult, TrendStatus};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity band of a risk index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Critical Risk")]
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low Risk"),
            RiskLevel::Moderate => write!(f, "Moderate Risk"),
            RiskLevel::High => write!(f, "High Risk"),
            RiskLevel::Critical => write!(f, "Critical Risk"),
        }
    }
}

/// Composite risk for one station.
///
/// `risk_index` and `risk_level` are both `None` when neither input was
/// available. That is "risk undefined", not "no risk".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    /// 0-100
    pub risk_index: Option<f64>,
    pub risk_level: Option<RiskLevel>,
    /// Trend component (0-100) before weighting, if a trend was available.
    pub trend_component: Option<f64>,
    /// Seasonal component (0-100) before weighting, if a baseline was available.
    pub seasonal_component: Option<f64>,
}

impl RiskResult {
    pub fn undefined() -> Self {
        RiskResult {
            risk_index: None,
            risk_level: None,
            trend_component: None,
            seasonal_component: None,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.risk_index.is_some()
    }
}

/// Linear 0..100 scale that saturates at `cap`.
fn saturate(value: f64, cap: f64) -> f64 {
    (value.max(0.0) / cap).min(1.0) * 100.0
}

/// Blends trend severity and seasonal shortfall into a single index.
#[derive(Debug, Clone, Copy)]
pub struct RiskScorer {
    config: RiskConfig,
}

impl RiskScorer {
    pub fn new(config: RiskConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(RiskScorer { config })
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Only a depleting trend carries risk, scaled by `|magnitude_m|`.
    pub fn trend_component(&self, trend: &TrendResult) -> f64 {
        match trend.status {
            TrendStatus::Depleting => saturate(trend.magnitude_m.abs(), self.config.trend_cap_m),
            _ => 0.0,
        }
    }

    /// Only a shortfall against the historical baseline carries risk.
    pub fn seasonal_component(&self, seasonal: &SeasonalResult) -> f64 {
        if seasonal.deviation_m < 0.0 {
            saturate(-seasonal.deviation_m, self.config.seasonal_cap_m)
        } else {
            0.0
        }
    }

    pub fn level(&self, risk_index: f64) -> RiskLevel {
        if risk_index < self.config.low_threshold {
            RiskLevel::Low
        } else if risk_index < self.config.moderate_threshold {
            RiskLevel::Moderate
        } else if risk_index < self.config.high_threshold {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    /// Score whatever is available.
    ///
    /// An inconclusive trend counts as unavailable. The weight of a missing
    /// input moves to the other one in proportion, so a single available
    /// component is scored on its own.
    pub fn score(
        &self,
        trend: Option<&TrendResult>,
        seasonal: Option<&SeasonalResult>,
    ) -> RiskResult {
        let trend_component = trend
            .filter(|t| t.is_conclusive())
            .map(|t| self.trend_component(t));
        let seasonal_component = seasonal.map(|s| self.seasonal_component(s));

        let weighted: Vec<(f64, f64)> = [
            trend_component.map(|c| (self.config.trend_weight, c)),
            seasonal_component.map(|c| (self.config.seasonal_weight, c)),
        ]
        .into_iter()
        .flatten()
        .collect();

        let weight_sum: f64 = weighted.iter().map(|(w, _)| w).sum();
        if weight_sum <= 0.0 {
            debug!("No weighted risk inputs available, risk undefined");
            return RiskResult {
                trend_component,
                seasonal_component,
                ..RiskResult::undefined()
            };
        }

        let risk_index = (weighted.iter().map(|(w, c)| w * c).sum::<f64>() / weight_sum)
            .clamp(0.0, 100.0);
        let risk_level = self.level(risk_index);
        debug!(
            "Risk index {:.1} ({}) from trend={:?} seasonal={:?}",
            risk_index, risk_level, trend_component, seasonal_component
        );

        RiskResult {
            risk_index: Some(risk_index),
            risk_level: Some(risk_level),
            trend_component,
            seasonal_component,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::TrendStrength;
    use gwr_core::season::Season;

    fn trend(status: TrendStatus, magnitude_m: f64) -> TrendResult {
        TrendResult {
            status,
            slope_m_per_day: magnitude_m / 90.0,
            strength: TrendStrength::Medium,
            magnitude_m,
            window_days: 90,
            points_used: 90,
        }
    }

    fn seasonal(deviation_m: f64) -> SeasonalResult {
        SeasonalResult {
            actual_change_m: deviation_m,
            historical_baseline_m: 0.0,
            deviation_m,
            season_label: Season::Winter,
            years_used: 2,
        }
    }

    fn scorer() -> RiskScorer {
        RiskScorer::new(RiskConfig::default()).unwrap()
    }

    #[test]
    fn test_both_inputs_are_weighted() {
        // trend: 1.0m / 2.0m cap = 50; seasonal: 0.5m / 1.0m cap = 50
        let result = scorer().score(
            Some(&trend(TrendStatus::Depleting, 1.0)),
            Some(&seasonal(-0.5)),
        );
        assert!((result.risk_index.unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(result.risk_level, Some(RiskLevel::Moderate));

        let result = scorer().score(
            Some(&trend(TrendStatus::Depleting, 2.0)),
            Some(&seasonal(-0.5)),
        );
        assert!((result.risk_index.unwrap() - 80.0).abs() < 1e-9);
        assert_eq!(result.risk_level, Some(RiskLevel::High));
    }

    #[test]
    fn test_only_depletion_contributes() {
        let s = scorer();
        assert_eq!(s.trend_component(&trend(TrendStatus::Recharging, -3.0)), 0.0);
        assert_eq!(s.trend_component(&trend(TrendStatus::Stable, 0.0)), 0.0);
        assert_eq!(s.seasonal_component(&seasonal(0.8)), 0.0);
        assert_eq!(s.seasonal_component(&seasonal(0.0)), 0.0);
    }

    #[test]
    fn test_components_saturate() {
        let s = scorer();
        assert_eq!(s.trend_component(&trend(TrendStatus::Depleting, 10.0)), 100.0);
        assert_eq!(s.seasonal_component(&seasonal(-4.0)), 100.0);
        let result = s.score(
            Some(&trend(TrendStatus::Depleting, 10.0)),
            Some(&seasonal(-4.0)),
        );
        assert_eq!(result.risk_index, Some(100.0));
        assert_eq!(result.risk_level, Some(RiskLevel::Critical));
    }

    #[test]
    fn test_missing_input_weight_is_redistributed() {
        let only_trend = scorer().score(Some(&trend(TrendStatus::Depleting, 1.0)), None);
        assert!((only_trend.risk_index.unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(only_trend.seasonal_component, None);

        let only_seasonal = scorer().score(None, Some(&seasonal(-0.9)));
        assert!((only_seasonal.risk_index.unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(only_seasonal.risk_level, Some(RiskLevel::Critical));
    }

    #[test]
    fn test_inconclusive_trend_is_unavailable() {
        let insufficient = TrendResult::insufficient(90, 1);
        let result = scorer().score(Some(&insufficient), None);
        assert_eq!(result, RiskResult::undefined());
        assert!(!result.is_defined());

        let result = scorer().score(Some(&insufficient), Some(&seasonal(-0.2)));
        assert!((result.risk_index.unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(result.trend_component, None);
    }

    #[test]
    fn test_zero_weight_alone_is_undefined() {
        let s = RiskScorer::new(RiskConfig {
            trend_weight: 1.0,
            seasonal_weight: 0.0,
            ..RiskConfig::default()
        })
        .unwrap();
        let result = s.score(None, Some(&seasonal(-0.5)));
        assert_eq!(result.risk_index, None);
        assert_eq!(result.seasonal_component, Some(50.0));
    }

    #[test]
    fn test_level_boundaries() {
        let s = scorer();
        assert_eq!(s.level(0.0), RiskLevel::Low);
        assert_eq!(s.level(29.99), RiskLevel::Low);
        assert_eq!(s.level(30.0), RiskLevel::Moderate);
        assert_eq!(s.level(60.0), RiskLevel::High);
        assert_eq!(s.level(84.9), RiskLevel::High);
        assert_eq!(s.level(85.0), RiskLevel::Critical);
    }

    #[test]
    fn test_monotonic_in_depletion_magnitude() {
        let s = scorer();
        let fixed = seasonal(-0.25);
        let mut previous = f64::MIN;
        for step in 0..=40 {
            let magnitude = step as f64 * 0.1;
            let index = s
                .score(Some(&trend(TrendStatus::Depleting, magnitude)), Some(&fixed))
                .risk_index
                .unwrap();
            assert!(index >= previous);
            previous = index;
        }
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        assert!(RiskScorer::new(RiskConfig {
            trend_weight: 0.9,
            ..RiskConfig::default()
        })
        .is_err());
    }

    #[test]
    fn test_level_serializes_with_label() {
        let json = serde_json::to_string(&RiskLevel::Critical).unwrap();
        assert_eq!(json, "\"Critical Risk\"");
        assert_eq!(RiskLevel::Low.to_string(), "Low Risk");
    }
}
