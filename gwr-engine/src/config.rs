use crate::error::ConfigError;
use gwr_core::window::DAYS_PER_YEAR;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Default trailing window for trend estimation, in days.
pub const DEFAULT_TREND_WINDOW_DAYS: u32 = 90;
/// Default trailing window for the seasonal comparison, in days.
pub const DEFAULT_SEASONAL_WINDOW_DAYS: u32 = 90;
/// Default number of prior years searched for a seasonal baseline.
pub const DEFAULT_SEASONAL_YEARS: u32 = 3;

/// Longest look-back any window may reach, in days (about a century).
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

/// Tolerance on `risk_trend_weight + risk_seasonal_weight == 1`.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Immutable configuration bundle handed to every engine.
///
/// Loaded from TOML; any key may be omitted and falls back to its default.
/// Unknown keys are rejected so that a misspelt option fails loudly instead
/// of silently scoring with defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub trend_window_days: u32,
    pub seasonal_window_days: u32,
    pub seasonal_years: u32,
    pub risk_trend_weight: f64,
    pub risk_seasonal_weight: f64,
    pub risk_low_threshold: f64,
    pub risk_moderate_threshold: f64,
    pub risk_high_threshold: f64,
    /// Trend magnitude (meters over the trend window) at which the trend
    /// component saturates at 100.
    pub risk_trend_cap_m: f64,
    /// Seasonal shortfall (meters) at which the seasonal component saturates.
    pub risk_seasonal_cap_m: f64,
    pub strength_low_m_per_day: f64,
    pub strength_medium_m_per_day: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let risk = RiskConfig::default();
        let bands = StrengthBands::default();
        Self {
            trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
            seasonal_window_days: DEFAULT_SEASONAL_WINDOW_DAYS,
            seasonal_years: DEFAULT_SEASONAL_YEARS,
            risk_trend_weight: risk.trend_weight,
            risk_seasonal_weight: risk.seasonal_weight,
            risk_low_threshold: risk.low_threshold,
            risk_moderate_threshold: risk.moderate_threshold,
            risk_high_threshold: risk.high_threshold,
            risk_trend_cap_m: risk.trend_cap_m,
            risk_seasonal_cap_m: risk.seasonal_cap_m,
            strength_low_m_per_day: bands.low_m_per_day,
            strength_medium_m_per_day: bands.medium_m_per_day,
        }
    }
}

/// Risk scoring parameters.
///
/// The 0.6 / 0.4 weights and the 30 / 60 level boundaries come from the
/// deployment settings; the High/Critical boundary and both saturation caps
/// are tunable calibration choices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub trend_weight: f64,
    pub seasonal_weight: f64,
    pub low_threshold: f64,
    pub moderate_threshold: f64,
    pub high_threshold: f64,
    pub trend_cap_m: f64,
    pub seasonal_cap_m: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            trend_weight: 0.6,
            seasonal_weight: 0.4,
            low_threshold: 30.0,
            moderate_threshold: 60.0,
            high_threshold: 85.0,
            trend_cap_m: 2.0,
            seasonal_cap_m: 1.0,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("risk_trend_weight", self.trend_weight),
            ("risk_seasonal_weight", self.seasonal_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        let sum = self.trend_weight + self.seasonal_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum(sum));
        }
        let ascending = 0.0 < self.low_threshold
            && self.low_threshold < self.moderate_threshold
            && self.moderate_threshold < self.high_threshold
            && self.high_threshold <= 100.0;
        if !ascending {
            return Err(ConfigError::InvalidThresholds {
                low: self.low_threshold,
                moderate: self.moderate_threshold,
                high: self.high_threshold,
            });
        }
        for (name, value) in [
            ("risk_trend_cap_m", self.trend_cap_m),
            ("risk_seasonal_cap_m", self.seasonal_cap_m),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidCap { name, value });
            }
        }
        Ok(())
    }
}

/// Boundaries on `|slope|` (meters/day) separating Low, Medium and Strong trends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthBands {
    /// Below this the trend is Low.
    pub low_m_per_day: f64,
    /// Below this (and at or above `low_m_per_day`) the trend is Medium.
    pub medium_m_per_day: f64,
}

impl Default for StrengthBands {
    fn default() -> Self {
        Self {
            low_m_per_day: 0.0007,
            medium_m_per_day: 0.0015,
        }
    }
}

impl StrengthBands {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = self.low_m_per_day.is_finite()
            && self.medium_m_per_day.is_finite()
            && 0.0 < self.low_m_per_day
            && self.low_m_per_day < self.medium_m_per_day;
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidStrengthBands {
                low: self.low_m_per_day,
                medium: self.medium_m_per_day,
            })
        }
    }
}

/// Environment variables recognised by [`EngineConfig::with_env_overrides`].
pub const ENV_KEYS: [&str; 8] = [
    "TREND_WINDOW_DAYS",
    "SEASONAL_WINDOW_DAYS",
    "SEASONAL_COMPARISON_YEARS",
    "RISK_TREND_WEIGHT",
    "RISK_SEASONAL_WEIGHT",
    "RISK_LOW_THRESHOLD",
    "RISK_MODERATE_THRESHOLD",
    "RISK_HIGH_THRESHOLD",
];

fn parse_override<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::Env {
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply overrides from the environment (or any other key lookup).
    ///
    /// Keys are the names listed in [`ENV_KEYS`]. Taking the lookup as a
    /// closure keeps callers free to pass `std::env::var` or a fixed map.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ENV_KEYS {
            let Some(value) = lookup(key) else {
                continue;
            };
            match key {
                "TREND_WINDOW_DAYS" => self.trend_window_days = parse_override(key, &value)?,
                "SEASONAL_WINDOW_DAYS" => self.seasonal_window_days = parse_override(key, &value)?,
                "SEASONAL_COMPARISON_YEARS" => self.seasonal_years = parse_override(key, &value)?,
                "RISK_TREND_WEIGHT" => self.risk_trend_weight = parse_override(key, &value)?,
                "RISK_SEASONAL_WEIGHT" => self.risk_seasonal_weight = parse_override(key, &value)?,
                "RISK_LOW_THRESHOLD" => self.risk_low_threshold = parse_override(key, &value)?,
                "RISK_MODERATE_THRESHOLD" => {
                    self.risk_moderate_threshold = parse_override(key, &value)?
                }
                "RISK_HIGH_THRESHOLD" => self.risk_high_threshold = parse_override(key, &value)?,
                _ => {}
            }
        }
        Ok(self)
    }

    pub fn risk_config(&self) -> RiskConfig {
        RiskConfig {
            trend_weight: self.risk_trend_weight,
            seasonal_weight: self.risk_seasonal_weight,
            low_threshold: self.risk_low_threshold,
            moderate_threshold: self.risk_moderate_threshold,
            high_threshold: self.risk_high_threshold,
            trend_cap_m: self.risk_trend_cap_m,
            seasonal_cap_m: self.risk_seasonal_cap_m,
        }
    }

    pub fn strength_bands(&self) -> StrengthBands {
        StrengthBands {
            low_m_per_day: self.strength_low_m_per_day,
            medium_m_per_day: self.strength_medium_m_per_day,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("trend_window_days", self.trend_window_days),
            ("seasonal_window_days", self.seasonal_window_days),
        ] {
            if value == 0 || value > MAX_LOOKBACK_DAYS {
                return Err(ConfigError::InvalidWindow {
                    name,
                    value,
                    max: MAX_LOOKBACK_DAYS,
                });
            }
        }
        let seasonal_lookback = u64::from(self.seasonal_window_days)
            + DAYS_PER_YEAR as u64 * u64::from(self.seasonal_years);
        if self.seasonal_years == 0 || seasonal_lookback > u64::from(MAX_LOOKBACK_DAYS) {
            return Err(ConfigError::InvalidYears {
                value: self.seasonal_years,
                max_lookback_days: MAX_LOOKBACK_DAYS,
            });
        }
        self.risk_config().validate()?;
        self.strength_bands().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.trend_window_days, 90);
        assert_eq!(config.seasonal_years, 3);
        assert_eq!(config.risk_trend_weight, 0.6);
        assert_eq!(config.risk_seasonal_weight, 0.4);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = EngineConfig::from_toml_str("trend_window_days = 60\nseasonal_years = 2\n").unwrap();
        assert_eq!(config.trend_window_days, 60);
        assert_eq!(config.seasonal_years, 2);
        assert_eq!(config.seasonal_window_days, 90);
        assert_eq!(config.risk_high_threshold, 85.0);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = EngineConfig::from_toml_str("trend_windw_days = 60\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_negative_window_fails_to_parse() {
        let result = EngineConfig::from_toml_str("trend_window_days = -5\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_window_is_invalid() {
        let config = EngineConfig {
            seasonal_window_days: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWindow {
                name: "seasonal_window_days",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_years_is_invalid() {
        let config = EngineConfig {
            seasonal_years: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidYears { value: 0, .. })
        ));
    }

    #[test]
    fn test_window_upper_bound() {
        let config = EngineConfig {
            trend_window_days: 100_000_000,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWindow {
                name: "trend_window_days",
                value: 100_000_000,
                ..
            })
        ));
        let config = EngineConfig {
            trend_window_days: MAX_LOOKBACK_DAYS,
            ..EngineConfig::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_seasonal_lookback_upper_bound() {
        let config = EngineConfig {
            seasonal_years: 300_000,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidYears { value: 300_000, .. })
        ));
        let config = EngineConfig {
            seasonal_years: u32::MAX,
            seasonal_window_days: MAX_LOOKBACK_DAYS,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
        // 90 + 365 * 99 fits, 90 + 365 * 100 does not
        let config = EngineConfig {
            seasonal_years: 99,
            ..EngineConfig::default()
        };
        config.validate().unwrap();
        let config = EngineConfig {
            seasonal_years: 100,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let config = EngineConfig {
            risk_trend_weight: 0.7,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::WeightSum(_))));
    }

    #[test]
    fn test_negative_weight_is_invalid() {
        let config = EngineConfig {
            risk_trend_weight: -0.2,
            risk_seasonal_weight: 1.2,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeight {
                name: "risk_trend_weight",
                ..
            })
        ));
    }

    #[test]
    fn test_thresholds_must_ascend() {
        let config = EngineConfig {
            risk_low_threshold: 60.0,
            risk_moderate_threshold: 30.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThresholds { .. })
        ));
        let config = EngineConfig {
            risk_high_threshold: 120.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_caps_must_be_positive() {
        let config = EngineConfig {
            risk_seasonal_cap_m: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCap {
                name: "risk_seasonal_cap_m",
                ..
            })
        ));
    }

    #[test]
    fn test_strength_bands_must_ascend() {
        let config = EngineConfig {
            strength_low_m_per_day: 0.002,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStrengthBands { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TREND_WINDOW_DAYS", "120"),
            ("SEASONAL_COMPARISON_YEARS", "5"),
            ("RISK_TREND_WEIGHT", "0.5"),
            ("RISK_SEASONAL_WEIGHT", " 0.5 "),
        ]);
        let config = EngineConfig::default()
            .with_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.trend_window_days, 120);
        assert_eq!(config.seasonal_years, 5);
        assert_eq!(config.risk_trend_weight, 0.5);
        assert_eq!(config.risk_seasonal_weight, 0.5);
        assert_eq!(config.seasonal_window_days, 90);
        config.validate().unwrap();
    }

    #[test]
    fn test_bad_env_override_is_reported() {
        let result = EngineConfig::default().with_env_overrides(|key| {
            (key == "TREND_WINDOW_DAYS").then(|| "ninety".to_string())
        });
        match result {
            Err(ConfigError::Env { key, value }) => {
                assert_eq!(key, "TREND_WINDOW_DAYS");
                assert_eq!(value, "ninety");
            }
            other => panic!("expected env error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = EngineConfig::load(Path::new("/nonexistent/gwr.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
