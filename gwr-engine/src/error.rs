/// Error types for the analytics engine
use thiserror::Error;

/// Invalid or unreadable engine configuration.
///
/// This is the only fatal error class in the engine: sparse data degrades to
/// "insufficient data" results instead.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A window length is zero or longer than the supported look-back
    #[error("{name} must be between 1 and {max} days (got {value})")]
    InvalidWindow {
        name: &'static str,
        value: u32,
        max: u32,
    },

    /// No historical years requested, or so many that the seasonal look-back
    /// exceeds the supported range
    #[error("seasonal_years must be at least 1 and keep seasonal_window_days + 365 * seasonal_years within {max_lookback_days} days (got {value})")]
    InvalidYears { value: u32, max_lookback_days: u32 },

    /// A risk weight is negative or not finite
    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidWeight { name: &'static str, value: f64 },

    /// Risk weights do not add up to one
    #[error("risk weights must sum to 1.0 (got {0})")]
    WeightSum(f64),

    /// Risk level thresholds are not strictly ascending within (0, 100]
    #[error("risk thresholds must satisfy 0 < low < moderate < high <= 100 (got {low}, {moderate}, {high})")]
    InvalidThresholds { low: f64, moderate: f64, high: f64 },

    /// A saturation cap is zero, negative or not finite
    #[error("{name} must be a finite, positive number (got {value})")]
    InvalidCap { name: &'static str, value: f64 },

    /// Trend strength bands are not strictly ascending
    #[error("strength bands must satisfy 0 < low < medium (got {low}, {medium})")]
    InvalidStrengthBands { low: f64, medium: f64 },

    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for this schema
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override could not be parsed
    #[error("Invalid value for environment variable {key}: '{value}'")]
    Env { key: String, value: String },
}
