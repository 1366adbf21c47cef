//! Analytics engine for groundwater depth series.
//!
//! Three stateless engines run against one station's readings:
//!
//! - [`trend::TrendEngine`] fits a least-squares line over the trailing
//!   trend window and classifies direction and strength.
//! - [`seasonal::SeasonalEngine`] compares the net change over a trailing
//!   window with the same calendar window in prior years.
//! - [`risk::RiskScorer`] blends both into a 0-100 risk index and level.
//!
//! [`analysis::Analyzer`] runs all three for a series and a reference date.
//! Nothing here reads the wall clock or performs I/O apart from loading a
//! configuration file, so identical inputs always give identical results.

pub mod analysis;
pub mod config;
pub mod error;
pub mod regression;
pub mod risk;
pub mod seasonal;
pub mod trend;

pub use analysis::{AnalysisResult, Analyzer};
pub use config::EngineConfig;
pub use error::ConfigError;
pub use risk::{RiskLevel, RiskResult, RiskScorer};
pub use seasonal::{SeasonalEngine, SeasonalResult};
pub use trend::{TrendEngine, TrendResult, TrendStatus, TrendStrength};
