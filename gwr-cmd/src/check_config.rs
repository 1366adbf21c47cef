//! Validate an engine configuration file without analyzing anything.

use crate::analyze::{load_config_with, process_env};
use log::info;

/// Load `path` (with environment overrides) and validate it.
pub fn run_check_config(path: &str) -> anyhow::Result<()> {
    run_check_config_with(path, process_env)
}

/// [`run_check_config`] with overrides taken from `lookup`.
pub fn run_check_config_with<F>(path: &str, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let config = load_config_with(Some(path), lookup)?;
    config.validate()?;

    info!("Configuration {} is valid", path);
    info!(
        "trend_window_days={} seasonal_window_days={} seasonal_years={}",
        config.trend_window_days, config.seasonal_window_days, config.seasonal_years
    );
    info!(
        "risk weights trend={} seasonal={}, thresholds low={} moderate={} high={}",
        config.risk_trend_weight,
        config.risk_seasonal_weight,
        config.risk_low_threshold,
        config.risk_moderate_threshold,
        config.risk_high_threshold
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run_check_config_with;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(name: &str, body: &str) -> String {
        let path = std::env::temp_dir().join(format!("gwr-check-{}-{}.toml", std::process::id(), name));
        std::fs::write(&path, body).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_valid_config() {
        let path = write_config("valid", "seasonal_years = 5\nrisk_high_threshold = 90.0\n");
        run_check_config_with(&path, no_env).unwrap();
    }

    #[test]
    fn test_invalid_config() {
        let path = write_config("invalid", "seasonal_window_days = 0\n");
        let err = run_check_config_with(&path, no_env).unwrap_err();
        assert!(err.to_string().contains("seasonal_window_days"));
    }

    #[test]
    fn test_env_override_is_validated() {
        let path = write_config("env", "trend_window_days = 60\n");
        run_check_config_with(&path, no_env).unwrap();
        let env = |key: &str| (key == "TREND_WINDOW_DAYS").then(|| "0".to_string());
        let err = run_check_config_with(&path, env).unwrap_err();
        assert!(err.to_string().contains("trend_window_days"));
    }

    #[test]
    fn test_out_of_range_lookback() {
        let path = write_config("lookback", "seasonal_years = 300000\n");
        let err = run_check_config_with(&path, no_env).unwrap_err();
        assert!(err.to_string().contains("seasonal_years"));
    }

    #[test]
    fn test_unparseable_config() {
        let path = write_config("garbled", "trend_window_days = \"ninety\"\n");
        assert!(run_check_config_with(&path, no_env).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(run_check_config_with("/nonexistent/gwr.toml", no_env).is_err());
    }
}
