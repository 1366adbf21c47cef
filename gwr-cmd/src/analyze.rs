//! Batch analysis of every station in a readings export.

use anyhow::Context;
use chrono::NaiveDateTime;
use gwr_core::reading::{group_by_station, parse_readings_csv, Reading};
use gwr_core::station::{find_station, Station};
use gwr_engine::{AnalysisResult, Analyzer, EngineConfig};
use gwr_utils::dates::parse_timestamp;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Inputs of the `analyze` subcommand.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub readings_csv: String,
    pub stations_csv: Option<String>,
    pub config_path: Option<String>,
    pub station: Option<String>,
    pub as_of: Option<String>,
    pub output: Option<String>,
}

/// One station's analysis, with registry metadata when it is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    pub station: Option<Station>,
    pub analysis: AnalysisResult,
}

/// Process environment lookup used for configuration overrides.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Build the engine configuration: defaults, then the TOML file if given,
/// then overrides from `lookup`.
pub fn load_config_with<F>(path: Option<&str>, lookup: F) -> anyhow::Result<EngineConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match path {
        Some(path) => EngineConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config {}", path))?,
        None => EngineConfig::default(),
    };
    let config = config.with_env_overrides(lookup)?;
    Ok(config)
}

/// [`load_config_with`] reading overrides from the process environment.
pub fn load_config(path: Option<&str>) -> anyhow::Result<EngineConfig> {
    load_config_with(path, process_env)
}

/// Run the analyzer over each station's series, one blocking task per station.
///
/// Reports come back in station id order regardless of which task finishes
/// first.
pub async fn analyze_stations(
    analyzer: Arc<Analyzer>,
    series_by_station: BTreeMap<String, Vec<Reading>>,
    stations: &[Station],
    as_of: Option<NaiveDateTime>,
) -> anyhow::Result<Vec<StationReport>> {
    let mut tasks = JoinSet::new();
    for (station_id, series) in series_by_station {
        let analyzer = Arc::clone(&analyzer);
        tasks.spawn_blocking(move || (station_id, analyzer.analyze(&series, as_of)));
    }

    let mut results: BTreeMap<String, AnalysisResult> = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        let (station_id, analysis) = joined.context("Station analysis task failed")?;
        results.insert(station_id, analysis);
    }

    let reports = results
        .into_iter()
        .map(|(station_id, analysis)| {
            let station = find_station(stations, &station_id).cloned();
            if station.is_none() && !stations.is_empty() {
                warn!("Station {} is not in the station registry", station_id);
            }
            StationReport { station, analysis }
        })
        .collect();
    Ok(reports)
}

/// Load inputs named by `options` and analyze them, taking configuration
/// overrides from `lookup`.
pub async fn build_reports_with<F>(
    options: &AnalyzeOptions,
    lookup: F,
) -> anyhow::Result<Vec<StationReport>>
where
    F: Fn(&str) -> Option<String>,
{
    let config = load_config_with(options.config_path.as_deref(), lookup)?;
    let analyzer = Arc::new(Analyzer::new(config).context("Invalid engine configuration")?);

    let as_of = options
        .as_of
        .as_deref()
        .map(parse_timestamp)
        .transpose()
        .context("Invalid --as-of value")?;

    let body = std::fs::read_to_string(&options.readings_csv)
        .with_context(|| format!("Failed to read readings CSV {}", options.readings_csv))?;
    let readings = parse_readings_csv(&body)
        .with_context(|| format!("Failed to parse readings CSV {}", options.readings_csv))?;

    let stations = match &options.stations_csv {
        Some(path) => {
            let body = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read stations CSV {}", path))?;
            Station::parse_station_csv(&body)
                .with_context(|| format!("Failed to parse stations CSV {}", path))?
        }
        None => Vec::new(),
    };

    let mut series_by_station = group_by_station(readings);
    if let Some(only) = &options.station {
        series_by_station.retain(|station_id, _| station_id == only);
        if series_by_station.is_empty() {
            anyhow::bail!("No readings found for station {}", only);
        }
    }

    info!(
        "Analyzing {} stations from {}",
        series_by_station.len(),
        options.readings_csv
    );
    analyze_stations(analyzer, series_by_station, &stations, as_of).await
}

/// [`build_reports_with`] reading overrides from the process environment.
pub async fn build_reports(options: &AnalyzeOptions) -> anyhow::Result<Vec<StationReport>> {
    build_reports_with(options, process_env).await
}

/// Write reports as pretty JSON to `output`, or stdout when it is `None`.
pub fn write_report(reports: &[StationReport], output: Option<&str>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(reports)?;

    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path))?;
            info!("Analysis complete. Output: {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Run the `analyze` subcommand and write the JSON report.
pub async fn run_analyze(options: &AnalyzeOptions) -> anyhow::Result<()> {
    let reports = build_reports(options).await?;
    write_report(&reports, options.output.as_deref())
}
