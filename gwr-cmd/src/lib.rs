//! Command implementations for GWR CLI.
//!
//! Provides subcommands for scoring groundwater stations from CSV exports
//! and for validating engine configuration files.

use clap::Subcommand;

pub mod analyze;
pub mod check_config;

#[derive(Subcommand)]
pub enum Command {
    /// Analyze trend, seasonal deviation and risk for every station in a readings CSV
    Analyze {
        /// Path to the readings CSV (station_id,timestamp,depth_m,quality_flag,source)
        #[arg(short = 'r', long)]
        readings: String,

        /// Optional station registry CSV used to attach station metadata
        #[arg(short = 's', long)]
        stations: Option<String>,

        /// Optional engine configuration TOML
        #[arg(short = 'c', long)]
        config: Option<String>,

        /// Only analyze this station
        #[arg(long)]
        station: Option<String>,

        /// Reference date for the seasonal comparison (defaults to each station's latest reading)
        #[arg(long)]
        as_of: Option<String>,

        /// Output path for the JSON report (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Load and validate an engine configuration file
    CheckConfig {
        /// Path to the engine configuration TOML
        #[arg(short = 'c', long)]
        config: String,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Analyze {
            readings,
            stations,
            config,
            station,
            as_of,
            output,
        } => {
            let options = analyze::AnalyzeOptions {
                readings_csv: readings,
                stations_csv: stations,
                config_path: config,
                station,
                as_of,
                output,
            };
            analyze::run_analyze(&options).await
        }
        Command::CheckConfig { config } => check_config::run_check_config(&config),
    }
}
