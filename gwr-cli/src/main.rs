//! GWR CLI - Command line tool for groundwater trend and risk analysis.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "gwr-cli",
    version,
    about = "Groundwater depth trend, seasonal deviation and risk toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: gwr_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    gwr_cmd::run(cli.command).await
}
