//! stowage - stack transfer, quick-stack and sorting engine for slot containers
//!
//! Command-line runner for storage scenarios

mod config;
mod scenario;

use anyhow::{Context, Result};
use clap::Parser;
use config::StowageConfig;
use scenario::Scenario;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Run storage scenarios through the stowage engine",
    long_about = None
)]
struct Args {
    /// Scenario file (TOML) describing the player, nearby storages and actions
    scenario: PathBuf,

    /// Player options (hotbar protection, quick stack mode, sort type, ...)
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Write the effective options back to the config path
    #[arg(long)]
    write_config: bool,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting stowage v{}", env!("CARGO_PKG_VERSION"));

    let config = StowageConfig::load_from_path(&args.config);
    if args.write_config {
        config.save_to_path(&args.config)?;
        info!("Wrote options to {}", args.config.display());
    }

    let scenario = Scenario::load(&args.scenario)?;
    let report = scenario
        .run(&config)
        .with_context(|| format!("failed to run {}", args.scenario.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{json}");
    } else {
        print!("{}", report.to_text());
    }

    Ok(())
}
