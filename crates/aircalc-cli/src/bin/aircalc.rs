//! aircalc - aviation planning calculators

use std::path::PathBuf;

use aircalc_cli::{run, Command};
use aircalc_core::sensor::SensorCatalog;
use aircalc_worker::WorkerConfig;
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Sensor catalog JSON; built-in sensors are used when omitted
    #[arg(long, env = "AIRCALC_SENSOR_CATALOG")]
    catalog: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::registry()
        .with(
            args.json_logs
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!args.json_logs)
                .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("aircalc=info".parse()?)
                .add_directive("aircalc_cli=info".parse()?)
                .add_directive("aircalc_core=info".parse()?)
                .add_directive("aircalc_worker=info".parse()?),
        )
        .init();

    let catalog = match &args.catalog {
        Some(path) => SensorCatalog::from_path(path)
            .with_context(|| format!("loading sensor catalog {}", path.display()))?,
        None => SensorCatalog::default(),
    };
    let worker = WorkerConfig::from_env();
    tracing::debug!(sensors = catalog.sensors.len(), ?worker, "Configuration loaded");

    let report = run(args.command, &catalog, &worker).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
