mod config;
mod output;

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use cyclereach_core::{
    Error,
    loading::{
        AsciiGrid, destinations::read_destinations, prepare_network,
        streets::read_street_features,
    },
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{config::RunConfig, output::write_outputs};

/// Cycling accessibility of destinations from a fixed origin
#[derive(Parser, Debug)]
#[command(name = "cyclereach", version)]
#[command(about = "Which shelters can be reached by bike within a time budget", long_about = None)]
struct Args {
    /// Path to the TOML run configuration
    #[arg(short, long, default_value = "cyclereach.toml")]
    config: PathBuf,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output directory, overrides `[output] dir`
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.stage() {
                Some(stage) => error!(%stage, "{e}"),
                None => error!("{e}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    info!("Starting cyclereach v{}", env!("CARGO_PKG_VERSION"));
    let config = RunConfig::load(&args.config)?;

    info!("Reading streets from {}", config.input.streets.display());
    let streets = read_street_features(&config.input.streets)?;
    info!("Reading shelters from {}", config.input.shelters.display());
    let shelters = read_destinations(&config.input.shelters)?;
    info!("Reading elevation from {}", config.input.elevation.display());
    let elevation = AsciiGrid::from_path(&config.input.elevation)?;

    let network = prepare_network(&streets, &elevation, &config.analysis)?;
    let (destinations, report) = network.analyze(shelters, &config.analysis);

    for scenario in &report.scenarios {
        println!(
            "{}: {} of {} shelters reachable within {} min on {} streets",
            scenario.name,
            scenario.reachable_count,
            report.destinations_used,
            scenario.time_threshold_min,
            scenario.suitability_filter
        );
    }

    let dir = args
        .output
        .clone()
        .or_else(|| config.output.as_ref().map(|o| o.dir.clone()));
    if let Some(dir) = dir {
        let written = write_outputs(&dir, &network, &destinations, &report)?;
        info!("Wrote {} files to {}", written.len(), dir.display());
    }

    Ok(())
}
