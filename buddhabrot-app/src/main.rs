mod app_dir;
mod cli;
mod commands;
mod driver;
mod error;
mod settings;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use buddhabrot_core::Simulation;

use crate::cli::Cli;
use crate::driver::Driver;
use crate::error::AppError;

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = settings::load(cli.config.as_deref())?;
    let config = settings::apply_overrides(config, cli);
    if let Some(path) = &cli.write_config {
        settings::save(&config, path)?;
    }

    let sim = Simulation::new(config)?;
    let output_dir = settings::output_dir(cli);
    info!("Writing frames to {}", output_dir.display());

    let commands = commands::spawn_stdin_reader();
    let mut driver = Driver::new(sim, output_dir, cli.interactive, commands)?;
    let summary = driver.run()?;

    let progress = driver.simulation().progress();
    info!(
        stage = %progress.stage,
        iteration = progress.iteration,
        ticks = summary.ticks,
        redraws = summary.redraws,
        halts = summary.halts,
        "Done"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
