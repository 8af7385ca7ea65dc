use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use buddhabrot_core::SimulationConfig;

use crate::cli::Cli;
use crate::error::AppError;

/// Load a config file.
///
/// An explicitly requested file must exist and parse. The default file next
/// to the executable is optional, and a broken one is reported and ignored.
pub(crate) fn load(explicit: Option<&Path>) -> Result<SimulationConfig, AppError> {
    match explicit {
        Some(path) => read(path),
        None => {
            let path = crate::app_dir::default_config_path();
            if !path.exists() {
                debug!("No config file at {}", path.display());
                return Ok(SimulationConfig::default());
            }
            match read(&path) {
                Ok(config) => Ok(config),
                Err(e) => {
                    error!("{e}; using defaults");
                    Ok(SimulationConfig::default())
                }
            }
        }
    }
}

fn read(path: &Path) -> Result<SimulationConfig, AppError> {
    let json = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&json).map_err(|source| AppError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Persist a config as pretty-printed JSON, creating parent directories.
pub(crate) fn save(config: &SimulationConfig, path: &Path) -> Result<(), AppError> {
    let write_err = |source| AppError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let json = serde_json::to_string_pretty(config).map_err(|source| AppError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(write_err)?;
    info!("Saved config to {}", path.display());
    Ok(())
}

/// Apply command-line overrides on top of a loaded config.
///
/// `--size` also resets the seed grid to four seeds per bin unless `--seeds`
/// is given too.
pub(crate) fn apply_overrides(mut config: SimulationConfig, cli: &Cli) -> SimulationConfig {
    if let Some((w, h)) = cli.size {
        config.bins_x = w;
        config.bins_y = h;
        config.seed_points_x = 4 * w;
        config.seed_points_y = 4 * h;
    }
    if let Some((n_x, n_y)) = cli.seeds {
        config.seed_points_x = n_x;
        config.seed_points_y = n_y;
    }
    if let Some(n) = cli.iterations {
        config.max_iterations_preliminary = n;
        config.max_iterations_final = n;
    }
    if let Some(n) = cli.preliminary {
        config.max_iterations_preliminary = n;
    }
    if let Some(n) = cli.final_iterations {
        config.max_iterations_final = n;
    }
    if let Some(n) = cli.redraw_every {
        config.redraw_every = n;
    }
    if let Some(ms) = cli.delay {
        config.interval_ms = ms;
    }
    config
}

/// Where to write frames: `--output`, or `images/` next to the executable.
pub(crate) fn output_dir(cli: &Cli) -> PathBuf {
    cli.output
        .clone()
        .unwrap_or_else(crate::app_dir::images_directory)
}
