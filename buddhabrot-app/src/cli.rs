use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

/// Parse `"<l><sep><r>"` into a pair, e.g. `"800x600"`.
pub(crate) fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let (l, r) = s.split_once(separator)?;
    match (T::from_str(l.trim()), T::from_str(r.trim())) {
        (Ok(l), Ok(r)) => Some((l, r)),
        _ => None,
    }
}

fn parse_resolution(s: &str) -> Result<(usize, usize), String> {
    match parse_pair::<usize>(s, 'x') {
        Some((w, h)) if w > 0 && h > 0 => Ok((w, h)),
        Some(_) => Err("both dimensions must be at least 1".to_string()),
        None => Err(format!("expected WIDTHxHEIGHT, got '{s}'")),
    }
}

/// Headless Buddhabrot renderer.
///
/// Runs the two-stage simulation, writing the composited image to
/// `<output>/latest.png` on every redraw and `<output>/buddhabrot.png` when
/// the run halts. Type `start`, `stop`, `reset`, `status`, `render`,
/// `set iterations N`, `set redraw N`, `set delay MS`, or `quit` on stdin to
/// control a running simulation.
#[derive(Debug, Parser)]
#[command(name = "buddhabrot", version)]
pub(crate) struct Cli {
    /// JSON config file (defaults to buddhabrot.json next to the executable).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for rendered frames (defaults to images/ next to the executable).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Image and histogram size; also sets the seed grid to 4x this.
    #[arg(short, long, value_parser = parse_resolution, value_name = "WxH")]
    pub size: Option<(usize, usize)>,

    /// Seed grid resolution.
    #[arg(long, value_parser = parse_resolution, value_name = "NxM")]
    pub seeds: Option<(usize, usize)>,

    /// Iteration threshold for both stages.
    #[arg(short, long)]
    pub iterations: Option<u64>,

    /// Iteration threshold for the Preliminary stage.
    #[arg(long)]
    pub preliminary: Option<u64>,

    /// Iteration threshold for the Final stage.
    #[arg(long = "final")]
    pub final_iterations: Option<u64>,

    /// Redraw once more than this many ticks have passed.
    #[arg(short, long)]
    pub redraw_every: Option<u64>,

    /// Delay between ticks in milliseconds.
    #[arg(short, long, value_name = "MS")]
    pub delay: Option<u64>,

    /// Keep waiting for commands after the run halts.
    #[arg(long)]
    pub interactive: bool,

    /// Write the effective config to this path and continue.
    #[arg(long, value_name = "PATH")]
    pub write_config: Option<PathBuf>,
}
