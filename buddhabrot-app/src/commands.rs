use std::io::BufRead;
use std::str::FromStr;
use std::sync::mpsc;

use tracing::{debug, warn};

/// A control request typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Start,
    Stop,
    Reset,
    Quit,
    Status,
    /// Render and write `latest.png` now, regardless of the redraw cadence.
    Render,
    /// Set both stage thresholds.
    SetIterations(u64),
    SetRedrawEvery(u64),
    SetDelay(u64),
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let number = |w: &str| {
            w.parse::<u64>()
                .map_err(|_| format!("expected a non-negative integer, got '{w}'"))
        };
        match words.as_slice() {
            ["start"] => Ok(Self::Start),
            ["stop"] => Ok(Self::Stop),
            ["reset"] => Ok(Self::Reset),
            ["quit"] | ["exit"] => Ok(Self::Quit),
            ["status"] => Ok(Self::Status),
            ["render"] => Ok(Self::Render),
            ["set", "iterations", n] => number(*n).map(Self::SetIterations),
            ["set", "redraw", n] => number(*n).map(Self::SetRedrawEvery),
            ["set", "delay", n] => number(*n).map(Self::SetDelay),
            [] => Err("empty command".to_string()),
            _ => Err(format!("unknown command '{}'", s.trim())),
        }
    }
}

/// Spawn a thread that reads commands from stdin, one per line.
///
/// Unparseable lines are logged and skipped. The thread exits at end of
/// input or once the receiver is dropped; either way the channel
/// disconnects.
pub(crate) fn spawn_stdin_reader() -> mpsc::Receiver<Command> {
    let (tx, rx) = mpsc::channel::<Command>();

    let spawned = std::thread::Builder::new()
        .name("stdin-commands".into())
        .spawn(move || {
            debug!("Command reader started");
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("Failed to read stdin: {e}");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(cmd) => {
                        if tx.send(cmd).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("{e}"),
                }
            }
            debug!("Command reader exiting");
        });

    if let Err(e) = spawned {
        // The returned receiver is already disconnected; the driver treats
        // that the same as closed stdin.
        warn!("Failed to spawn command reader: {e}");
    }
    rx
}
