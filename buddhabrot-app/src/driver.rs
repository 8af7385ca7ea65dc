use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use buddhabrot_core::{HaltReason, Simulation, Stage, TickOutcome};
use buddhabrot_render::{composite, export_png, ExportMetadata};

use crate::commands::Command;
use crate::error::AppError;

/// File rewritten on every redraw.
pub(crate) const LATEST_FRAME: &str = "latest.png";
/// File written when a run halts.
pub(crate) const FINAL_FRAME: &str = "buddhabrot.png";

/// Whether the driver loop should keep going after handling a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Counters reported when the driver loop exits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub ticks: u64,
    pub redraws: u64,
    pub halts: u64,
}

/// The tick source: repeatedly ticks a [`Simulation`], sleeps for the
/// configured interval, renders on the redraw cadence, and applies commands
/// between ticks.
pub(crate) struct Driver {
    sim: Simulation,
    output_dir: PathBuf,
    interactive: bool,
    commands: mpsc::Receiver<Command>,
    commands_closed: bool,
    last_stage: Stage,
    summary: RunSummary,
}

impl Driver {
    pub(crate) fn new(
        sim: Simulation,
        output_dir: PathBuf,
        interactive: bool,
        commands: mpsc::Receiver<Command>,
    ) -> Result<Self, AppError> {
        std::fs::create_dir_all(&output_dir).map_err(|source| AppError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;
        let last_stage = sim.stage();
        Ok(Self {
            sim,
            output_dir,
            interactive,
            commands,
            commands_closed: false,
            last_stage,
            summary: RunSummary::default(),
        })
    }

    pub(crate) fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Start the simulation and drive it until it halts (or, in interactive
    /// mode, until `quit` or end of input).
    pub(crate) fn run(&mut self) -> Result<RunSummary, AppError> {
        self.sim.start();
        let started = Instant::now();

        loop {
            if self.drain_commands() == Flow::Quit {
                break;
            }

            if !self.sim.is_running() {
                if !self.interactive || self.commands_closed {
                    break;
                }
                // Idle: block until the next command arrives.
                match self.commands.recv() {
                    Ok(cmd) => {
                        if self.apply(cmd) == Flow::Quit {
                            break;
                        }
                    }
                    Err(_) => self.commands_closed = true,
                }
                continue;
            }

            match self.sim.tick() {
                TickOutcome::Advanced {
                    stage,
                    iteration,
                    redraw,
                } => {
                    self.summary.ticks += 1;
                    debug!(%stage, iteration, "Progress");
                    if stage != self.last_stage {
                        info!(%stage, points = self.sim.field().len(), "Stage changed");
                        self.last_stage = stage;
                    }
                    if redraw {
                        self.draw_latest();
                    }
                }
                TickOutcome::Halted(reason) => {
                    self.summary.halts += 1;
                    self.draw_final(reason)?;
                }
                TickOutcome::Idle => {}
            }

            let interval = self.sim.config().interval_ms;
            if interval > 0 {
                std::thread::sleep(Duration::from_millis(interval));
            }
        }

        info!(
            elapsed_ms = started.elapsed().as_millis(),
            ticks = self.summary.ticks,
            redraws = self.summary.redraws,
            "Driver finished"
        );
        Ok(self.summary)
    }

    fn drain_commands(&mut self) -> Flow {
        if self.commands_closed {
            return Flow::Continue;
        }
        loop {
            match self.commands.try_recv() {
                Ok(cmd) => {
                    if self.apply(cmd) == Flow::Quit {
                        return Flow::Quit;
                    }
                }
                Err(TryRecvError::Empty) => return Flow::Continue,
                Err(TryRecvError::Disconnected) => {
                    self.commands_closed = true;
                    return Flow::Continue;
                }
            }
        }
    }

    fn apply(&mut self, cmd: Command) -> Flow {
        debug!(?cmd, "Command received");
        match cmd {
            Command::Start => self.sim.start(),
            Command::Stop => self.sim.stop(),
            Command::Reset => {
                self.sim.reset();
                self.last_stage = self.sim.stage();
                // Batch mode has no one to send `start`, so restart right away.
                if !self.interactive {
                    self.sim.start();
                }
            }
            Command::Quit => return Flow::Quit,
            Command::Status => {
                let p = self.sim.progress();
                info!(
                    stage = %p.stage,
                    iteration = p.iteration,
                    points = p.points,
                    running = self.sim.is_running(),
                    "Status"
                );
            }
            Command::Render => self.draw_latest(),
            Command::SetIterations(n) => self.sim.set_thresholds(n, n),
            Command::SetRedrawEvery(n) => self.sim.set_redraw_every(n),
            Command::SetDelay(ms) => self.sim.set_interval_ms(ms),
        }
        Flow::Continue
    }

    fn write_frame(&self, name: &str) -> Result<PathBuf, AppError> {
        let path = self.output_dir.join(name);
        let buffer = composite(&self.sim.snapshot())?;
        export_png(&buffer, &path, &ExportMetadata::from_simulation(&self.sim))?;
        Ok(path)
    }

    /// Intermediate frames are best effort; a failed write is logged and the
    /// run continues.
    fn draw_latest(&mut self) {
        match self.write_frame(LATEST_FRAME) {
            Ok(path) => {
                self.summary.redraws += 1;
                let p = self.sim.progress();
                info!(stage = %p.stage, iteration = p.iteration, "Redrew {}", path.display());
            }
            Err(e) => error!("Redraw failed: {e}"),
        }
    }

    fn draw_final(&mut self, reason: HaltReason) -> Result<(), AppError> {
        let path = self.write_frame(FINAL_FRAME)?;
        self.summary.redraws += 1;
        info!(?reason, "Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddhabrot_core::SimulationConfig;

    fn small_sim() -> Simulation {
        Simulation::new(SimulationConfig {
            max_iterations_preliminary: 4,
            max_iterations_final: 4,
            redraw_every: 2,
            ..SimulationConfig::with_canvas(16, 16)
        })
        .unwrap()
    }

    fn out_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join("buddhabrot_driver_test").join(name)
    }

    #[test]
    fn batch_run_completes_and_writes_frames() {
        let dir = out_dir("batch");
        let (_tx, rx) = mpsc::channel();
        let mut driver = Driver::new(small_sim(), dir.clone(), false, rx).unwrap();

        let summary = driver.run().unwrap();
        // 5 Preliminary ticks + 5 Final ticks.
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.halts, 1);
        // Redraw every third tick (counter > 2) plus the final frame.
        assert_eq!(summary.redraws, 4);
        assert!(dir.join(LATEST_FRAME).exists());
        assert!(dir.join(FINAL_FRAME).exists());
        assert_eq!(driver.simulation().stage(), Stage::Final);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn queued_stop_halts_before_first_tick() {
        let dir = out_dir("stop");
        let (tx, rx) = mpsc::channel();
        tx.send(Command::Stop).unwrap();
        drop(tx);
        let mut driver = Driver::new(small_sim(), dir.clone(), false, rx).unwrap();

        let summary = driver.run().unwrap();
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.halts, 1);
        assert!(dir.join(FINAL_FRAME).exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn quit_exits_immediately() {
        let dir = out_dir("quit");
        let (tx, rx) = mpsc::channel();
        tx.send(Command::Quit).unwrap();
        let mut driver = Driver::new(small_sim(), dir.clone(), true, rx).unwrap();

        let summary = driver.run().unwrap();
        assert_eq!(summary, RunSummary::default());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn interactive_mode_waits_for_commands_after_halt() {
        let dir = out_dir("interactive");
        let (tx, rx) = mpsc::channel();
        // Commands queued up front are applied before the first tick, so the
        // thresholds change before the run starts.
        tx.send(Command::SetIterations(1)).unwrap();
        tx.send(Command::SetRedrawEvery(100)).unwrap();
        drop(tx);
        let mut driver = Driver::new(small_sim(), dir.clone(), true, rx).unwrap();

        let summary = driver.run().unwrap();
        // 2 Preliminary + 2 Final ticks, then the closed channel ends the wait.
        assert_eq!(summary.ticks, 4);
        assert_eq!(summary.redraws, 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn reset_command_restarts_from_preliminary() {
        let dir = out_dir("reset");
        let (tx, rx) = mpsc::channel();
        tx.send(Command::Reset).unwrap();
        tx.send(Command::Start).unwrap();
        drop(tx);
        let mut driver = Driver::new(small_sim(), dir.clone(), true, rx).unwrap();

        let summary = driver.run().unwrap();
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.halts, 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn batch_reset_restarts_and_still_writes_final_frame() {
        let dir = out_dir("batch_reset");
        let (tx, rx) = mpsc::channel();
        tx.send(Command::Reset).unwrap();
        drop(tx);
        let mut driver = Driver::new(small_sim(), dir.clone(), false, rx).unwrap();

        let summary = driver.run().unwrap();
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.halts, 1);
        assert!(dir.join(FINAL_FRAME).exists());
        assert_eq!(driver.simulation().stage(), Stage::Final);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn zero_iterations_command_is_applied() {
        let dir = out_dir("zero_iterations");
        let (tx, rx) = mpsc::channel();
        tx.send(Command::SetIterations(0)).unwrap();
        drop(tx);
        let mut driver = Driver::new(small_sim(), dir.clone(), false, rx).unwrap();

        let summary = driver.run().unwrap();
        // One tick per stage.
        assert_eq!(summary.ticks, 2);
        assert_eq!(summary.halts, 1);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
