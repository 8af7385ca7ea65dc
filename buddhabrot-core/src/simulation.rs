use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::field::PointField;
use crate::histogram::Histogram2D;

// ---------------------------------------------------------------------------
// Stage and tick outcome
// ---------------------------------------------------------------------------

/// The two phases of a run. Transitions only go Preliminary → Final;
/// [`Simulation::reset`] is the only way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Iterating the full seed grid to discover which seeds diverge.
    Preliminary,
    /// Re-running only the divergent seeds to record their trajectories.
    Final,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Preliminary => "Preliminary",
            Self::Final => "Final",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// [`Simulation::stop`] was called.
    Stopped,
    /// The Final stage ran past `max_iterations_final`.
    Completed,
}

/// What a single call to [`Simulation::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The simulation is not running; nothing happened.
    Idle,
    /// The run ended at the top of this tick. No points were advanced.
    Halted(HaltReason),
    /// Every point advanced one step and the histograms were updated.
    Advanced {
        stage: Stage,
        iteration: u64,
        /// The redraw cadence elapsed; the caller should render a snapshot.
        redraw: bool,
    },
}

/// Progress information for a status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub stage: Stage,
    pub iteration: u64,
    pub points: usize,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// An owned, normalized copy of the three histograms.
///
/// Taking a snapshot ends the borrow of the simulation, so a renderer can
/// work on it while ticking continues.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    pub stage: Stage,
    pub iteration: u64,
    /// Bounded set of the current Preliminary tick, by seed origin.
    pub mandelbrot_set: Vec<f64>,
    /// Cumulative Preliminary trajectory density.
    pub all_trajectories: Vec<f64>,
    /// Cumulative Final-stage trajectory density of divergent seeds.
    pub diverged_trajectories: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Two-stage Buddhabrot accumulator driven by an external tick source.
///
/// The embedder calls [`start`](Self::start) and then [`tick`](Self::tick)
/// repeatedly (from a timer, a frame callback, or a plain loop) until it
/// returns [`TickOutcome::Halted`].
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    stage: Stage,
    iterations: u64,
    ticks_since_redraw: u64,
    field: PointField,
    mandelbrot_set: Histogram2D,
    all_trajectories: Histogram2D,
    diverged_trajectories: Histogram2D,
    running: bool,
    stop_requested: bool,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> crate::Result<Self> {
        config.validate()?;

        let histogram =
            || Histogram2D::new(config.view_bounds, config.bins_x, config.bins_y);
        let mandelbrot_set = histogram()?;
        let all_trajectories = histogram()?;
        let diverged_trajectories = histogram()?;
        let field = PointField::new(
            config.seed_bounds,
            config.seed_points_x,
            config.seed_points_y,
        )?;

        info!(
            bins_x = config.bins_x,
            bins_y = config.bins_y,
            points = field.len(),
            view = %config.view_bounds,
            seeds = %config.seed_bounds,
            "Simulation created"
        );

        Ok(Self {
            config,
            stage: Stage::Preliminary,
            iterations: 0,
            ticks_since_redraw: 0,
            field,
            mandelbrot_set,
            all_trajectories,
            diverged_trajectories,
            running: false,
            stop_requested: false,
        })
    }

    // -- Accessors --

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Ticks run in the current stage.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn field(&self) -> &PointField {
        &self.field
    }

    pub fn mandelbrot_set(&self) -> &Histogram2D {
        &self.mandelbrot_set
    }

    pub fn all_trajectories(&self) -> &Histogram2D {
        &self.all_trajectories
    }

    pub fn diverged_trajectories(&self) -> &Histogram2D {
        &self.diverged_trajectories
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn progress(&self) -> Progress {
        Progress {
            stage: self.stage,
            iteration: self.iterations,
            points: self.field.len(),
        }
    }

    // -- Runtime settings --

    /// Change both stage thresholds. Takes effect at the next tick.
    pub fn set_thresholds(&mut self, preliminary: u64, final_stage: u64) {
        self.config.max_iterations_preliminary = preliminary;
        self.config.max_iterations_final = final_stage;
        debug!(preliminary, final_stage, "Thresholds updated");
    }

    pub fn set_redraw_every(&mut self, ticks: u64) {
        self.config.redraw_every = ticks;
    }

    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.config.interval_ms = interval_ms;
    }

    // -- Controls --

    /// Begin (or continue) ticking. No-op if already running.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            info!(stage = %self.stage, iteration = self.iterations, "Simulation started");
        }
    }

    /// Ask the run to halt at the top of the next tick. No-op unless running.
    pub fn stop(&mut self) {
        if self.running {
            self.stop_requested = true;
        }
    }

    /// Stop, clear every histogram, and rebuild the full seed grid.
    pub fn reset(&mut self) {
        self.running = false;
        self.stop_requested = false;
        self.iterations = 0;
        self.ticks_since_redraw = 0;
        self.field.regenerate();
        self.mandelbrot_set.clear();
        self.all_trajectories.clear();
        self.diverged_trajectories.clear();
        self.stage = Stage::Preliminary;
        info!(points = self.field.len(), "Simulation reset");
    }

    /// Keep only the seeds that diverged, as fresh orbits, and switch to
    /// [`Stage::Final`]. No-op if already in the Final stage.
    pub fn enter_final_stage(&mut self) {
        if self.stage == Stage::Final {
            return;
        }
        self.field.retain_diverged();
        self.iterations = 0;
        self.stage = Stage::Final;
        info!(points = self.field.len(), "Entering final stage");
    }

    // -- Tick --

    /// Run one step of the state machine.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        let completed =
            self.stage == Stage::Final && self.iterations > self.config.max_iterations_final;
        if self.stop_requested || completed {
            let reason = if self.stop_requested {
                HaltReason::Stopped
            } else {
                HaltReason::Completed
            };
            self.running = false;
            self.stop_requested = false;
            info!(?reason, stage = %self.stage, iteration = self.iterations, "Simulation halted");
            return TickOutcome::Halted(reason);
        }

        if self.stage == Stage::Preliminary
            && self.iterations > self.config.max_iterations_preliminary
        {
            self.enter_final_stage();
        }

        self.field.advance_all();
        self.iterations += 1;
        self.ticks_since_redraw += 1;

        match self.stage {
            Stage::Preliminary => self.update_histograms_preliminary(),
            Stage::Final => self.update_histograms_final(),
        }

        let redraw = self.ticks_since_redraw > self.config.redraw_every;
        if redraw {
            self.ticks_since_redraw = 0;
        }

        TickOutcome::Advanced {
            stage: self.stage,
            iteration: self.iterations,
            redraw,
        }
    }

    /// `mandelbrot_set` shows only the current bounded set, so it is rebuilt
    /// every tick; `all_trajectories` keeps accumulating.
    fn update_histograms_preliminary(&mut self) {
        self.mandelbrot_set.clear();
        for point in self.field.bounded() {
            let origin = point.origin();
            let position = point.position();
            self.mandelbrot_set.fill(origin.re, origin.im);
            self.all_trajectories.fill(position.re, position.im);
        }
    }

    /// Escaped orbits stop contributing once past the escape radius.
    fn update_histograms_final(&mut self) {
        for point in self.field.bounded() {
            let position = point.position();
            self.diverged_trajectories.fill(position.re, position.im);
        }
    }

    /// Normalize all three histograms into an owned [`Snapshot`].
    pub fn snapshot(&self) -> Snapshot {
        let (width, height) = self.mandelbrot_set.bins();
        Snapshot {
            width,
            height,
            stage: self.stage,
            iteration: self.iterations,
            mandelbrot_set: self.mandelbrot_set.normalized(),
            all_trajectories: self.all_trajectories.normalized(),
            diverged_trajectories: self.diverged_trajectories.normalized(),
        }
    }
}
