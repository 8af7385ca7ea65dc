use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::error::CoreError;

/// Parameters for a [`Simulation`](crate::Simulation).
///
/// Every field has a serde default so a partial JSON file (or `{}`) loads.
/// Call [`validate`](Self::validate) before use; `Simulation::new` does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Region of the plane the histograms cover (the visible window).
    #[serde(default)]
    pub view_bounds: Bounds,
    /// Histogram resolution, which is also the output image size.
    #[serde(default = "default_bins")]
    pub bins_x: usize,
    #[serde(default = "default_bins")]
    pub bins_y: usize,

    /// Region the seed grid is laid over.
    #[serde(default)]
    pub seed_bounds: Bounds,
    /// Seed grid resolution. Defaults to four seeds per histogram bin.
    #[serde(default = "default_seed_points")]
    pub seed_points_x: usize,
    #[serde(default = "default_seed_points")]
    pub seed_points_y: usize,

    /// Ticks the Preliminary stage runs before switching to Final.
    #[serde(default = "default_max_iterations")]
    pub max_iterations_preliminary: u64,
    /// Ticks the Final stage runs before the simulation halts.
    #[serde(default = "default_max_iterations")]
    pub max_iterations_final: u64,

    /// A redraw is requested once more than this many ticks have passed.
    #[serde(default = "default_redraw_every")]
    pub redraw_every: u64,
    /// Delay between ticks, consumed by the tick driver.
    #[serde(default)]
    pub interval_ms: u64,
}

fn default_bins() -> usize {
    400
}
fn default_seed_points() -> usize {
    4 * default_bins()
}
fn default_max_iterations() -> u64 {
    100
}
fn default_redraw_every() -> u64 {
    10
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            view_bounds: Bounds::default(),
            bins_x: default_bins(),
            bins_y: default_bins(),
            seed_bounds: Bounds::default(),
            seed_points_x: default_seed_points(),
            seed_points_y: default_seed_points(),
            max_iterations_preliminary: default_max_iterations(),
            max_iterations_final: default_max_iterations(),
            redraw_every: default_redraw_every(),
            interval_ms: 0,
        }
    }
}

impl SimulationConfig {
    /// A config whose histogram is `bins_x × bins_y` and whose seed grid is
    /// four times denser in each direction.
    pub fn with_canvas(bins_x: usize, bins_y: usize) -> Self {
        Self {
            bins_x,
            bins_y,
            seed_points_x: 4 * bins_x,
            seed_points_y: 4 * bins_y,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.view_bounds.validate()?;
        self.seed_bounds.validate()?;
        if self.bins_x == 0 || self.bins_y == 0 {
            return Err(CoreError::InvalidBins {
                bins_x: self.bins_x,
                bins_y: self.bins_y,
            });
        }
        if self.seed_points_x == 0 || self.seed_points_y == 0 {
            return Err(CoreError::InvalidResolution {
                n_x: self.seed_points_x,
                n_y: self.seed_points_y,
            });
        }
        Ok(())
    }
}
