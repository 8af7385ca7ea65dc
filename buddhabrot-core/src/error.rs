use thiserror::Error;

/// Errors originating from the simulation core.
///
/// All of these are configuration errors raised at construction time;
/// stepping a simulation never fails.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid bounds: {reason}")]
    InvalidBounds { reason: String },

    #[error("invalid histogram bins: {bins_x}×{bins_y} (both must be >= 1)")]
    InvalidBins { bins_x: usize, bins_y: usize },

    #[error("invalid seed resolution: {n_x}×{n_y} (both must be >= 1)")]
    InvalidResolution { n_x: usize, n_y: usize },

    #[error("histogram shape mismatch: {left_x}×{left_y} vs {right_x}×{right_y}")]
    ShapeMismatch {
        left_x: usize,
        left_y: usize,
        right_x: usize,
        right_y: usize,
    },
}
