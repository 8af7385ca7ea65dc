pub mod bounds;
pub mod complex;
pub mod config;
pub mod error;
pub mod field;
pub mod histogram;
pub mod point;
pub mod simulation;

// Re-export primary types for convenience.
pub use bounds::Bounds;
pub use complex::Complex;
pub use config::SimulationConfig;
pub use error::CoreError;
pub use field::PointField;
pub use histogram::Histogram2D;
pub use point::{ComplexPoint, ESCAPE_RADIUS_SQ};
pub use simulation::{HaltReason, Progress, Simulation, Snapshot, Stage, TickOutcome};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
