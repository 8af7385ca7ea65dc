pub mod buffer;
pub mod compose;
pub mod error;
pub mod export;
pub mod layer;

pub use buffer::RenderBuffer;
pub use compose::{colorize_layer, composite};
pub use error::RenderError;
pub use export::{export_png, ExportMetadata};
pub use layer::Layer;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
