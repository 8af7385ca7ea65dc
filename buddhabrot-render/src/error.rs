use thiserror::Error;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("layer has {actual} values, expected {expected}")]
    LayerSize { expected: usize, actual: usize },

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}
