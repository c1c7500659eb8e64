//! Error types shared across the map services.

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Errors raised by the shared raster/geometry types.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid raster dimensions: {width}x{height} does not match {samples} samples")]
    InvalidDimensions {
        width: usize,
        height: usize,
        samples: usize,
    },

    #[error("degenerate geotransform: {0}")]
    DegenerateTransform(String),
}
