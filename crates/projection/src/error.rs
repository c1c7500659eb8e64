//! Error types for coordinate transforms.

use thiserror::Error;

/// Result type alias using ProjectionError.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Errors raised while resolving or applying coordinate transforms.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The EPSG code is not in the CRS definitions database.
    #[error("EPSG:{0} is not a known coordinate reference system")]
    UnknownCrs(u32),

    /// The projection definition could not be parsed.
    #[error("invalid projection definition for EPSG:{epsg}: {message}")]
    InvalidDefinition { epsg: u32, message: String },

    /// A point could not be transformed.
    #[error("coordinate transform failed: {0}")]
    TransformFailed(String),

    /// The raster to reproject carries no coordinate system.
    #[error("raster has no coordinate system: {0}")]
    MissingCrs(String),
}
