//! Error types for the NDVI pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that can occur while building boundary maps.
///
/// Directory and band errors abort the whole batch before any boundary is
/// processed; everything else is a per-boundary failure collected into the
/// batch summary.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The data path is missing or not a directory.
    #[error("not a valid data directory: {0}")]
    InvalidDataDirectory(PathBuf),

    /// The NIR or RED band file is absent.
    #[error("missing satellite band data: {0}")]
    MissingBandData(String),

    /// A boundary descriptor file name lacks the `.json` suffix.
    #[error("invalid boundary name: {0}")]
    InvalidBoundaryName(String),

    /// A boundary id contains a literal dot (double extension guard).
    #[error("invalid boundary id: {0}")]
    InvalidBoundaryId(String),

    /// A band carries no usable coordinate reference system.
    #[error("cannot resolve coordinate system: {0}")]
    CrsResolutionFailure(String),

    /// A boundary descriptor holds unusable geometry.
    #[error("invalid boundary geometry: {0}")]
    InvalidGeometry(String),

    /// The boundary does not intersect the raster grid at all.
    #[error("boundary does not overlap the raster: {0}")]
    BoundaryOutsideRaster(String),

    /// The two masked band grids disagree in shape.
    #[error("band grids disagree: {nir_width}x{nir_height} vs {red_width}x{red_height}")]
    BandShapeMismatch {
        nir_width: usize,
        nir_height: usize,
        red_width: usize,
        red_height: usize,
    },

    /// The cloud mask does not align with the NDVI grid.
    #[error("cloud mask is {mask_width}x{mask_height} but NDVI grid is {grid_width}x{grid_height}")]
    MaskShapeMismatch {
        mask_width: usize,
        mask_height: usize,
        grid_width: usize,
        grid_height: usize,
    },

    #[error(transparent)]
    Geotiff(#[from] geotiff::GeotiffError),

    #[error(transparent)]
    Projection(#[from] projection::ProjectionError),

    #[error(transparent)]
    Render(#[from] renderer::RenderError),

    #[error(transparent)]
    Grid(#[from] map_common::MapError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
