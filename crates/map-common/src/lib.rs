//! Shared types for the boundary map services.
//!
//! This crate holds the vocabulary the rest of the workspace speaks:
//! bounding boxes, affine geotransforms, and the in-memory raster grid.

pub mod bbox;
pub mod error;
pub mod geotransform;
pub mod raster;

pub use bbox::BoundingBox;
pub use error::{MapError, MapResult};
pub use geotransform::GeoTransform;
pub use raster::Raster;
