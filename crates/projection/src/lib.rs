//! Coordinate transforms between EPSG-coded reference systems.
//!
//! Built on `proj4rs` with projection definitions resolved from the
//! `crs-definitions` database, which covers all UTM zones and the common
//! geographic systems without hard-coding any of them. The `warp` module
//! adds whole-raster reprojection with nearest-neighbor sampling.

pub mod error;
pub mod transform;
pub mod warp;

pub use error::{ProjectionError, ProjectionResult};
pub use transform::{is_geographic, proj_string, Transformer};
pub use warp::{reproject_nearest, suggested_transform, transform_bounds};

/// EPSG code of the WGS84 geographic system boundary descriptors use.
pub const WGS84: u32 = 4326;
