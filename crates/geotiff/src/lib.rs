//! GeoTIFF reading and writing for single-band rasters.
//!
//! Pure Rust on top of the `tiff` crate: samples are decoded from any of
//! the integer/float strip layouts into the shared [`map_common::Raster`],
//! and the georeferencing triplet (ModelPixelScale, ModelTiepoint,
//! GeoKeyDirectory) plus the GDAL nodata tag are round-tripped.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{GeotiffError, GeotiffResult};
pub use reader::read_geotiff;
pub use writer::{write_gray_f32, write_gray_u8};

// GeoKey IDs.
pub(crate) const KEY_GT_MODEL_TYPE: u16 = 1024;
pub(crate) const KEY_GT_RASTER_TYPE: u16 = 1025;
pub(crate) const KEY_GEOGRAPHIC_TYPE: u16 = 2048;
pub(crate) const KEY_PROJECTED_CS_TYPE: u16 = 3072;

// GeoKey values.
pub(crate) const MODEL_TYPE_PROJECTED: u16 = 1;
pub(crate) const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
pub(crate) const RASTER_PIXEL_IS_AREA: u16 = 1;
