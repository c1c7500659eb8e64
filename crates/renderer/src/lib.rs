//! Rendering of NDVI grids into color-coded RGBA images.
//!
//! Two pieces: the diverging red-yellow-green colormap that turns a
//! normalized NDVI value into a pixel, and a PNG encoder for the resulting
//! RGBA grid.

pub mod colormap;
pub mod png;

pub use colormap::{colorize_ndvi, ndvi_color, Color, NDVI_MAX, NDVI_MIN};
pub use png::create_png;

use thiserror::Error;

/// Errors raised while encoding rendered output.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PNG encoding failed: {0}")]
    PngEncode(String),
}
