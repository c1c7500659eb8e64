//! Affine geotransform for georeferenced rasters.

use serde::{Deserialize, Serialize};

use crate::{MapError, MapResult};

/// Affine transformation between pixel coordinates (col, row) and world
/// coordinates (x, y):
///
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// For north-up rasters the rotation terms are zero and `pixel_height` is
/// negative (rows increase southwards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner.
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner.
    pub origin_y: f64,
    /// Cell size in the X direction.
    pub pixel_width: f64,
    /// Cell size in the Y direction (negative for north-up rasters).
    pub pixel_height: f64,
    /// Rotation term applied to rows (usually 0).
    pub row_rotation: f64,
    /// Rotation term applied to columns (usually 0).
    pub col_rotation: f64,
}

impl GeoTransform {
    /// North-up transform with no rotation.
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// World coordinates of a pixel center.
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        let col_f = col as f64 + 0.5;
        let row_f = row as f64 + 0.5;

        let x = self.origin_x + col_f * self.pixel_width + row_f * self.row_rotation;
        let y = self.origin_y + col_f * self.col_rotation + row_f * self.pixel_height;

        (x, y)
    }

    /// World coordinates of a pixel's top-left corner.
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        let col_f = col as f64;
        let row_f = row as f64;

        let x = self.origin_x + col_f * self.pixel_width + row_f * self.row_rotation;
        let y = self.origin_y + col_f * self.col_rotation + row_f * self.pixel_height;

        (x, y)
    }

    /// Fractional pixel coordinates of a world point.
    ///
    /// Integer boundaries fall on pixel edges, so `floor()` of the result
    /// is the index of the containing pixel.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> MapResult<(f64, f64)> {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;

        if det.abs() < 1e-12 {
            return Err(MapError::DegenerateTransform(format!(
                "determinant {det} is not invertible"
            )));
        }

        let dx = x - self.origin_x;
        let dy = y - self.origin_y;

        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (-self.col_rotation * dx + self.pixel_width * dy) / det;

        Ok((col, row))
    }

    /// Transform shifted so that pixel (0, 0) is at window offset
    /// (col_off, row_off) of this transform.
    pub fn translated(&self, col_off: usize, row_off: usize) -> Self {
        let (origin_x, origin_y) = self.pixel_to_geo_corner(col_off, row_off);
        Self {
            origin_x,
            origin_y,
            ..*self
        }
    }

    /// Transform with cell sizes divided by the given factors; the origin
    /// is unchanged. Used when a raster is resampled to a finer grid.
    pub fn scaled(&self, x_factor: f64, y_factor: f64) -> Self {
        Self {
            pixel_width: self.pixel_width / x_factor,
            pixel_height: self.pixel_height / y_factor,
            ..*self
        }
    }
}
