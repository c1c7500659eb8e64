//! In-memory single-band raster grid.

use crate::{BoundingBox, GeoTransform, MapError, MapResult};

/// A single-band raster: row-major samples plus georeferencing.
///
/// Samples are held as `f64` regardless of the storage type they were read
/// from; integer bands are widened on decode so that downstream arithmetic
/// never overflows.
#[derive(Debug, Clone)]
pub struct Raster {
    /// Samples in row-major order (row 0 first).
    pub data: Vec<f64>,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Pixel-to-world affine transform.
    pub transform: GeoTransform,
    /// EPSG code of the coordinate system, if known.
    pub epsg: Option<u32>,
    /// Nodata sentinel, if the source declared one.
    pub nodata: Option<f64>,
}

impl Raster {
    /// Create a raster from row-major samples.
    pub fn new(
        data: Vec<f64>,
        width: usize,
        height: usize,
        transform: GeoTransform,
    ) -> MapResult<Self> {
        if data.len() != width * height {
            return Err(MapError::InvalidDimensions {
                width,
                height,
                samples: data.len(),
            });
        }

        Ok(Self {
            data,
            width,
            height,
            transform,
            epsg: None,
            nodata: None,
        })
    }

    /// Raster filled with a constant value.
    pub fn filled(value: f64, width: usize, height: usize, transform: GeoTransform) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
            transform,
            epsg: None,
            nodata: None,
        }
    }

    /// Sample at (col, row). Panics if out of range.
    pub fn get(&self, col: usize, row: usize) -> f64 {
        self.data[row * self.width + col]
    }

    /// Overwrite the sample at (col, row). Panics if out of range.
    pub fn set(&mut self, col: usize, row: usize, value: f64) {
        self.data[row * self.width + col] = value;
    }

    /// World-coordinate bounds of the full grid.
    pub fn bounds(&self) -> BoundingBox {
        let (x0, y0) = self.transform.pixel_to_geo_corner(0, 0);
        let (x1, y1) = self.transform.pixel_to_geo_corner(self.width, self.height);

        BoundingBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Check if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_dimensions() {
        let gt = GeoTransform::new(0.0, 0.0, 1.0, -1.0);
        assert!(Raster::new(vec![0.0; 6], 3, 2, gt).is_ok());
        assert!(Raster::new(vec![0.0; 5], 3, 2, gt).is_err());
    }

    #[test]
    fn test_get_set() {
        let gt = GeoTransform::new(0.0, 0.0, 1.0, -1.0);
        let mut raster = Raster::filled(0.0, 4, 3, gt);
        raster.set(2, 1, 7.5);
        assert_eq!(raster.get(2, 1), 7.5);
        assert_eq!(raster.get(0, 0), 0.0);
    }

    #[test]
    fn test_bounds_north_up() {
        let gt = GeoTransform::new(100.0, 500.0, 10.0, -10.0);
        let raster = Raster::filled(0.0, 8, 4, gt);
        let bounds = raster.bounds();

        assert_eq!(bounds.min_x, 100.0);
        assert_eq!(bounds.max_x, 180.0);
        assert_eq!(bounds.min_y, 460.0);
        assert_eq!(bounds.max_y, 500.0);
    }
}
