//! Cropping and masking a band raster to a boundary.

use map_common::Raster;

use crate::geometry::Geometry;
use crate::{PipelineError, PipelineResult};

/// Crop a raster to a boundary's envelope and mask out everything the
/// boundary does not cover.
///
/// The window is the geometry envelope in fractional pixel coordinates,
/// floored/ceiled outwards and clamped to the grid. Within the window a
/// cell survives if its center passes the containment test; every other
/// cell gets the fill value: `fill` if given, else the raster's nodata,
/// else 0.0. The returned raster carries a transform translated to the
/// window origin.
///
/// The boundary must already be in the raster's coordinate system.
pub fn crop_and_mask(
    raster: &Raster,
    boundary: &Geometry,
    fill: Option<f64>,
) -> PipelineResult<Raster> {
    let bounds = boundary.bounds();

    let (left_col, top_row) = raster.transform.geo_to_pixel(bounds.min_x, bounds.max_y)?;
    let (right_col, bottom_row) = raster.transform.geo_to_pixel(bounds.max_x, bounds.min_y)?;

    let col0 = left_col.min(right_col).floor().max(0.0) as usize;
    let row0 = top_row.min(bottom_row).floor().max(0.0) as usize;
    let col1 = (left_col.max(right_col).ceil() as usize).min(raster.width);
    let row1 = (top_row.max(bottom_row).ceil() as usize).min(raster.height);

    if col0 >= col1 || row0 >= row1 {
        return Err(PipelineError::BoundaryOutsideRaster(format!(
            "envelope ({}, {}) - ({}, {})",
            bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y
        )));
    }

    let width = col1 - col0;
    let height = row1 - row0;
    let transform = raster.transform.translated(col0, row0);
    let fill_value = fill.or(raster.nodata).unwrap_or(0.0);

    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let (x, y) = transform.pixel_to_geo(col, row);
            if boundary.contains(x, y) {
                data.push(raster.get(col0 + col, row0 + row));
            } else {
                data.push(fill_value);
            }
        }
    }

    let mut masked = Raster::new(data, width, height, transform)?;
    masked.epsg = raster.epsg;
    masked.nodata = fill.or(raster.nodata);
    Ok(masked)
}
