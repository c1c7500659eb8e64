//! Whole-raster reprojection.
//!
//! Output geometry follows the suggested-warp-output approach: pixel size
//! from the transformed image diagonal, extents from densified edge
//! sampling. Resampling is nearest-neighbor so nodata cells are carried
//! over verbatim instead of being smeared into their neighbors.

use map_common::{BoundingBox, GeoTransform, Raster};

use crate::{ProjectionError, ProjectionResult, Transformer};

/// Edge sample count used when transforming bounds between systems.
const DENSIFY_POINTS: usize = 21;

/// Transform a bounding box, sampling each edge at `densify` points so
/// that curvature of the target system cannot clip the true extent.
pub fn transform_bounds(
    transformer: &Transformer,
    bounds: &BoundingBox,
    densify: usize,
) -> ProjectionResult<BoundingBox> {
    let steps = densify.max(1);
    let mut points = Vec::with_capacity(4 * (steps + 1));

    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = bounds.min_x + t * bounds.width();
        let y = bounds.min_y + t * bounds.height();

        points.push(transformer.transform(x, bounds.min_y)?);
        points.push(transformer.transform(x, bounds.max_y)?);
        points.push(transformer.transform(bounds.min_x, y)?);
        points.push(transformer.transform(bounds.max_x, y)?);
    }

    BoundingBox::from_points(points)
        .ok_or_else(|| ProjectionError::TransformFailed("empty bounds".into()))
}

/// Compute the output transform and dimensions for warping a grid of
/// `width` x `height` pixels into `target_epsg`.
///
/// The output pixel is square, sized so the transformed image diagonal
/// spans the same number of pixels as the source diagonal.
pub fn suggested_transform(
    source: &GeoTransform,
    width: usize,
    height: usize,
    source_epsg: u32,
    target_epsg: u32,
) -> ProjectionResult<(GeoTransform, usize, usize)> {
    let forward = Transformer::new(source_epsg, target_epsg)?;

    let (ulx, uly) = source.pixel_to_geo_corner(0, 0);
    let (lrx, lry) = source.pixel_to_geo_corner(width, height);

    let (tx0, ty0) = forward.transform(ulx, uly)?;
    let (tx1, ty1) = forward.transform(lrx, lry)?;

    let diagonal = ((tx1 - tx0).powi(2) + (ty1 - ty0).powi(2)).sqrt();
    let source_diagonal = ((width * width + height * height) as f64).sqrt();
    let pixel_size = diagonal / source_diagonal;

    if !pixel_size.is_finite() || pixel_size <= 0.0 {
        return Err(ProjectionError::TransformFailed(format!(
            "degenerate output pixel size {pixel_size}"
        )));
    }

    let source_bounds = BoundingBox::new(
        ulx.min(lrx),
        uly.min(lry),
        ulx.max(lrx),
        uly.max(lry),
    );
    let out_bounds = transform_bounds(&forward, &source_bounds, DENSIFY_POINTS)?;

    let out_width = (out_bounds.width() / pixel_size + 0.5) as usize;
    let out_height = (out_bounds.height() / pixel_size + 0.5) as usize;

    let transform = GeoTransform::new(
        out_bounds.min_x,
        out_bounds.max_y,
        pixel_size,
        -pixel_size,
    );

    Ok((transform, out_width.max(1), out_height.max(1)))
}

/// Reproject a raster into `target_epsg` with nearest-neighbor sampling.
///
/// Cells that map outside the source grid, or whose coordinates cannot be
/// transformed, stay at the NaN nodata sentinel.
pub fn reproject_nearest(source: &Raster, target_epsg: u32) -> ProjectionResult<Raster> {
    let source_epsg = source
        .epsg
        .ok_or_else(|| ProjectionError::MissingCrs("reproject source".into()))?;

    let (out_transform, out_width, out_height) = suggested_transform(
        &source.transform,
        source.width,
        source.height,
        source_epsg,
        target_epsg,
    )?;

    // Walk the output grid and pull from the source, so every output cell
    // is written exactly once.
    let inverse = Transformer::new(target_epsg, source_epsg)?;
    let mut data = vec![f64::NAN; out_width * out_height];

    for row in 0..out_height {
        for col in 0..out_width {
            let (x, y) = out_transform.pixel_to_geo(col, row);
            let Ok((sx, sy)) = inverse.transform(x, y) else {
                continue;
            };
            let Ok((fcol, frow)) = source.transform.geo_to_pixel(sx, sy) else {
                continue;
            };

            let scol = fcol.floor();
            let srow = frow.floor();
            if scol < 0.0
                || srow < 0.0
                || scol >= source.width as f64
                || srow >= source.height as f64
            {
                continue;
            }

            data[row * out_width + col] =
                source.data[srow as usize * source.width + scol as usize];
        }
    }

    let mut out = Raster::new(data, out_width, out_height, out_transform)
        .map_err(|e| ProjectionError::TransformFailed(e.to_string()))?;
    out.epsg = Some(target_epsg);
    out.nodata = source.nodata;
    Ok(out)
}
