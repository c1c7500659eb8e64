//! Upsampling the classification layer to band resolution.

use map_common::Raster;

use crate::PipelineResult;

/// Resolution ratio between a coarse raster and a target cell size.
///
/// The classification layer usually ships at twice the band cell size, but
/// the ratio is derived from the rasters rather than assumed.
pub fn resolution_ratio(coarse: &Raster, target_pixel_size: f64) -> f64 {
    coarse.transform.pixel_width.abs() / target_pixel_size.abs()
}

/// Upsample a classification raster by `ratio` with bilinear interpolation.
///
/// Sample points are destination pixel centers mapped back into the source
/// grid; edge samples clamp to the border cells. Interpolated values are
/// rounded back to whole classification codes, as resampling into a byte
/// band does. The output transform keeps the origin and divides the cell
/// size, and the nodata code is 0 (no classification).
pub fn upsample_classification(source: &Raster, ratio: f64) -> PipelineResult<Raster> {
    let width = (source.width as f64 * ratio).round() as usize;
    let height = (source.height as f64 * ratio).round() as usize;

    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let src_x = (col as f64 + 0.5) / ratio - 0.5;
            let src_y = (row as f64 + 0.5) / ratio - 0.5;
            data.push(bilinear(source, src_x, src_y).round());
        }
    }

    let x_factor = width as f64 / source.width as f64;
    let y_factor = height as f64 / source.height as f64;

    let mut out = Raster::new(
        data,
        width,
        height,
        source.transform.scaled(x_factor, y_factor),
    )?;
    out.epsg = source.epsg;
    out.nodata = Some(0.0);
    Ok(out)
}

/// Bilinear sample at fractional source coordinates, clamped to the grid.
fn bilinear(raster: &Raster, x: f64, y: f64) -> f64 {
    let max_col = raster.width - 1;
    let max_row = raster.height - 1;

    let x = x.clamp(0.0, max_col as f64);
    let y = y.clamp(0.0, max_row as f64);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(max_col);
    let y1 = (y0 + 1).min(max_row);

    let xf = x - x0 as f64;
    let yf = y - y0 as f64;

    let v00 = raster.get(x0, y0);
    let v10 = raster.get(x1, y0);
    let v01 = raster.get(x0, y1);
    let v11 = raster.get(x1, y1);

    let top = v00 * (1.0 - xf) + v10 * xf;
    let bottom = v01 * (1.0 - xf) + v11 * xf;
    top * (1.0 - yf) + bottom * yf
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_common::GeoTransform;

    fn coarse_grid(data: Vec<f64>, width: usize, height: usize) -> Raster {
        Raster::new(data, width, height, GeoTransform::new(0.0, 80.0, 20.0, -20.0)).unwrap()
    }

    #[test]
    fn test_resolution_ratio() {
        let scl = coarse_grid(vec![0.0; 4], 2, 2);
        assert_eq!(resolution_ratio(&scl, 10.0), 2.0);
        assert_eq!(resolution_ratio(&scl, 20.0), 1.0);
    }

    #[test]
    fn test_doubles_dimensions_and_halves_cells() {
        let scl = coarse_grid(vec![4.0; 16], 4, 4);
        let fine = upsample_classification(&scl, 2.0).unwrap();

        assert_eq!(fine.width, 8);
        assert_eq!(fine.height, 8);
        assert_eq!(fine.transform.pixel_width, 10.0);
        assert_eq!(fine.transform.pixel_height, -10.0);
        assert_eq!(fine.transform.origin_x, 0.0);
        assert_eq!(fine.transform.origin_y, 80.0);
        assert_eq!(fine.nodata, Some(0.0));
        assert!(fine.data.iter().all(|&v| v == 4.0));
    }

    #[test]
    fn test_bilinear_transition_between_codes() {
        // One row, codes 8 then 4: the doubled grid interpolates between
        // the two source centers and rounds back to whole codes.
        let scl = coarse_grid(vec![8.0, 4.0], 2, 1);
        let fine = upsample_classification(&scl, 2.0).unwrap();

        assert_eq!(fine.width, 4);
        assert_eq!(fine.height, 2);
        // Sample x positions map to source 0, 0.25, 0.75, 1 (clamped):
        // 8, 7, 5, 4.
        assert_eq!(&fine.data[0..4], &[8.0, 7.0, 5.0, 4.0]);
    }

    #[test]
    fn test_non_integer_ratio() {
        let scl = coarse_grid(vec![1.0; 9], 3, 3);
        let fine = upsample_classification(&scl, 1.5).unwrap();

        assert_eq!(fine.width, 5);
        assert_eq!(fine.height, 5);
        assert!((fine.transform.pixel_width - 20.0 * 3.0 / 5.0).abs() < 1e-12);
        assert!(fine.data.iter().all(|&v| v == 1.0));
    }
}
