//! NDVI band arithmetic.

use map_common::Raster;

use crate::{PipelineError, PipelineResult};

/// Compute NDVI = (NIR - RED) / (NIR + RED) cell-wise.
///
/// Both inputs must be masked to the same boundary and therefore share a
/// shape. Division runs under IEEE semantics (0/0 gives NaN, x/0 gives a
/// signed infinity); [`normalize_nodata`] then folds every non-finite cell
/// into the NaN nodata sentinel so statistics and rendering only ever see
/// finite values or NaN.
pub fn compute_ndvi(nir: &Raster, red: &Raster) -> PipelineResult<Raster> {
    if nir.width != red.width || nir.height != red.height {
        return Err(PipelineError::BandShapeMismatch {
            nir_width: nir.width,
            nir_height: nir.height,
            red_width: red.width,
            red_height: red.height,
        });
    }

    let data: Vec<f64> = nir
        .data
        .iter()
        .zip(&red.data)
        .map(|(&n, &r)| (n - r) / (n + r))
        .collect();

    let mut out = Raster::new(data, nir.width, nir.height, nir.transform)?;
    out.epsg = nir.epsg;
    out.nodata = Some(f64::NAN);
    normalize_nodata(&mut out.data);
    Ok(out)
}

/// Fold every non-finite cell into the NaN nodata sentinel.
///
/// A zero denominator with a nonzero numerator leaves signed infinities
/// behind; those are nodata, not vegetation readings.
pub fn normalize_nodata(data: &mut [f64]) {
    for value in data {
        if !value.is_finite() {
            *value = f64::NAN;
        }
    }
}
