//! Cloud mask derivation from the classification layer.

use tracing::warn;

use map_common::Raster;

use crate::{PipelineError, PipelineResult};

/// Mask state for cells outside the boundary.
///
/// The classification byte range is 0-255 and real scene codes span 0-11,
/// so 99 cannot collide with a code. It exists only while the mask is
/// being built and is never surfaced as NDVI data.
pub const OUTSIDE_BOUNDARY: u8 = 99;

/// Classification codes reclassified as cloud: cloud and cloud shadow.
/// Thin cirrus (10) is left in, it distorts the index very little.
pub const CLOUD_CODES: [u8; 2] = [8, 9];

/// Per-cell cloud state aligned 1:1 with the NDVI grid.
///
/// Cells are 0 (clear), 1 (cloud), or [`OUTSIDE_BOUNDARY`].
#[derive(Debug, Clone)]
pub struct CloudMask {
    pub cells: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl CloudMask {
    /// Share of cloud cells among the cells inside the boundary, as a
    /// percentage.
    pub fn cloud_cover_percent(&self) -> f64 {
        let cloud = self.cells.iter().filter(|&&c| c == 1).count();
        let inside = self
            .cells
            .iter()
            .filter(|&&c| c != OUTSIDE_BOUNDARY)
            .count();

        if inside == 0 {
            warn!("cloud mask has no cells inside the boundary");
            return 0.0;
        }

        cloud as f64 / inside as f64 * 100.0
    }
}

/// Reclassify a boundary-masked classification raster into a cloud mask.
///
/// Input cells are whole classification codes, with [`OUTSIDE_BOUNDARY`]
/// already filled in for cells the boundary does not cover.
pub fn build_cloud_mask(classification: &Raster) -> CloudMask {
    let cells = classification
        .data
        .iter()
        .map(|&value| {
            let code = value as u8;
            if code == OUTSIDE_BOUNDARY {
                OUTSIDE_BOUNDARY
            } else if CLOUD_CODES.contains(&code) {
                1
            } else {
                0
            }
        })
        .collect();

    CloudMask {
        cells,
        width: classification.width,
        height: classification.height,
    }
}

/// Blank out every cloud cell of the NDVI grid.
///
/// Cells outside the boundary are left alone; they already carry the NaN
/// sentinel from the band masking.
pub fn apply_cloud_mask(ndvi: &mut Raster, mask: &CloudMask) -> PipelineResult<()> {
    if mask.width != ndvi.width || mask.height != ndvi.height {
        return Err(PipelineError::MaskShapeMismatch {
            mask_width: mask.width,
            mask_height: mask.height,
            grid_width: ndvi.width,
            grid_height: ndvi.height,
        });
    }

    for (value, &state) in ndvi.data.iter_mut().zip(&mask.cells) {
        if state == 1 {
            *value = f64::NAN;
        }
    }

    Ok(())
}
