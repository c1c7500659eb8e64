//! Per-boundary output metadata record.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use map_common::BoundingBox;

use crate::stats::RasterStatistics;
use crate::PipelineResult;

/// The JSON record written next to each boundary image.
///
/// `image_bounds` holds the display-system corners as two `[lat, lon]`
/// pairs — south/west first, north/east second — at full precision. The
/// statistics are rounded to 8 decimals; the cloud percentage is `null`
/// when no classification layer was present (the key is always emitted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMetadata {
    pub image_bounds: [[f64; 2]; 2],
    pub raster_min: f64,
    pub raster_max: f64,
    pub raster_median: f64,
    pub raster_mean: f64,
    pub raster_percent_covered_by_clouds: Option<f64>,
}

impl OutputMetadata {
    /// Assemble the record from display-system bounds and statistics.
    pub fn new(bounds: &BoundingBox, stats: &RasterStatistics) -> Self {
        Self {
            image_bounds: [
                [bounds.min_y, bounds.min_x],
                [bounds.max_y, bounds.max_x],
            ],
            raster_min: round8(stats.min),
            raster_max: round8(stats.max),
            raster_median: round8(stats.median),
            raster_mean: round8(stats.mean),
            raster_percent_covered_by_clouds: stats.cloud_cover_percent.map(round8),
        }
    }
}

/// Round to 8 decimal digits for external emission.
pub fn round8(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}

/// Serialize the record to a metadata file.
pub fn write_metadata(path: &Path, metadata: &OutputMetadata) -> PipelineResult<()> {
    let json = serde_json::to_string(metadata)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round8() {
        assert_eq!(round8(1.0 / 3.0), 0.33333333);
        assert_eq!(round8(-1.0 / 3.0), -0.33333333);
        assert_eq!(round8(0.123456789), 0.12345679);
        assert_eq!(round8(0.0), 0.0);
        assert_eq!(round8(1.0), 1.0);
    }

    #[test]
    fn test_corner_order() {
        let bounds = BoundingBox::new(-98.29, 45.51, -98.23, 45.55);
        let stats = RasterStatistics {
            min: -1.0,
            max: 0.9,
            mean: 0.5,
            median: 0.6,
            cloud_cover_percent: None,
        };

        let metadata = OutputMetadata::new(&bounds, &stats);
        // South/west corner first, as [lat, lon].
        assert_eq!(metadata.image_bounds[0], [45.51, -98.29]);
        assert_eq!(metadata.image_bounds[1], [45.55, -98.23]);
    }

    #[test]
    fn test_json_shape() {
        let stats = RasterStatistics {
            min: -1.0,
            max: 0.925251866,
            mean: 0.532626541,
            median: 0.646659884,
            cloud_cover_percent: None,
        };
        let metadata = OutputMetadata::new(&BoundingBox::new(0.0, 0.0, 1.0, 1.0), &stats);
        let json = serde_json::to_string(&metadata).unwrap();

        // Keys stay camelCase, coverage serializes as an explicit null.
        assert!(json.contains("\"imageBounds\""));
        assert!(json.contains("\"rasterMin\":-1.0"));
        assert!(json.contains("\"rasterMax\":0.92525187"));
        assert!(json.contains("\"rasterPercentCoveredByClouds\":null"));
    }

    #[test]
    fn test_json_roundtrip_with_coverage() {
        let stats = RasterStatistics {
            min: 0.1,
            max: 0.2,
            mean: 0.15,
            median: 0.15,
            cloud_cover_percent: Some(48.4375),
        };
        let metadata = OutputMetadata::new(&BoundingBox::new(0.0, 0.0, 1.0, 1.0), &stats);

        let json = serde_json::to_string(&metadata).unwrap();
        let back: OutputMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metadata);
        assert_eq!(back.raster_percent_covered_by_clouds, Some(48.4375));
    }
}
