//! Statistics over the valid cells of an NDVI grid.

use tracing::warn;

/// Summary statistics of an NDVI grid, plus the cloud coverage when a
/// classification layer was present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Percentage of in-boundary cells flagged as cloud; `None` when no
    /// classification layer was supplied.
    pub cloud_cover_percent: Option<f64>,
}

impl RasterStatistics {
    /// Attach the cloud coverage value.
    pub fn with_cloud_cover(mut self, percent: Option<f64>) -> Self {
        self.cloud_cover_percent = percent;
        self
    }
}

/// Summarize the non-NaN cells of a grid.
///
/// An empty valid set yields all-zero statistics rather than NaN or an
/// error; downstream consumers rely on that exact fallback.
pub fn summarize(data: &[f64]) -> RasterStatistics {
    let mut valid: Vec<f64> = data.iter().copied().filter(|v| !v.is_nan()).collect();

    if valid.is_empty() {
        warn!("masked NDVI map is empty; probably no data in the boundary");
        return RasterStatistics {
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            median: 0.0,
            cloud_cover_percent: None,
        };
    }

    valid.sort_by(f64::total_cmp);

    let min = valid[0];
    let max = valid[valid.len() - 1];
    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    let median = if valid.len() % 2 == 1 {
        valid[valid.len() / 2]
    } else {
        let upper = valid.len() / 2;
        (valid[upper - 1] + valid[upper]) / 2.0
    };

    RasterStatistics {
        min,
        max,
        mean,
        median,
        cloud_cover_percent: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_statistics() {
        let stats = summarize(&[0.2, -0.4, 0.8, 0.6]);
        assert_eq!(stats.min, -0.4);
        assert_eq!(stats.max, 0.8);
        assert!((stats.mean - 0.3).abs() < 1e-12);
        assert!((stats.median - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_median_odd_count() {
        let stats = summarize(&[0.9, 0.1, 0.5]);
        assert_eq!(stats.median, 0.5);
    }

    #[test]
    fn test_nan_cells_are_ignored() {
        let stats = summarize(&[f64::NAN, 0.5, f64::NAN, 0.7]);
        assert_eq!(stats.min, 0.5);
        assert_eq!(stats.max, 0.7);
        assert!((stats.mean - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_empty_valid_set_falls_back_to_zero() {
        let stats = summarize(&[f64::NAN, f64::NAN]);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.median, 0.0);
        assert_eq!(stats.cloud_cover_percent, None);

        let stats = summarize(&[]);
        assert_eq!(stats.mean, 0.0);
    }

    #[test]
    fn test_with_cloud_cover() {
        let stats = summarize(&[0.5]).with_cloud_cover(Some(12.5));
        assert_eq!(stats.cloud_cover_percent, Some(12.5));
    }
}
