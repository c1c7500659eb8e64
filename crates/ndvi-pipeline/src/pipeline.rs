//! Batch orchestration: one NDVI map per discovered boundary.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use map_common::Raster;
use projection::{reproject_nearest, Transformer, WGS84};
use renderer::{colorize_ndvi, create_png};

use crate::boundary::{find_boundary_files, load_geometry, parse_boundary_id};
use crate::cloud::{apply_cloud_mask, build_cloud_mask, OUTSIDE_BOUNDARY};
use crate::mask::crop_and_mask;
use crate::metadata::{write_metadata, OutputMetadata};
use crate::ndvi::compute_ndvi;
use crate::resample::{resolution_ratio, upsample_classification};
use crate::stats::summarize;
use crate::{PipelineError, PipelineResult};

/// Display coordinate system for output images and bounds.
pub const DISPLAY_EPSG: u32 = WGS84;

/// File name of the resampled classification layer in the batch working
/// directory.
const RESAMPLED_CLASSIFICATION: &str = "classification_resampled.tif";

/// Inputs for one batch run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory read for bands and boundaries and written with outputs.
    pub data_dir: PathBuf,
    /// Band file prefix: `{band_prefix}04.tif`, `{band_prefix}08.tif`,
    /// optionally `{band_prefix}SCL.tif`.
    pub band_prefix: String,
    /// Boundary descriptor prefix: `{boundary_prefix}{id}.json`.
    pub boundary_prefix: String,
}

/// Per-boundary outcomes of a batch run.
///
/// One malformed boundary never aborts the rest of the batch; its error is
/// collected here instead. Outputs written for earlier boundaries stay on
/// disk regardless of later failures.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, PipelineError)>,
}

impl BatchSummary {
    /// True when no boundary was processed at all.
    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }
}

/// Build NDVI maps for every boundary in the data directory.
///
/// Validates the directory and band files up front (those errors abort the
/// whole batch), then runs each boundary independently, producing
/// `raster_image_{id}.png` and `raster_meta_{id}.json` per success.
pub fn build_boundary_maps(config: &PipelineConfig) -> PipelineResult<BatchSummary> {
    if !config.data_dir.is_dir() {
        return Err(PipelineError::InvalidDataDirectory(config.data_dir.clone()));
    }

    let band04_path = config
        .data_dir
        .join(format!("{}04.tif", config.band_prefix));
    let band08_path = config
        .data_dir
        .join(format!("{}08.tif", config.band_prefix));
    let classification_path = config
        .data_dir
        .join(format!("{}SCL.tif", config.band_prefix));

    if !band04_path.is_file() || !band08_path.is_file() {
        return Err(PipelineError::MissingBandData(format!(
            "expected {} and {}",
            band04_path.display(),
            band08_path.display()
        )));
    }

    let boundary_files = find_boundary_files(&config.data_dir, &config.boundary_prefix)?;
    if boundary_files.is_empty() {
        info!("no boundaries found, nothing to do");
        return Ok(BatchSummary::default());
    }

    let red = geotiff::read_geotiff(&band04_path)?;
    let nir = geotiff::read_geotiff(&band08_path)?;

    let band_epsg = red
        .epsg
        .ok_or_else(|| PipelineError::CrsResolutionFailure("band has no EPSG code".into()))?;
    if projection::proj_string(band_epsg).is_none() {
        return Err(PipelineError::CrsResolutionFailure(format!(
            "EPSG:{band_epsg} is not a known coordinate reference system"
        )));
    }

    info!(
        epsg = band_epsg,
        boundaries = boundary_files.len(),
        "starting NDVI batch"
    );

    // Batch working area for the resampled classification layer; dropped
    // (and deleted) when the batch ends, success or not.
    let workdir = tempfile::tempdir()?;
    let classification = if classification_path.is_file() {
        Some(resample_classification_layer(
            &classification_path,
            &red,
            workdir.path(),
        )?)
    } else {
        None
    };

    let to_band_crs = Transformer::new(WGS84, band_epsg)?;

    let mut summary = BatchSummary::default();
    for file_name in boundary_files {
        let id = match parse_boundary_id(&file_name, &config.boundary_prefix) {
            Ok(id) => id,
            Err(err) => {
                error!(file = %file_name, error = %err, "skipping malformed boundary file");
                summary.failed.push((file_name, err));
                continue;
            }
        };

        match process_boundary(
            config,
            &id,
            &file_name,
            &red,
            &nir,
            classification.as_ref(),
            &to_band_crs,
        ) {
            Ok(()) => {
                info!(boundary = %id, "boundary map written");
                summary.succeeded.push(id);
            }
            Err(err) => {
                error!(boundary = %id, error = %err, "boundary map failed");
                summary.failed.push((id, err));
            }
        }
    }

    info!(
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        "NDVI batch finished"
    );

    Ok(summary)
}

/// Lift the classification layer to band resolution.
///
/// The ratio comes from comparing the two cell sizes (2x for the reference
/// data, but never assumed). The resampled layer is written into the batch
/// working directory and read back, so every boundary works from the same
/// on-disk artifact.
fn resample_classification_layer(
    path: &Path,
    band: &Raster,
    workdir: &Path,
) -> PipelineResult<Raster> {
    let coarse = geotiff::read_geotiff(path)?;
    let ratio = resolution_ratio(&coarse, band.transform.pixel_width);
    let fine = upsample_classification(&coarse, ratio)?;

    info!(
        ratio,
        width = fine.width,
        height = fine.height,
        "resampled classification layer"
    );

    let resampled_path = workdir.join(RESAMPLED_CLASSIFICATION);
    geotiff::write_gray_u8(&resampled_path, &fine)?;
    Ok(geotiff::read_geotiff(&resampled_path)?)
}

/// Run the full per-boundary pass: mask, NDVI, cloud exclusion,
/// statistics, display warp, image and metadata output.
fn process_boundary(
    config: &PipelineConfig,
    id: &str,
    file_name: &str,
    red: &Raster,
    nir: &Raster,
    classification: Option<&Raster>,
    to_band_crs: &Transformer,
) -> PipelineResult<()> {
    let geometry = load_geometry(&config.data_dir.join(file_name))?;
    let projected = geometry.transformed(to_band_crs)?;

    let red_masked = crop_and_mask(red, &projected, None)?;
    let nir_masked = crop_and_mask(nir, &projected, None)?;
    let mut ndvi = compute_ndvi(&nir_masked, &red_masked)?;

    let cloud_cover = match classification {
        Some(layer) => {
            let layer_masked =
                crop_and_mask(layer, &projected, Some(OUTSIDE_BOUNDARY as f64))?;
            let mask = build_cloud_mask(&layer_masked);
            apply_cloud_mask(&mut ndvi, &mask)?;
            Some(mask.cloud_cover_percent())
        }
        None => None,
    };

    let stats = summarize(&ndvi.data).with_cloud_cover(cloud_cover);

    // Scoped working directory for this boundary's intermediate rasters;
    // removed on every exit path, including failure.
    let tmp = tempfile::tempdir()?;
    let clipped_path = tmp.path().join("boundary_ndvi_map.tif");
    geotiff::write_gray_f32(&clipped_path, &ndvi)?;

    let clipped = geotiff::read_geotiff(&clipped_path)?;
    let display = reproject_nearest(&clipped, DISPLAY_EPSG)?;

    let pixels = colorize_ndvi(&display.data, display.width, display.height);
    let png = create_png(&pixels, display.width, display.height)?;
    let image_path = config.data_dir.join(format!("raster_image_{id}.png"));
    fs::write(&image_path, png)?;

    let metadata = OutputMetadata::new(&display.bounds(), &stats);
    let meta_path = config.data_dir.join(format!("raster_meta_{id}.json"));
    write_metadata(&meta_path, &metadata)?;

    Ok(())
}
