//! End-to-end pipeline tests on synthetic GeoTIFF fixtures.

use std::fs;
use std::path::Path;

use ndvi_pipeline::metadata::OutputMetadata;
use ndvi_pipeline::{build_boundary_maps, PipelineConfig, PipelineError};
use test_utils::{
    classification_grid, constant_band, covering_boundary_geojson, write_band_fixture,
    write_classification_fixture,
};

const BAND_PREFIX: &str = "satData_band";
const BOUNDARY_PREFIX: &str = "boundary_geometry_";

fn config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        data_dir: dir.to_path_buf(),
        band_prefix: BAND_PREFIX.to_string(),
        boundary_prefix: BOUNDARY_PREFIX.to_string(),
    }
}

/// Write a NIR/RED pair plus one covering boundary into `dir`.
fn write_basic_fixtures(dir: &Path, nir_value: f64, red_value: f64) {
    let red = constant_band(red_value, 64, 64);
    let nir = constant_band(nir_value, 64, 64);

    write_band_fixture(dir.join(format!("{BAND_PREFIX}04.tif")), &red);
    write_band_fixture(dir.join(format!("{BAND_PREFIX}08.tif")), &nir);

    let boundary = covering_boundary_geojson(&red);
    fs::write(dir.join(format!("{BOUNDARY_PREFIX}A17.json")), boundary).unwrap();
}

fn read_metadata(dir: &Path, id: &str) -> OutputMetadata {
    let text = fs::read_to_string(dir.join(format!("raster_meta_{id}.json"))).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_end_to_end_constant_bands() {
    let dir = tempfile::tempdir().unwrap();
    write_basic_fixtures(dir.path(), 80.0, 40.0);

    let summary = build_boundary_maps(&config(dir.path())).unwrap();
    assert_eq!(summary.succeeded, vec!["A17"]);
    assert!(summary.failed.is_empty());

    let image_path = dir.path().join("raster_image_A17.png");
    assert!(image_path.is_file());
    let png = fs::read(&image_path).unwrap();
    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);

    // NDVI is (80 - 40) / (80 + 40) = 1/3 in every valid cell.
    let metadata = read_metadata(dir.path(), "A17");
    assert_eq!(metadata.raster_min, 0.33333333);
    assert_eq!(metadata.raster_max, 0.33333333);
    assert_eq!(metadata.raster_mean, 0.33333333);
    assert_eq!(metadata.raster_median, 0.33333333);
    assert_eq!(metadata.raster_percent_covered_by_clouds, None);

    // Display bounds are lat/lon around the UTM 14N fixture footprint,
    // south/west corner first.
    let [[south, west], [north, east]] = metadata.image_bounds;
    assert!(south < north && west < east);
    assert!((45.0..46.0).contains(&south) && (45.0..46.0).contains(&north));
    assert!((-99.0..-98.0).contains(&west) && (-99.0..-98.0).contains(&east));
}

#[test]
fn test_cloud_exclusion_and_coverage() {
    let dir = tempfile::tempdir().unwrap();
    write_basic_fixtures(dir.path(), 80.0, 40.0);

    // Half-resolution classification: left 16 of 32 columns are cloud.
    // Upsampled to 64 columns, the cloud region covers columns 0-30 (the
    // bilinear transition at columns 31/32 rounds to codes 7 and 5), so
    // coverage is 31/64 = 48.4375%.
    let scl = classification_grid(32, 32, 16);
    write_classification_fixture(dir.path().join(format!("{BAND_PREFIX}SCL.tif")), &scl);

    let summary = build_boundary_maps(&config(dir.path())).unwrap();
    assert_eq!(summary.succeeded, vec!["A17"]);

    let metadata = read_metadata(dir.path(), "A17");
    assert_eq!(metadata.raster_percent_covered_by_clouds, Some(48.4375));

    // Cloud cells are excluded before statistics; the remaining cells
    // still all carry 1/3.
    assert_eq!(metadata.raster_min, 0.33333333);
    assert_eq!(metadata.raster_max, 0.33333333);
    assert_eq!(metadata.raster_median, 0.33333333);
}

#[test]
fn test_empty_valid_region_reports_zero_statistics() {
    let dir = tempfile::tempdir().unwrap();
    // Both bands all-zero: every cell divides 0/0 and becomes nodata.
    write_basic_fixtures(dir.path(), 0.0, 0.0);

    let summary = build_boundary_maps(&config(dir.path())).unwrap();
    assert_eq!(summary.succeeded, vec!["A17"]);

    let metadata = read_metadata(dir.path(), "A17");
    assert_eq!(metadata.raster_min, 0.0);
    assert_eq!(metadata.raster_max, 0.0);
    assert_eq!(metadata.raster_mean, 0.0);
    assert_eq!(metadata.raster_median, 0.0);

    // The image is still written; it is simply fully transparent.
    assert!(dir.path().join("raster_image_A17.png").is_file());
}

#[test]
fn test_outputs_are_deterministic() {
    let run = || {
        let dir = tempfile::tempdir().unwrap();
        write_basic_fixtures(dir.path(), 75.0, 25.0);
        let scl = classification_grid(32, 32, 8);
        write_classification_fixture(dir.path().join(format!("{BAND_PREFIX}SCL.tif")), &scl);

        build_boundary_maps(&config(dir.path())).unwrap();

        let png = fs::read(dir.path().join("raster_image_A17.png")).unwrap();
        let meta = fs::read(dir.path().join("raster_meta_A17.json")).unwrap();
        (png, meta)
    };

    let (png_a, meta_a) = run();
    let (png_b, meta_b) = run();
    assert_eq!(png_a, png_b, "image bytes must be identical across runs");
    assert_eq!(meta_a, meta_b, "metadata bytes must be identical across runs");
}

#[test]
fn test_malformed_boundary_does_not_abort_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_basic_fixtures(dir.path(), 80.0, 40.0);

    // Id would be "A.17": double-extension guard rejects it.
    let boundary = covering_boundary_geojson(&constant_band(1.0, 64, 64));
    fs::write(
        dir.path().join(format!("{BOUNDARY_PREFIX}A.17.json")),
        boundary,
    )
    .unwrap();

    let summary = build_boundary_maps(&config(dir.path())).unwrap();
    assert_eq!(summary.succeeded, vec!["A17"]);
    assert_eq!(summary.failed.len(), 1);
    assert!(matches!(
        summary.failed[0].1,
        PipelineError::InvalidBoundaryId(_)
    ));

    // The good boundary's outputs exist; nothing was written for the bad
    // one.
    assert!(dir.path().join("raster_image_A17.png").is_file());
    assert!(!dir.path().join("raster_image_A.17.png").exists());
}

#[test]
fn test_missing_band_aborts_before_any_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let red = constant_band(40.0, 16, 16);
    write_band_fixture(dir.path().join(format!("{BAND_PREFIX}04.tif")), &red);
    fs::write(
        dir.path().join(format!("{BOUNDARY_PREFIX}A17.json")),
        covering_boundary_geojson(&red),
    )
    .unwrap();

    let result = build_boundary_maps(&config(dir.path()));
    assert!(matches!(result, Err(PipelineError::MissingBandData(_))));
    assert!(!dir.path().join("raster_image_A17.png").exists());
}

#[test]
fn test_invalid_data_directory() {
    let result = build_boundary_maps(&config(Path::new("/definitely/not/here")));
    assert!(matches!(
        result,
        Err(PipelineError::InvalidDataDirectory(_))
    ));
}

#[test]
fn test_empty_boundary_set_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let red = constant_band(40.0, 16, 16);
    let nir = constant_band(80.0, 16, 16);
    write_band_fixture(dir.path().join(format!("{BAND_PREFIX}04.tif")), &red);
    write_band_fixture(dir.path().join(format!("{BAND_PREFIX}08.tif")), &nir);

    let summary = build_boundary_maps(&config(dir.path())).unwrap();
    assert!(summary.is_empty());

    // No stray outputs appear in the directory.
    let outputs: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("raster_"))
        .collect();
    assert!(outputs.is_empty());
}
