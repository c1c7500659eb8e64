//! Synthetic raster and boundary fixtures.
//!
//! All fixtures live in UTM zone 14N on a 10 m grid so the numbers stay
//! easy to reason about: a 64x64 band covers 640 m x 640 m starting at
//! easting 540000, northing 5045000.

use std::path::Path;

use map_common::{GeoTransform, Raster};
use projection::Transformer;

/// EPSG code all band fixtures are projected in (UTM zone 14N).
pub const TEST_EPSG: u32 = 32614;

/// Upper-left corner and 10 m cell size shared by the band fixtures.
pub fn band_transform() -> GeoTransform {
    GeoTransform::new(540_000.0, 5_045_000.0, 10.0, -10.0)
}

/// Classification fixtures sit on the same origin at half resolution.
pub fn classification_transform() -> GeoTransform {
    GeoTransform::new(540_000.0, 5_045_000.0, 20.0, -20.0)
}

/// Band raster with every cell at `value`.
pub fn constant_band(value: f64, width: usize, height: usize) -> Raster {
    let mut raster = Raster::filled(value, width, height, band_transform());
    raster.epsg = Some(TEST_EPSG);
    raster
}

/// Band raster with predictable per-cell values: `col * 100 + row`.
///
/// Lets a test verify reads by checking `grid[row][col] == col * 100 + row`.
pub fn gradient_band(width: usize, height: usize) -> Raster {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 100 + row) as f64);
        }
    }

    let mut raster = Raster::new(data, width, height, band_transform()).unwrap();
    raster.epsg = Some(TEST_EPSG);
    raster
}

/// Classification raster at half the band resolution: the leftmost
/// `cloud_cols` columns carry cloud code 8, the rest vegetation code 4.
pub fn classification_grid(width: usize, height: usize, cloud_cols: usize) -> Raster {
    let mut data = Vec::with_capacity(width * height);
    for _row in 0..height {
        for col in 0..width {
            data.push(if col < cloud_cols { 8.0 } else { 4.0 });
        }
    }

    let mut raster = Raster::new(data, width, height, classification_transform()).unwrap();
    raster.epsg = Some(TEST_EPSG);
    raster.nodata = Some(0.0);
    raster
}

/// Write a band fixture as a float32 GeoTIFF.
pub fn write_band_fixture<P: AsRef<Path>>(path: P, raster: &Raster) {
    geotiff::write_gray_f32(path, raster).expect("band fixture write failed");
}

/// Write a classification fixture as a uint8 GeoTIFF.
pub fn write_classification_fixture<P: AsRef<Path>>(path: P, raster: &Raster) {
    geotiff::write_gray_u8(path, raster).expect("classification fixture write failed");
}

/// GeoJSON polygon (EPSG:4326) covering the raster's full footprint with
/// `margin` degrees to spare, so every pixel center tests as inside.
pub fn covering_boundary_geojson(raster: &Raster) -> String {
    let epsg = raster.epsg.expect("fixture raster has an EPSG code");
    let inverse = Transformer::new(epsg, 4326).expect("fixture transform");

    let bounds = raster.bounds();
    let margin = 0.01;
    let corners = [
        (bounds.min_x, bounds.min_y),
        (bounds.max_x, bounds.min_y),
        (bounds.max_x, bounds.max_y),
        (bounds.min_x, bounds.max_y),
    ];

    let mut lons = Vec::new();
    let mut lats = Vec::new();
    for (x, y) in corners {
        let (lon, lat) = inverse.transform(x, y).expect("fixture corner transform");
        lons.push(lon);
        lats.push(lat);
    }

    let (min_lon, max_lon) = (
        lons.iter().cloned().fold(f64::INFINITY, f64::min) - margin,
        lons.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + margin,
    );
    let (min_lat, max_lat) = (
        lats.iter().cloned().fold(f64::INFINITY, f64::min) - margin,
        lats.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + margin,
    );

    serde_json::json!({
        "type": "Polygon",
        "coordinates": [[
            [min_lon, min_lat],
            [max_lon, min_lat],
            [max_lon, max_lat],
            [min_lon, max_lat],
            [min_lon, min_lat],
        ]],
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_band_values() {
        let band = gradient_band(8, 4);
        assert_eq!(band.get(0, 0), 0.0);
        assert_eq!(band.get(3, 0), 300.0);
        assert_eq!(band.get(0, 2), 2.0);
        assert_eq!(band.get(5, 3), 503.0);
    }

    #[test]
    fn test_classification_grid_split() {
        let scl = classification_grid(8, 8, 4);
        assert_eq!(scl.get(0, 0), 8.0);
        assert_eq!(scl.get(3, 7), 8.0);
        assert_eq!(scl.get(4, 0), 4.0);
    }

    #[test]
    fn test_covering_boundary_is_valid_geojson() {
        let band = constant_band(1.0, 16, 16);
        let text = covering_boundary_geojson(&band);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "Polygon");
    }
}
