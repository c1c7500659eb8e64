//! Integration tests for NDVI colorization.

use renderer::{colorize_ndvi, create_png, ndvi_color};

#[test]
fn test_colorize_grid_layout() {
    // 3x2 grid: one nodata cell, the rest spanning the domain.
    let data = [f64::NAN, -1.0, 0.0, 0.5, 1.0, -0.5];
    let pixels = colorize_ndvi(&data, 3, 2);

    assert_eq!(pixels.len(), 3 * 2 * 4);

    // Nodata cell is fully transparent, all others opaque.
    assert_eq!(pixels[3], 0);
    for cell in 1..6 {
        assert_eq!(pixels[cell * 4 + 3], 255, "cell {cell} should be opaque");
    }

    // Cells match the scalar mapping.
    let expected = ndvi_color(0.5);
    assert_eq!(pixels[3 * 4], expected.r);
    assert_eq!(pixels[3 * 4 + 1], expected.g);
    assert_eq!(pixels[3 * 4 + 2], expected.b);
}

#[test]
fn test_colorize_matches_sequential_reference() {
    // The parallel row loop must be indistinguishable from a plain loop.
    let data: Vec<f64> = (0..1024)
        .map(|i| {
            if i % 17 == 0 {
                f64::NAN
            } else {
                (i as f64 / 512.0) - 1.0
            }
        })
        .collect();

    let pixels = colorize_ndvi(&data, 32, 32);

    for (i, value) in data.iter().enumerate() {
        let color = ndvi_color(*value);
        assert_eq!(pixels[i * 4], color.r);
        assert_eq!(pixels[i * 4 + 1], color.g);
        assert_eq!(pixels[i * 4 + 2], color.b);
        assert_eq!(pixels[i * 4 + 3], color.a);
    }
}

#[test]
fn test_colorized_grid_encodes_to_png() {
    let data: Vec<f64> = (0..64).map(|i| (i as f64 / 32.0) - 1.0).collect();
    let pixels = colorize_ndvi(&data, 8, 8);

    let png = create_png(&pixels, 8, 8).unwrap();
    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
}
