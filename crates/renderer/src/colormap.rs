//! Diverging red-yellow-green colormap for NDVI values.

use std::sync::OnceLock;

use rayon::prelude::*;

/// Lower edge of the NDVI normalization domain.
pub const NDVI_MIN: f64 = -1.0;
/// Upper edge of the NDVI normalization domain.
pub const NDVI_MAX: f64 = 1.0;

/// Lookup table resolution. Values are quantized to `1/LUT_SIZE` steps of
/// the normalized domain before the color lookup.
const LUT_SIZE: usize = 256;

/// Color value in RGBA format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }
}

/// The 11 anchor colors of the diverging scale, low NDVI (bare soil,
/// water) in deep red through yellow to high NDVI (dense vegetation) in
/// deep green.
const ANCHORS: [(u8, u8, u8); 11] = [
    (165, 0, 38),
    (215, 48, 39),
    (244, 109, 67),
    (253, 174, 97),
    (254, 224, 139),
    (255, 255, 191),
    (217, 239, 139),
    (166, 217, 106),
    (102, 189, 99),
    (26, 152, 80),
    (0, 104, 55),
];

/// Build the lookup table by linear interpolation between the anchors.
///
/// Interpolation runs in unit-float color space and the result is scaled
/// back to bytes by truncation, matching the quantization of the colormap
/// engine the output format was calibrated against.
fn lut() -> &'static [Color; LUT_SIZE] {
    static LUT: OnceLock<[Color; LUT_SIZE]> = OnceLock::new();
    LUT.get_or_init(|| {
        let mut table = [Color::transparent(); LUT_SIZE];
        let segments = (ANCHORS.len() - 1) as f64;

        for (i, entry) in table.iter_mut().enumerate() {
            let x = i as f64 / (LUT_SIZE - 1) as f64;
            let position = x * segments;
            let index = (position.floor() as usize).min(ANCHORS.len() - 2);
            let fraction = position - index as f64;

            let (r0, g0, b0) = ANCHORS[index];
            let (r1, g1, b1) = ANCHORS[index + 1];

            let channel = |a: u8, b: u8| -> u8 {
                let v = a as f64 / 255.0 + (b as f64 - a as f64) / 255.0 * fraction;
                (v * 255.0) as u8
            };

            *entry = Color::new(channel(r0, r1), channel(g0, g1), channel(b0, b1), 255);
        }
        table
    })
}

/// Map one NDVI value to a color.
///
/// The value is normalized linearly against [`NDVI_MIN`]..[`NDVI_MAX`];
/// values outside the domain clamp to the scale ends. NaN (the nodata
/// sentinel) maps to a fully transparent pixel.
pub fn ndvi_color(value: f64) -> Color {
    if value.is_nan() {
        return Color::transparent();
    }

    let t = (value - NDVI_MIN) / (NDVI_MAX - NDVI_MIN);
    let index = ((t * LUT_SIZE as f64).floor() as i64).clamp(0, LUT_SIZE as i64 - 1);
    lut()[index as usize]
}

/// Render an NDVI grid as RGBA pixel data (4 bytes per pixel, row-major).
///
/// Rows are colored in parallel; the output is identical to the
/// sequential loop.
pub fn colorize_ndvi(data: &[f64], width: usize, height: usize) -> Vec<u8> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut pixels = vec![0u8; width * height * 4];

    pixels
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(row, out_row)| {
            for (col, pixel) in out_row.chunks_exact_mut(4).enumerate() {
                let value = data.get(row * width + col).copied().unwrap_or(f64::NAN);
                let color = ndvi_color(value);
                pixel[0] = color.r;
                pixel[1] = color.g;
                pixel[2] = color.b;
                pixel[3] = color.a;
            }
        });

    pixels
}
