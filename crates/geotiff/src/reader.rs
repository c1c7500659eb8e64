//! GeoTIFF decoding into the shared raster grid.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

use map_common::{GeoTransform, Raster};

use crate::{GeotiffError, GeotiffResult, KEY_GEOGRAPHIC_TYPE, KEY_PROJECTED_CS_TYPE};

/// Read a single-band GeoTIFF into a [`Raster`].
///
/// Integer samples are widened to f64 so downstream band arithmetic never
/// overflows. The EPSG code is taken from the GeoKeyDirectory (projected
/// key preferred over the geographic one) and the nodata sentinel from the
/// GDAL nodata tag, when present.
pub fn read_geotiff<P: AsRef<Path>>(path: P) -> GeotiffResult<Raster> {
    let file = File::open(path.as_ref())?;
    let mut decoder = Decoder::new(BufReader::new(file))?;

    let (width, height) = decoder.dimensions()?;
    let width = width as usize;
    let height = height as usize;

    let data = decode_samples(decoder.read_image()?)?;
    if data.len() != width * height {
        return Err(GeotiffError::DimensionMismatch {
            width,
            height,
            actual: data.len(),
        });
    }

    let transform = read_geotransform(&mut decoder)?;

    let mut raster = Raster::new(data, width, height, transform)
        .map_err(|e| GeotiffError::Decode(e.to_string()))?;
    raster.epsg = read_epsg(&mut decoder);
    raster.nodata = read_nodata(&mut decoder);

    Ok(raster)
}

fn decode_samples(result: DecodingResult) -> GeotiffResult<Vec<f64>> {
    let data = match result {
        DecodingResult::U8(buf) => buf.iter().map(|&v| v as f64).collect(),
        DecodingResult::U16(buf) => buf.iter().map(|&v| v as f64).collect(),
        DecodingResult::U32(buf) => buf.iter().map(|&v| v as f64).collect(),
        DecodingResult::I8(buf) => buf.iter().map(|&v| v as f64).collect(),
        DecodingResult::I16(buf) => buf.iter().map(|&v| v as f64).collect(),
        DecodingResult::I32(buf) => buf.iter().map(|&v| v as f64).collect(),
        DecodingResult::F32(buf) => buf.iter().map(|&v| v as f64).collect(),
        DecodingResult::F64(buf) => buf,
        _ => {
            return Err(GeotiffError::UnsupportedFormat(
                "unexpected sample buffer layout".into(),
            ))
        }
    };
    Ok(data)
}

/// Build the affine transform from ModelPixelScale + ModelTiepoint.
fn read_geotransform<R>(decoder: &mut Decoder<R>) -> GeotiffResult<GeoTransform>
where
    R: std::io::Read + std::io::Seek,
{
    let scale = decoder
        .get_tag_f64_vec(Tag::ModelPixelScaleTag)
        .map_err(|_| GeotiffError::MissingGeoreference("no ModelPixelScale tag".into()))?;
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::ModelTiepointTag)
        .map_err(|_| GeotiffError::MissingGeoreference("no ModelTiepoint tag".into()))?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return Err(GeotiffError::MissingGeoreference(format!(
            "truncated georeferencing tags (scale: {}, tiepoint: {})",
            scale.len(),
            tiepoint.len()
        )));
    }

    // Tiepoint is [I, J, K, X, Y, Z]: raster point (I, J) pinned to world
    // point (X, Y). Almost always (0, 0) -> upper-left.
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];

    Ok(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]))
}

/// Extract the EPSG code from the GeoKeyDirectory.
///
/// The projected key (3072) wins over the geographic one (2048): a
/// projected file usually carries both, and the projected code is the one
/// the raster's coordinates are expressed in.
fn read_epsg<R>(decoder: &mut Decoder<R>) -> Option<u32>
where
    R: std::io::Read + std::io::Seek,
{
    let keys = decoder
        .get_tag_u32_vec(Tag::GeoKeyDirectoryTag)
        .ok()?;
    if keys.len() < 4 {
        return None;
    }

    let mut geographic = None;
    let entries = keys[3] as usize;
    for i in 0..entries {
        let base = 4 + i * 4;
        if base + 3 >= keys.len() {
            break;
        }

        let (key_id, location, value) = (keys[base], keys[base + 1], keys[base + 3]);
        if location != 0 {
            // Value lives in another tag; EPSG codes never do.
            continue;
        }

        match key_id as u16 {
            KEY_PROJECTED_CS_TYPE => return Some(value),
            KEY_GEOGRAPHIC_TYPE => geographic = Some(value),
            _ => {}
        }
    }

    geographic
}

fn read_nodata<R>(decoder: &mut Decoder<R>) -> Option<f64>
where
    R: std::io::Read + std::io::Seek,
{
    let text = decoder
        .get_tag_ascii_string(Tag::GdalNodata)
        .ok()?;
    text.trim().trim_end_matches('\0').parse::<f64>().ok()
}
