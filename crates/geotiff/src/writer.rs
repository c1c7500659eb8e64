//! GeoTIFF encoding from the shared raster grid.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use tiff::encoder::colortype::{Gray32Float, Gray8};
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;

use map_common::Raster;

use crate::{
    GeotiffError, GeotiffResult, KEY_GEOGRAPHIC_TYPE, KEY_GT_MODEL_TYPE, KEY_GT_RASTER_TYPE,
    KEY_PROJECTED_CS_TYPE, MODEL_TYPE_GEOGRAPHIC, MODEL_TYPE_PROJECTED, RASTER_PIXEL_IS_AREA,
};

/// Write a raster as a 32-bit float grayscale GeoTIFF.
///
/// NaN samples are written through unchanged; the GDAL nodata tag records
/// the raster's sentinel so readers can recover it.
pub fn write_gray_f32<P: AsRef<Path>>(path: P, raster: &Raster) -> GeotiffResult<()> {
    let samples: Vec<f32> = raster.data.iter().map(|&v| v as f32).collect();

    let file = File::create(path.as_ref())?;
    let mut encoder =
        TiffEncoder::new(BufWriter::new(file)).map_err(|e| GeotiffError::Encode(e.to_string()))?;

    let mut image = encoder
        .new_image::<Gray32Float>(raster.width as u32, raster.height as u32)
        .map_err(|e| GeotiffError::Encode(e.to_string()))?;
    write_geo_tags(image.encoder(), raster)?;
    image
        .write_data(&samples)
        .map_err(|e| GeotiffError::Encode(e.to_string()))?;

    Ok(())
}

/// Write a raster as an 8-bit grayscale GeoTIFF.
///
/// Samples are rounded to the nearest integer and clamped to the byte
/// range; NaN falls back to the nodata sentinel (or 0).
pub fn write_gray_u8<P: AsRef<Path>>(path: P, raster: &Raster) -> GeotiffResult<()> {
    let fill = raster.nodata.unwrap_or(0.0);
    let samples: Vec<u8> = raster
        .data
        .iter()
        .map(|&v| {
            let v = if v.is_nan() { fill } else { v };
            v.round().clamp(0.0, 255.0) as u8
        })
        .collect();

    let file = File::create(path.as_ref())?;
    let mut encoder =
        TiffEncoder::new(BufWriter::new(file)).map_err(|e| GeotiffError::Encode(e.to_string()))?;

    let mut image = encoder
        .new_image::<Gray8>(raster.width as u32, raster.height as u32)
        .map_err(|e| GeotiffError::Encode(e.to_string()))?;
    write_geo_tags(image.encoder(), raster)?;
    image
        .write_data(&samples)
        .map_err(|e| GeotiffError::Encode(e.to_string()))?;

    Ok(())
}

fn write_geo_tags<W, K>(dir: &mut DirectoryEncoder<W, K>, raster: &Raster) -> GeotiffResult<()>
where
    W: Write + Seek,
    K: TiffKind,
{
    let gt = &raster.transform;

    // ModelPixelScale: [ScaleX, ScaleY, ScaleZ], scales always positive.
    let pixel_scale = [gt.pixel_width.abs(), gt.pixel_height.abs(), 0.0];
    dir.write_tag(Tag::ModelPixelScaleTag, pixel_scale.as_slice())
        .map_err(|e| GeotiffError::Encode(e.to_string()))?;

    // ModelTiepoint: pixel (0, 0) pinned to the upper-left corner.
    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    dir.write_tag(Tag::ModelTiepointTag, tiepoint.as_slice())
        .map_err(|e| GeotiffError::Encode(e.to_string()))?;

    if let Some(epsg) = raster.epsg {
        let keys = build_geokey_directory(epsg);
        dir.write_tag(Tag::GeoKeyDirectoryTag, keys.as_slice())
            .map_err(|e| GeotiffError::Encode(e.to_string()))?;

        if let Some(definition) = projection::proj_string(epsg) {
            // Pipe-delimited per the GeoTIFF ASCII params convention.
            let ascii = format!("{definition}|");
            dir.write_tag(Tag::GeoAsciiParamsTag, ascii.as_str())
                .map_err(|e| GeotiffError::Encode(e.to_string()))?;
        }
    }

    if let Some(nodata) = raster.nodata {
        dir.write_tag(Tag::GdalNodata, format_nodata(nodata).as_str())
            .map_err(|e| GeotiffError::Encode(e.to_string()))?;
    }

    Ok(())
}

/// GeoKeyDirectory: version header then (KeyID, TagLocation, Count, Value)
/// entries for model type, raster type, and the CRS code.
fn build_geokey_directory(epsg: u32) -> Vec<u16> {
    let geographic = projection::is_geographic(epsg);

    let model_type = if geographic {
        MODEL_TYPE_GEOGRAPHIC
    } else {
        MODEL_TYPE_PROJECTED
    };
    let crs_key = if geographic {
        KEY_GEOGRAPHIC_TYPE
    } else {
        KEY_PROJECTED_CS_TYPE
    };

    vec![
        1, 1, 0, 3, // KeyDirectoryVersion, KeyRevision, MinorRevision, NumberOfKeys
        KEY_GT_MODEL_TYPE, 0, 1, model_type,
        KEY_GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA,
        crs_key, 0, 1, epsg as u16,
    ]
}

fn format_nodata(nodata: f64) -> String {
    if nodata.is_nan() {
        "nan".to_string()
    } else if nodata == nodata.trunc() {
        format!("{}", nodata as i64)
    } else {
        format!("{nodata}")
    }
}
