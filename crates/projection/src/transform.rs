//! Point transforms between EPSG codes.

use proj4rs::proj::Proj;

use crate::{ProjectionError, ProjectionResult};

/// Get the PROJ definition string for an EPSG code.
pub fn proj_string(epsg: u32) -> Option<&'static str> {
    u16::try_from(epsg)
        .ok()
        .and_then(crs_definitions::from_code)
        .map(|def| def.proj4)
}

/// Check if an EPSG code denotes a geographic (lon/lat) system.
///
/// Decided from the projection definition rather than the code range, so
/// projected systems outside the usual numbering are never misclassified.
pub fn is_geographic(epsg: u32) -> bool {
    match proj_string(epsg) {
        Some(def) => def.contains("+proj=longlat"),
        None => epsg == 4326 || (4000..5000).contains(&epsg),
    }
}

/// A reusable transform between two coordinate reference systems.
///
/// Parses both projection definitions once; `transform` can then be called
/// per vertex or per pixel without touching the CRS database again.
pub struct Transformer {
    source: Proj,
    target: Proj,
    source_geographic: bool,
    target_geographic: bool,
}

impl Transformer {
    /// Build a transform from `source_epsg` to `target_epsg`.
    pub fn new(source_epsg: u32, target_epsg: u32) -> ProjectionResult<Self> {
        let source = parse_proj(source_epsg)?;
        let target = parse_proj(target_epsg)?;

        Ok(Self {
            source,
            target,
            source_geographic: is_geographic(source_epsg),
            target_geographic: is_geographic(target_epsg),
        })
    }

    /// Transform a single point.
    ///
    /// Geographic coordinates are degrees on both sides; the radian
    /// convention of proj4rs is handled internally.
    pub fn transform(&self, x: f64, y: f64) -> ProjectionResult<(f64, f64)> {
        let (x_in, y_in) = if self.source_geographic {
            (x.to_radians(), y.to_radians())
        } else {
            (x, y)
        };

        let mut point = (x_in, y_in, 0.0);
        proj4rs::transform::transform(&self.source, &self.target, &mut point)
            .map_err(|e| ProjectionError::TransformFailed(format!("({x}, {y}): {e:?}")))?;

        if self.target_geographic {
            Ok((point.0.to_degrees(), point.1.to_degrees()))
        } else {
            Ok((point.0, point.1))
        }
    }
}

fn parse_proj(epsg: u32) -> ProjectionResult<Proj> {
    let definition = proj_string(epsg).ok_or(ProjectionError::UnknownCrs(epsg))?;

    Proj::from_proj_string(definition).map_err(|e| ProjectionError::InvalidDefinition {
        epsg,
        message: format!("{e:?}"),
    })
}
