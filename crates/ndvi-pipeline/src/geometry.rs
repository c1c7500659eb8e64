//! Boundary geometry: GeoJSON parsing, reprojection, containment.

use serde::Deserialize;

use map_common::BoundingBox;
use projection::{ProjectionResult, Transformer};

use crate::{PipelineError, PipelineResult};

/// GeoJSON geometry object as it appears in a boundary descriptor.
///
/// Positions may carry an elevation; only the first two elements are read.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

/// A boundary polygon or multipolygon.
///
/// Stored in multipolygon form: polygons, each an outer ring followed by
/// any holes, each ring a closed list of (x, y) vertices.
#[derive(Debug, Clone)]
pub struct Geometry {
    polygons: Vec<Vec<Vec<(f64, f64)>>>,
}

impl Geometry {
    /// Parse a GeoJSON geometry object.
    pub fn from_geojson(text: &str) -> PipelineResult<Self> {
        let raw: RawGeometry = serde_json::from_str(text)?;

        let polygons = match raw {
            RawGeometry::Polygon { coordinates } => vec![convert_polygon(coordinates)?],
            RawGeometry::MultiPolygon { coordinates } => coordinates
                .into_iter()
                .map(convert_polygon)
                .collect::<PipelineResult<Vec<_>>>()?,
        };

        if polygons.iter().all(|rings| rings.is_empty()) {
            return Err(PipelineError::InvalidGeometry(
                "geometry has no rings".into(),
            ));
        }

        Ok(Self { polygons })
    }

    /// The geometry with every vertex run through the transform.
    pub fn transformed(&self, transformer: &Transformer) -> ProjectionResult<Self> {
        let mut polygons = Vec::with_capacity(self.polygons.len());
        for rings in &self.polygons {
            let mut out_rings = Vec::with_capacity(rings.len());
            for ring in rings {
                let mut out_ring = Vec::with_capacity(ring.len());
                for &(x, y) in ring {
                    out_ring.push(transformer.transform(x, y)?);
                }
                out_rings.push(out_ring);
            }
            polygons.push(out_rings);
        }
        Ok(Self { polygons })
    }

    /// Envelope over every vertex of every ring.
    pub fn bounds(&self) -> BoundingBox {
        let points = self
            .polygons
            .iter()
            .flatten()
            .flatten()
            .copied();
        // from_geojson rejects empty geometry, so there is always a vertex.
        BoundingBox::from_points(points).unwrap_or(BoundingBox::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Even-odd containment test.
    ///
    /// A point is inside if an eastbound ray crosses the rings of any one
    /// polygon an odd number of times; holes fall out of the count
    /// naturally.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.polygons
            .iter()
            .any(|rings| polygon_contains(rings, x, y))
    }
}

fn convert_polygon(rings: Vec<Vec<Vec<f64>>>) -> PipelineResult<Vec<Vec<(f64, f64)>>> {
    rings
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|position| {
                    if position.len() < 2 {
                        return Err(PipelineError::InvalidGeometry(format!(
                            "position has {} coordinates",
                            position.len()
                        )));
                    }
                    Ok((position[0], position[1]))
                })
                .collect()
        })
        .collect()
}

fn polygon_contains(rings: &[Vec<(f64, f64)>], x: f64, y: f64) -> bool {
    let mut inside = false;

    for ring in rings {
        let n = ring.len();
        if n < 3 {
            continue;
        }

        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = ring[i];
            let (xj, yj) = ring[j];

            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
    }

    inside
}
