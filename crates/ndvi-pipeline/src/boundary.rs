//! Boundary descriptor discovery and id parsing.

use std::fs;
use std::path::Path;

use crate::geometry::Geometry;
use crate::{PipelineError, PipelineResult};

/// Required suffix of every boundary descriptor file.
const BOUNDARY_SUFFIX: &str = ".json";

/// List boundary descriptor file names in the data directory.
///
/// Matches on the prefix only; order is whatever the directory listing
/// yields. Subdirectories are ignored.
pub fn find_boundary_files(data_dir: &Path, boundary_prefix: &str) -> PipelineResult<Vec<String>> {
    let mut names = Vec::new();

    for entry in fs::read_dir(data_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(boundary_prefix) {
            names.push(name.to_string());
        }
    }

    Ok(names)
}

/// Extract the boundary id from a descriptor file name.
///
/// `boundary_geometry_A17.json` with prefix `boundary_geometry_` yields
/// `A17`. The suffix must be exactly `.json` and the id itself must not
/// contain a dot — that guards against double extensions like
/// `A17.json.bak` or `A.17.json` silently producing colliding ids.
pub fn parse_boundary_id(file_name: &str, boundary_prefix: &str) -> PipelineResult<String> {
    let rest = file_name
        .strip_prefix(boundary_prefix)
        .ok_or_else(|| PipelineError::InvalidBoundaryName(file_name.to_string()))?;
    let id = rest
        .strip_suffix(BOUNDARY_SUFFIX)
        .ok_or_else(|| PipelineError::InvalidBoundaryName(file_name.to_string()))?;

    if id.contains('.') {
        return Err(PipelineError::InvalidBoundaryId(id.to_string()));
    }

    Ok(id.to_string())
}

/// Read and parse a boundary descriptor's geometry.
pub fn load_geometry(path: &Path) -> PipelineResult<Geometry> {
    let text = fs::read_to_string(path)?;
    Geometry::from_geojson(&text)
}
