//! NDVI map builder.
//!
//! Walks a data directory for boundary descriptors and produces one
//! color-coded NDVI image plus one metadata record per boundary.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use ndvi_pipeline::{build_boundary_maps, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "map-builder")]
#[command(about = "Build NDVI maps for boundaries from satellite band data")]
struct Args {
    /// Directory to read band/boundary data from and write maps to
    data_dir: PathBuf,

    /// Prefix of the band data files (e.g. "satData_band")
    band_prefix: String,

    /// Prefix of the boundary GeoJSON files (e.g. "boundary_geometry_")
    boundary_prefix: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("computing NDVI maps");

    let config = PipelineConfig {
        data_dir: args.data_dir,
        band_prefix: args.band_prefix,
        boundary_prefix: args.boundary_prefix,
    };

    // A failed batch is reported but does not fail the process; callers
    // watch the logs and the per-boundary outputs, not the exit status.
    match build_boundary_maps(&config) {
        Ok(summary) => {
            if !summary.failed.is_empty() {
                let ids: Vec<&str> = summary.failed.iter().map(|(id, _)| id.as_str()).collect();
                error!(boundaries = ?ids, "some boundaries failed");
            }
            info!(
                succeeded = summary.succeeded.len(),
                failed = summary.failed.len(),
                "maps computed and written to the data directory"
            );
        }
        Err(err) => {
            error!(error = %err, "NDVI batch failed");
        }
    }

    Ok(())
}
