//! Error types for GeoTIFF I/O.

use thiserror::Error;

/// Result type alias using GeotiffError.
pub type GeotiffResult<T> = Result<T, GeotiffError>;

/// Errors that can occur while reading or writing GeoTIFF files.
#[derive(Debug, Error)]
pub enum GeotiffError {
    /// TIFF container could not be decoded.
    #[error("failed to decode TIFF: {0}")]
    Decode(String),

    /// TIFF container could not be encoded.
    #[error("failed to encode TIFF: {0}")]
    Encode(String),

    /// The sample layout is not one we can widen to f64.
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The decoded sample count does not match the image dimensions.
    #[error("decoded {actual} samples for a {width}x{height} image")]
    DimensionMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },

    /// Georeferencing tags are absent or malformed.
    #[error("missing georeferencing: {0}")]
    MissingGeoreference(String),

    /// Underlying filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<tiff::TiffError> for GeotiffError {
    fn from(err: tiff::TiffError) -> Self {
        GeotiffError::Decode(err.to_string())
    }
}
