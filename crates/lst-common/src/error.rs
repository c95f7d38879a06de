//! Error types for the Landsat LST toolkit.

use thiserror::Error;

/// Result type alias using LstError.
pub type LstResult<T> = Result<T, LstError>;

/// Primary error type for scene processing.
#[derive(Debug, Error)]
pub enum LstError {
    // === Metadata Errors ===
    #[error("No MTL metadata file found in {0}")]
    MetadataNotFound(String),

    #[error("Malformed MTL metadata: {0}")]
    MetadataMalformed(String),

    #[error("Unsupported Landsat mission: {0}")]
    UnsupportedSensor(String),

    // === Band Errors ===
    #[error("Required band file missing: {0}")]
    BandFileMissing(String),

    #[error("Band shape mismatch: {band} is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    BandShapeMismatch {
        band: String,
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    // === Computation Errors ===
    #[error("Computation out of domain: {0}")]
    ComputationOutOfDomain(String),

    // === I/O Errors ===
    #[error("Failed to read raster: {0}")]
    RasterReadFailed(String),

    #[error("Failed to write output raster: {0}")]
    OutputWriteFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LstError {
    /// Stable short identifier for the per-scene report table.
    pub fn kind(&self) -> &'static str {
        match self {
            LstError::MetadataNotFound(_) => "MetadataNotFound",
            LstError::MetadataMalformed(_) => "MetadataMalformed",
            LstError::UnsupportedSensor(_) => "UnsupportedSensor",
            LstError::BandFileMissing(_) => "BandFileMissing",
            LstError::BandShapeMismatch { .. } => "BandShapeMismatch",
            LstError::ComputationOutOfDomain(_) => "ComputationOutOfDomain",
            LstError::RasterReadFailed(_) => "RasterReadFailed",
            LstError::OutputWriteFailed(_) => "OutputWriteFailed",
            LstError::Io(_) => "Io",
        }
    }
}

impl From<serde_json::Error> for LstError {
    fn from(err: serde_json::Error) -> Self {
        LstError::OutputWriteFailed(format!("JSON error: {}", err))
    }
}
