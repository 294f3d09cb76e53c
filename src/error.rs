//! Error types for NRRD decode operations

use thiserror::Error;

/// Main error type for NRRD operations
#[derive(Error, Debug)]
pub enum NrrdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid NRRD header: {0}")]
    InvalidHeader(String),

    #[error("Unsupported NRRD element type: {0}")]
    UnsupportedElementType(String),

    #[error("Malformed value for header field '{key}': {value}")]
    MalformedHeaderValue { key: String, value: String },

    #[error("Missing required header field: {0}")]
    MissingField(&'static str),

    #[error("Dimension mismatch: header declares {expected} axes, sizes has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Truncated payload: need {required} bytes, have {available}")]
    TruncatedPayload { required: usize, available: usize },

    #[error("Decompression error: {0}")]
    Decompression(String),

    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Specialized Result type for NRRD operations
pub type Result<T> = std::result::Result<T, NrrdError>;

impl From<serde_json::Error> for NrrdError {
    fn from(err: serde_json::Error) -> Self {
        NrrdError::Serialization(err.to_string())
    }
}
