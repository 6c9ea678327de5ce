//! Error types for sigcheck-types

use thiserror::Error;

/// Errors that can occur when decoding wire types
#[derive(Error, Debug)]
pub enum Error {
    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding failed
    #[error("base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Hex decoding failed
    #[error("hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// A fixed-size value had the wrong length
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Unknown or unsupported bundle media type
    #[error("invalid media type: {0}")]
    InvalidMediaType(String),

    /// A required field is absent
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Checkpoint (signed note) text is malformed
    #[error("invalid checkpoint: {0}")]
    InvalidCheckpoint(String),

    /// Unknown hash algorithm name
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(String),
}

/// Result type for sigcheck-types operations
pub type Result<T> = std::result::Result<T, Error>;
