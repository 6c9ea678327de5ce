//! Error types for sigcheck-trust-root

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in trust root operations
#[derive(Error, Debug)]
pub enum Error {
    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The trusted root file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Unexpected media type
    #[error("unsupported trusted root media type: {0}")]
    UnsupportedMediaType(String),

    /// A certificate chain is empty or does not verify
    #[error("invalid certificate chain for {authority}: {reason}")]
    InvalidChain { authority: String, reason: String },

    /// A log key is malformed
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Result type for trust root operations
pub type Result<T> = std::result::Result<T, Error>;
