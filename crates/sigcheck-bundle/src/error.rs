//! Error types for sigcheck-bundle

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a bundle
#[derive(Error, Debug)]
pub enum Error {
    /// The bundle file could not be read
    #[error("failed to read bundle {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The bundle is malformed
    #[error("malformed bundle: {reason}")]
    Parse { reason: String },

    /// The bundle violates the rules of its media type
    #[error("invalid bundle: {0}")]
    Validation(String),
}

impl Error {
    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Error::Parse {
            reason: reason.into(),
        }
    }
}

impl From<sigcheck_types::Error> for Error {
    fn from(e: sigcheck_types::Error) -> Self {
        Error::parse(e.to_string())
    }
}

/// Result type for bundle operations
pub type Result<T> = std::result::Result<T, Error>;
