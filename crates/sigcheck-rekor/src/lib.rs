//! Rekor entry bodies
//!
//! A transparency log entry in a bundle carries the canonicalized body that
//! was submitted to the log. Verification parses it to check that the log
//! recorded the same signature, certificate and digest as the bundle.

pub mod body;

pub use body::{
    DsseV001Body, DsseV002Body, HashedRekordV001Body, HashedRekordV002Body, IntotoV002Body,
    RekorEntryBody,
};

use thiserror::Error;

/// Errors from parsing entry bodies
#[derive(Error, Debug)]
pub enum Error {
    /// Body is not valid JSON for its kind
    #[error("invalid entry body: {0}")]
    Json(#[from] serde_json::Error),

    /// Kind and version pair is not supported
    #[error("unsupported entry kind {kind} version {version}")]
    UnsupportedKind { kind: String, version: String },

    /// An encoded field could not be decoded
    #[error("invalid encoding: {0}")]
    Encoding(#[from] sigcheck_types::Error),

    /// An embedded PEM certificate could not be decoded
    #[error("invalid embedded certificate: {0}")]
    Certificate(#[from] sigcheck_crypto::Error),
}

/// Result type for entry body parsing
pub type Result<T> = std::result::Result<T, Error>;
