//! Error types for sigcheck-crypto

use thiserror::Error;

/// Errors from cryptographic operations
#[derive(Error, Debug)]
pub enum Error {
    /// Public key bytes could not be decoded
    #[error("invalid public key: {0}")]
    InvalidKey(String),

    /// Signature bytes could not be decoded
    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    /// Signature did not verify
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key type, curve or hash combination is not supported
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Certificate is malformed or violates an expected property
    #[error("certificate error: {0}")]
    Certificate(String),

    /// ASN.1 DER error
    #[error("DER error: {0}")]
    Der(#[from] der::Error),

    /// PEM armor error
    #[error("PEM error: {0}")]
    Pem(String),
}

/// Result type for sigcheck-crypto operations
pub type Result<T> = std::result::Result<T, Error>;
