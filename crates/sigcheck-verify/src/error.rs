//! Error types for sigcheck-verify
//!
//! Every variant is terminal and means "verification failed". The variant
//! names the step that rejected the bundle; the message carries the detail.

use thiserror::Error;

/// Errors that can occur during verification
#[derive(Error, Debug)]
pub enum Error {
    /// Matcher or policy configuration is malformed
    #[error("invalid policy configuration: {0}")]
    InvalidPolicyConfig(String),

    /// The bundle file or the digest is malformed
    #[error("parse error: {reason}")]
    Parse { reason: String },

    /// The trust material snapshot is empty or expired
    #[error("trust material unavailable: {0}")]
    TrustMaterialUnavailable(String),

    /// No valid chain to a trusted root within validity
    #[error("certificate chain invalid: {0}")]
    CertificateChainInvalid(String),

    /// Fewer valid SCTs than required
    #[error("insufficient valid SCTs: {0}")]
    InsufficientValidScts(String),

    /// Inclusion proof, checkpoint, SET or entry consistency failed
    #[error("inclusion proof invalid: {0}")]
    InclusionProofInvalid(String),

    /// The bundle signature does not verify with the leaf key
    #[error("signature invalid: {0}")]
    SignatureInvalid(String),

    /// Fewer trustworthy observer timestamps than required
    #[error("no trustworthy timestamp: {0}")]
    NoTrustworthyTimestamp(String),

    /// The artifact digest does not match the policy
    #[error("digest mismatch: {0}")]
    DigestMismatch(String),

    /// The certificate identity does not satisfy the policy
    #[error("identity policy mismatch: {0}")]
    IdentityPolicyMismatch(String),
}

/// Discriminant of [`Error`], for matching without the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidPolicyConfig,
    Parse,
    TrustMaterialUnavailable,
    CertificateChainInvalid,
    InsufficientValidScts,
    InclusionProofInvalid,
    SignatureInvalid,
    NoTrustworthyTimestamp,
    DigestMismatch,
    IdentityPolicyMismatch,
}

impl Error {
    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Error::Parse {
            reason: reason.into(),
        }
    }

    /// The kind of failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidPolicyConfig(_) => ErrorKind::InvalidPolicyConfig,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::TrustMaterialUnavailable(_) => ErrorKind::TrustMaterialUnavailable,
            Error::CertificateChainInvalid(_) => ErrorKind::CertificateChainInvalid,
            Error::InsufficientValidScts(_) => ErrorKind::InsufficientValidScts,
            Error::InclusionProofInvalid(_) => ErrorKind::InclusionProofInvalid,
            Error::SignatureInvalid(_) => ErrorKind::SignatureInvalid,
            Error::NoTrustworthyTimestamp(_) => ErrorKind::NoTrustworthyTimestamp,
            Error::DigestMismatch(_) => ErrorKind::DigestMismatch,
            Error::IdentityPolicyMismatch(_) => ErrorKind::IdentityPolicyMismatch,
        }
    }
}

impl From<sigcheck_bundle::Error> for Error {
    fn from(e: sigcheck_bundle::Error) -> Self {
        Error::parse(e.to_string())
    }
}

/// Result type for verification operations
pub type Result<T> = std::result::Result<T, Error>;
