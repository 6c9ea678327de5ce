//! Bundle verification for sigcheck
//!
//! This crate answers one question: was this artifact digest signed by an
//! identity the policy accepts, with log-backed proof of when the signature
//! existed?
//!
//! # Example
//!
//! ```no_run
//! use sigcheck_verify::config::Settings;
//! use sigcheck_verify::VerifierContext;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::from_file("/etc/sigcheck/sigcheck.toml")?;
//! let context = VerifierContext::from_settings(&settings)?;
//!
//! let digest = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
//! let result = context.verify(digest, "artifact.sigstore.json")?;
//! println!("signed by {:?}", result.san());
//! # Ok(())
//! # }
//! ```
//!
//! Lower-level callers build a [`Policy`] and call [`Verifier::verify`]
//! with their own trust material snapshot.

pub mod config;
pub mod context;
pub mod error;
pub mod policy;
mod verify;

mod verify_impl;

#[cfg(test)]
mod test_data;

pub use sigcheck_bundle as bundle;
pub use sigcheck_crypto as crypto;
pub use sigcheck_merkle as merkle;
pub use sigcheck_rekor as rekor;
pub use sigcheck_trust_root as trust_root;
pub use sigcheck_types as types;

pub use context::VerifierContext;
pub use error::{Error, ErrorKind, Result};
pub use policy::{
    ArtifactPolicy, CertificateIdentityPolicy, CertificateSummary, FulcioExtension,
    IdentityPolicy, Policy, StringMatcher,
};
pub use verify::{
    TimestampSource, VerificationResult, VerifiedTimestamp, Verifier, VerifierConfig,
    DEFAULT_CLOCK_SKEW_SECONDS,
};
