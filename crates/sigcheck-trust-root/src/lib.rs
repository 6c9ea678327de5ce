//! Trusted root parsing and trust material
//!
//! The trusted root contains all the trust anchors needed for verification:
//! - certificate authorities (for signing certificates)
//! - transparency log public keys (for log entry verification)
//! - Certificate Transparency log public keys (for SCT verification)
//! - timestamp authority certificates (for RFC 3161 timestamp verification)
//!
//! [`TrustedRoot`] is the document as written. [`TrustedRootMaterial`] is the
//! validated snapshot the verifier works against.
//!
//! # Example
//!
//! ```no_run
//! use sigcheck_trust_root::{FileSource, SharedTrustMaterial};
//!
//! # fn example() -> Result<(), sigcheck_trust_root::Error> {
//! let source = FileSource::new("trusted_root.json");
//! let shared = SharedTrustMaterial::load(&source)?;
//! let material = shared.snapshot();
//! assert!(!material.certificate_authorities().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod material;
pub mod source;
pub mod trusted_root;

pub use error::{Error, Result};
pub use material::{CertificateAuthorityMaterial, LogMaterial, TrustedCertificate, TrustedRootMaterial};
pub use source::{FileSource, SharedTrustMaterial, StaticSource, TrustMaterialSource};
pub use trusted_root::{
    CertificateAuthority, DistinguishedName, PublicKey, TransparencyLogInstance, TrustedRoot,
    ValidityPeriod, TRUSTED_ROOT_MEDIA_TYPE,
};
