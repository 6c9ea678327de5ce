//! Cryptographic primitives for sigcheck
//!
//! - SHA-2 hashing ([`sha256`], [`digest`])
//! - Signature verification for ECDSA P-256/P-384 and Ed25519 keys given as
//!   SubjectPublicKeyInfo DER ([`PublicKey`], [`verify_signature`])
//! - X.509 helpers: original TBS extraction, issued-by checks and PEM decoding
//!
//! This crate only verifies; it never signs.

pub mod error;
pub mod hash;
pub mod verification;
pub mod x509;

pub use error::{Error, Result};
pub use hash::{digest, sha256};
pub use verification::{verify_signature, verify_signature_auto, PublicKey, SigningScheme};
pub use x509::{
    certificate_info, der_from_pem, extract_tbs_der, is_self_issued, parse_certificate,
    parse_certificate_info, unix_time, verify_issued_by, CertificateInfo,
};
