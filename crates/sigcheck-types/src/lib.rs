//! Core wire types for sigcheck
//!
//! This crate holds the data structures shared by the verification crates:
//! the Sigstore bundle format, the byte newtypes used by its JSON mapping,
//! signed-note checkpoints, DSSE envelopes and in-toto statements.

pub mod bundle;
pub mod checkpoint;
pub mod dsse;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod intoto;

pub use bundle::{
    Bundle, BundleContent, CheckpointEnvelope, HashOutput, InclusionPromise, InclusionProof,
    KindVersion, LogId, MediaType, MessageSignature, PublicKeyIdentifier, Rfc3161SignedTimestamp,
    TimestampVerificationData, TransparencyLogEntry, VerificationMaterial,
    VerificationMaterialContent, X509Certificate, X509CertificateChain,
};
pub use checkpoint::{Checkpoint, CheckpointSignature};
pub use dsse::{pae, DsseEnvelope, DsseSignature, IN_TOTO_PAYLOAD_TYPE};
pub use encoding::{
    base64_bytes, decode_base64, encode_base64, string_i64, CanonicalizedBody, DerCertificate,
    DerPublicKey, DigestBytes, LogKeyId, PayloadBytes, Sha256Hash, SignatureBytes,
    SignedTimestamp,
};
pub use error::{Error, Result};
pub use hash::HashAlgorithm;
pub use intoto::{Digest, Statement, Subject};
