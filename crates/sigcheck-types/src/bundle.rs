//! Sigstore bundle format types
//!
//! The bundle is the artifact produced at signing time and consumed by
//! verification. It carries the signature (a message signature or a DSSE
//! envelope), the verification material (certificate or chain), the
//! transparency log entries and optional RFC 3161 timestamps.
//!
//! The structs mirror the protobuf JSON mapping of `dev.sigstore.bundle.v1`.
//! Oneof fields are modelled as sibling `Option`s and resolved through
//! accessor methods so that a bundle with neither or both alternatives is
//! reported instead of silently picking one.

use crate::checkpoint::Checkpoint;
use crate::dsse::DsseEnvelope;
use crate::encoding::{
    string_i64, CanonicalizedBody, DerCertificate, DigestBytes, LogKeyId, SignatureBytes,
    SignedTimestamp,
};
use crate::error::{Error, Result};
use crate::hash::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sigstore bundle media types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// Bundle format version 0.1
    Bundle0_1,
    /// Bundle format version 0.2
    Bundle0_2,
    /// Bundle format version 0.3
    Bundle0_3,
}

impl MediaType {
    /// The canonical media type string
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Bundle0_1 => "application/vnd.dev.sigstore.bundle+json;version=0.1",
            MediaType::Bundle0_2 => "application/vnd.dev.sigstore.bundle+json;version=0.2",
            MediaType::Bundle0_3 => "application/vnd.dev.sigstore.bundle.v0.3+json",
        }
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "application/vnd.dev.sigstore.bundle+json;version=0.1" => Ok(MediaType::Bundle0_1),
            "application/vnd.dev.sigstore.bundle+json;version=0.2" => Ok(MediaType::Bundle0_2),
            "application/vnd.dev.sigstore.bundle.v0.3+json"
            | "application/vnd.dev.sigstore.bundle+json;version=0.3" => Ok(MediaType::Bundle0_3),
            _ => Err(Error::InvalidMediaType(s.to_string())),
        }
    }
}

/// A Sigstore bundle as it appears on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub media_type: String,
    pub verification_material: VerificationMaterial,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_signature: Option<MessageSignature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dsse_envelope: Option<DsseEnvelope>,
}

/// The signed content of a bundle
#[derive(Debug, Clone, Copy)]
pub enum BundleContent<'a> {
    MessageSignature(&'a MessageSignature),
    DsseEnvelope(&'a DsseEnvelope),
}

/// Material needed to verify the bundle signature
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMaterial {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<X509Certificate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x509_certificate_chain: Option<X509CertificateChain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<PublicKeyIdentifier>,
    #[serde(default)]
    pub tlog_entries: Vec<TransparencyLogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_verification_data: Option<TimestampVerificationData>,
}

/// The verification material variants
#[derive(Debug, Clone, Copy)]
pub enum VerificationMaterialContent<'a> {
    Certificate(&'a X509Certificate),
    X509CertificateChain(&'a X509CertificateChain),
    PublicKey(&'a PublicKeyIdentifier),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X509Certificate {
    pub raw_bytes: DerCertificate,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X509CertificateChain {
    #[serde(default)]
    pub certificates: Vec<X509Certificate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyIdentifier {
    #[serde(default)]
    pub hint: String,
}

/// A detached signature over an artifact digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSignature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_digest: Option<HashOutput>,
    pub signature: SignatureBytes,
}

/// A digest with its algorithm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashOutput {
    pub algorithm: HashAlgorithm,
    pub digest: DigestBytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogId {
    pub key_id: LogKeyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindVersion {
    pub kind: String,
    pub version: String,
}

/// A transparency log entry with its inclusion evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransparencyLogEntry {
    #[serde(with = "string_i64")]
    pub log_index: i64,
    pub log_id: LogId,
    pub kind_version: KindVersion,
    /// Unix seconds; zero for logs that do not assign an integrated time
    #[serde(default, with = "string_i64")]
    pub integrated_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusion_promise: Option<InclusionPromise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusion_proof: Option<InclusionProof>,
    pub canonicalized_body: CanonicalizedBody,
}

/// Signed entry timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionPromise {
    pub signed_entry_timestamp: SignatureBytes,
}

/// Merkle inclusion proof with its signed checkpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionProof {
    #[serde(with = "string_i64")]
    pub log_index: i64,
    pub root_hash: DigestBytes,
    #[serde(with = "string_i64")]
    pub tree_size: i64,
    #[serde(default)]
    pub hashes: Vec<DigestBytes>,
    pub checkpoint: CheckpointEnvelope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointEnvelope {
    pub envelope: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampVerificationData {
    #[serde(default)]
    pub rfc3161_timestamps: Vec<Rfc3161SignedTimestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rfc3161SignedTimestamp {
    pub signed_timestamp: SignedTimestamp,
}

impl Bundle {
    /// Parse a bundle from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a bundle from JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serialize the bundle to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The bundle version from the media type
    pub fn version(&self) -> Result<MediaType> {
        MediaType::from_str(&self.media_type)
    }

    /// The signed content; exactly one alternative must be present
    pub fn content(&self) -> Result<BundleContent<'_>> {
        match (&self.message_signature, &self.dsse_envelope) {
            (Some(sig), None) => Ok(BundleContent::MessageSignature(sig)),
            (None, Some(env)) => Ok(BundleContent::DsseEnvelope(env)),
            (None, None) => Err(Error::MissingField(
                "messageSignature or dsseEnvelope".to_string(),
            )),
            (Some(_), Some(_)) => Err(Error::MissingField(
                "exactly one of messageSignature and dsseEnvelope".to_string(),
            )),
        }
    }

    /// Whether any entry has an inclusion proof
    pub fn has_inclusion_proof(&self) -> bool {
        self.verification_material
            .tlog_entries
            .iter()
            .any(|e| e.inclusion_proof.is_some())
    }

    /// Whether every entry has an inclusion promise
    pub fn has_inclusion_promise(&self) -> bool {
        let entries = &self.verification_material.tlog_entries;
        !entries.is_empty() && entries.iter().all(|e| e.inclusion_promise.is_some())
    }

    /// The RFC 3161 timestamps, if any
    pub fn rfc3161_timestamps(&self) -> &[Rfc3161SignedTimestamp] {
        self.verification_material
            .timestamp_verification_data
            .as_ref()
            .map(|d| d.rfc3161_timestamps.as_slice())
            .unwrap_or(&[])
    }
}

impl VerificationMaterial {
    /// The verification material variant; exactly one must be present
    pub fn content(&self) -> Result<VerificationMaterialContent<'_>> {
        match (
            &self.certificate,
            &self.x509_certificate_chain,
            &self.public_key,
        ) {
            (Some(cert), None, None) => Ok(VerificationMaterialContent::Certificate(cert)),
            (None, Some(chain), None) => Ok(VerificationMaterialContent::X509CertificateChain(chain)),
            (None, None, Some(key)) => Ok(VerificationMaterialContent::PublicKey(key)),
            _ => Err(Error::MissingField(
                "exactly one of certificate, x509CertificateChain and publicKey".to_string(),
            )),
        }
    }

    /// The signing certificate: the single certificate or the first of the chain
    pub fn signing_certificate(&self) -> Option<&DerCertificate> {
        match self.content().ok()? {
            VerificationMaterialContent::Certificate(cert) => Some(&cert.raw_bytes),
            VerificationMaterialContent::X509CertificateChain(chain) => {
                chain.certificates.first().map(|c| &c.raw_bytes)
            }
            VerificationMaterialContent::PublicKey(_) => None,
        }
    }
}

impl TransparencyLogEntry {
    /// Whether the log assigned an integrated time
    pub fn has_integrated_time(&self) -> bool {
        self.integrated_time > 0
    }
}

impl InclusionProof {
    /// Parse the checkpoint text
    pub fn parse_checkpoint(&self) -> Result<Checkpoint> {
        Checkpoint::from_text(&self.checkpoint.envelope)
    }
}
