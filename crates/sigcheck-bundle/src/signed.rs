//! The parsed bundle handed to the verifier

use crate::sct::EmbeddedSct;
use sigcheck_types::{
    DerCertificate, DsseEnvelope, MediaType, MessageSignature, SignedTimestamp,
    TransparencyLogEntry,
};
use x509_cert::Certificate;

/// The signing certificate, as bytes and parsed
#[derive(Debug, Clone)]
pub struct LeafCertificate {
    pub(crate) der: DerCertificate,
    pub(crate) certificate: Certificate,
}

impl LeafCertificate {
    pub fn der(&self) -> &[u8] {
        self.der.as_bytes()
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }
}

/// What was signed
#[derive(Debug, Clone)]
pub enum SignedContent {
    /// A signature over an artifact, with the optional digest the signer saw
    MessageSignature(MessageSignature),
    /// A DSSE envelope, usually an in-toto statement
    DsseEnvelope(DsseEnvelope),
}

impl SignedContent {
    /// The signature bytes; for envelopes, the first signature
    pub fn signature(&self) -> &[u8] {
        match self {
            SignedContent::MessageSignature(sig) => sig.signature.as_bytes(),
            SignedContent::DsseEnvelope(env) => env
                .signatures
                .first()
                .map(|s| s.sig.as_bytes())
                .unwrap_or_default(),
        }
    }
}

/// A structurally valid bundle, ready for verification
///
/// Nothing in it has been checked cryptographically.
#[derive(Debug, Clone)]
pub struct SignedBundle {
    pub(crate) media_type: MediaType,
    pub(crate) leaf: LeafCertificate,
    pub(crate) chain: Vec<DerCertificate>,
    pub(crate) content: SignedContent,
    pub(crate) scts: Vec<EmbeddedSct>,
    pub(crate) tlog_entries: Vec<TransparencyLogEntry>,
    pub(crate) rfc3161_timestamps: Vec<SignedTimestamp>,
}

impl SignedBundle {
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// The signing certificate
    pub fn leaf(&self) -> &LeafCertificate {
        &self.leaf
    }

    /// Certificates after the leaf in a bundle-supplied chain
    ///
    /// These are informational; they are never used as trust anchors.
    pub fn chain(&self) -> &[DerCertificate] {
        &self.chain
    }

    pub fn content(&self) -> &SignedContent {
        &self.content
    }

    /// SCTs embedded in the leaf certificate
    pub fn scts(&self) -> &[EmbeddedSct] {
        &self.scts
    }

    pub fn tlog_entries(&self) -> &[TransparencyLogEntry] {
        &self.tlog_entries
    }

    /// DER-encoded RFC 3161 timestamp responses
    pub fn rfc3161_timestamps(&self) -> &[SignedTimestamp] {
        &self.rfc3161_timestamps
    }
}
