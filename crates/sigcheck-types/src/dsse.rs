//! Dead Simple Signing Envelope (DSSE)
//!
//! Attestation bundles carry a DSSE envelope instead of a bare message
//! signature. The signature covers the pre-authentication encoding of the
//! payload type and payload, never the payload alone.

use crate::encoding::{PayloadBytes, SignatureBytes};
use serde::{Deserialize, Serialize};

/// Payload type of in-toto statements
pub const IN_TOTO_PAYLOAD_TYPE: &str = "application/vnd.in-toto+json";

/// A DSSE envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseEnvelope {
    /// Payload bytes
    pub payload: PayloadBytes,
    /// Media type of the payload
    pub payload_type: String,
    /// Signatures over the PAE
    pub signatures: Vec<DsseSignature>,
}

/// A signature inside a DSSE envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsseSignature {
    pub sig: SignatureBytes,
    #[serde(default)]
    pub keyid: String,
}

impl DsseEnvelope {
    /// The bytes the envelope signatures cover
    pub fn pae(&self) -> Vec<u8> {
        pae(&self.payload_type, self.payload.as_bytes())
    }
}

/// Pre-Authentication Encoding
///
/// `DSSEv1 <len(type)> <type> <len(body)> <body>`
pub fn pae(payload_type: &str, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload_type.len() + payload.len() + 32);
    out.extend_from_slice(b"DSSEv1 ");
    out.extend_from_slice(payload_type.len().to_string().as_bytes());
    out.push(b' ');
    out.extend_from_slice(payload_type.as_bytes());
    out.push(b' ');
    out.extend_from_slice(payload.len().to_string().as_bytes());
    out.push(b' ');
    out.extend_from_slice(payload);
    out
}
