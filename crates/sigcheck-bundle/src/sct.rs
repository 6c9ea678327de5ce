//! Embedded SCT extraction
//!
//! Signed certificate timestamps live in the leaf certificate's
//! 1.3.6.1.4.1.11129.2.4.2 extension as a TLS-encoded list (RFC 6962 3.3).

use crate::error::{Error, Result};
use tls_codec::SerializeBytes;
use x509_cert::ext::pkix::SignedCertificateTimestampList;
use x509_cert::Certificate;

/// One SCT as found in the certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedSct {
    /// SHA-256 of the CT log's public key
    pub log_id: [u8; 32],
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Opaque CT extensions, signed as-is
    pub extensions: Vec<u8>,
    /// TLS SignatureAndHashAlgorithm, e.g. 0x0403 for ECDSA with SHA-256
    pub signature_algorithm: u16,
    pub signature: Vec<u8>,
}

impl EmbeddedSct {
    /// Timestamp in Unix seconds
    pub fn timestamp_secs(&self) -> i64 {
        (self.timestamp / 1000) as i64
    }
}

/// Every SCT embedded in `cert`; an absent extension yields an empty list
pub fn embedded_scts(cert: &Certificate) -> Result<Vec<EmbeddedSct>> {
    let list: SignedCertificateTimestampList = match cert.tbs_certificate.get() {
        Ok(Some((_critical, list))) => list,
        Ok(None) => return Ok(Vec::new()),
        Err(e) => return Err(Error::parse(format!("malformed SCT list extension: {e}"))),
    };

    let serialized = list
        .parse_timestamps()
        .map_err(|e| Error::parse(format!("malformed SCT list: {e:?}")))?;

    let mut scts = Vec::with_capacity(serialized.len());
    for item in &serialized {
        let sct = item
            .parse_timestamp()
            .map_err(|e| Error::parse(format!("malformed SCT: {e:?}")))?;

        let algorithm = sct
            .signature
            .algorithm
            .tls_serialize()
            .map_err(|e| Error::parse(format!("malformed SCT signature algorithm: {e:?}")))?;
        let &[hash, signature] = algorithm.as_slice() else {
            return Err(Error::parse("malformed SCT signature algorithm"));
        };

        scts.push(EmbeddedSct {
            log_id: sct.log_id.key_id,
            timestamp: sct.timestamp,
            extensions: sct.extensions.as_slice().to_vec(),
            signature_algorithm: u16::from_be_bytes([hash, signature]),
            signature: sct.signature.signature.as_slice().to_vec(),
        });
    }
    Ok(scts)
}
