//! Validated trust material
//!
//! [`TrustedRootMaterial`] is built once from a [`TrustedRoot`] document. All
//! keys are decoded and every certificate chain is checked when it is built,
//! so verification only performs lookups against it.

use crate::trusted_root::{CertificateAuthority, TransparencyLogInstance, TrustedRoot, ValidityPeriod};
use crate::{Error, Result};
use rustls_pki_types::CertificateDer;
use sigcheck_crypto::{
    certificate_info, is_self_issued, parse_certificate, sha256, verify_issued_by,
    CertificateInfo, PublicKey, SigningScheme,
};
use std::path::Path;
use x509_cert::name::Name;
use x509_cert::Certificate;

/// A certificate from a trusted chain
#[derive(Debug, Clone)]
pub struct TrustedCertificate {
    der: CertificateDer<'static>,
    certificate: Certificate,
    info: CertificateInfo,
}

impl TrustedCertificate {
    fn from_der(der: &[u8]) -> Result<Self> {
        let certificate = parse_certificate(der).map_err(|e| Error::InvalidKey(e.to_string()))?;
        let info = certificate_info(&certificate).map_err(|e| Error::InvalidKey(e.to_string()))?;
        Ok(Self {
            der: CertificateDer::from(der.to_vec()),
            certificate,
            info,
        })
    }

    /// DER encoding
    pub fn der(&self) -> &[u8] {
        self.der.as_ref()
    }

    /// Parsed certificate
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Validity window and key
    pub fn info(&self) -> &CertificateInfo {
        &self.info
    }

    /// Subject name
    pub fn subject(&self) -> &Name {
        &self.certificate.tbs_certificate.subject
    }
}

/// A certificate authority (or timestamp authority) and its verified chain
#[derive(Debug, Clone)]
pub struct CertificateAuthorityMaterial {
    uri: String,
    chain: Vec<TrustedCertificate>,
    valid_for: ValidityPeriod,
}

impl CertificateAuthorityMaterial {
    /// Authority URI from the trusted root
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Chain ordered from the certificate nearest the leaf to the root
    pub fn chain(&self) -> &[TrustedCertificate] {
        &self.chain
    }

    /// The self-signed root
    pub fn root(&self) -> &TrustedCertificate {
        // Chains are never empty after construction.
        &self.chain[self.chain.len() - 1]
    }

    /// Position in the chain of the certificate with subject `name`
    pub fn position_of(&self, name: &Name) -> Option<usize> {
        self.chain.iter().position(|c| c.subject() == name)
    }

    /// Window during which this authority may issue
    pub fn valid_for(&self) -> &ValidityPeriod {
        &self.valid_for
    }
}

/// A transparency log or CT log key
#[derive(Debug, Clone)]
pub struct LogMaterial {
    base_url: String,
    log_id: Vec<u8>,
    key: PublicKey,
    scheme: SigningScheme,
    valid_for: ValidityPeriod,
}

impl LogMaterial {
    /// Log URL from the trusted root
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Log ID bytes (SHA-256 of the key unless the root says otherwise)
    pub fn log_id(&self) -> &[u8] {
        &self.log_id
    }

    /// First four bytes of the log ID, used as the signed-note key hint
    pub fn key_hint(&self) -> Option<[u8; 4]> {
        self.log_id.get(..4).and_then(|s| s.try_into().ok())
    }

    /// Decoded public key
    pub fn key(&self) -> &PublicKey {
        &self.key
    }

    /// Scheme declared for the key
    pub fn scheme(&self) -> SigningScheme {
        self.scheme
    }

    /// Window during which the key is trusted
    pub fn valid_for(&self) -> &ValidityPeriod {
        &self.valid_for
    }
}

/// An immutable snapshot of everything the verifier trusts
#[derive(Debug, Clone, Default)]
pub struct TrustedRootMaterial {
    certificate_authorities: Vec<CertificateAuthorityMaterial>,
    tlogs: Vec<LogMaterial>,
    ctlogs: Vec<LogMaterial>,
    timestamp_authorities: Vec<CertificateAuthorityMaterial>,
}

impl TrustedRootMaterial {
    /// Decode keys and validate chains of a trusted root document
    pub fn from_trusted_root(root: &TrustedRoot) -> Result<Self> {
        let material = Self {
            certificate_authorities: authorities(&root.certificate_authorities, "CA")?,
            tlogs: logs(&root.tlogs, "transparency log")?,
            ctlogs: logs(&root.ctlogs, "CT log")?,
            timestamp_authorities: authorities(&root.timestamp_authorities, "TSA")?,
        };
        tracing::debug!(
            "trust material: {} CAs, {} tlogs, {} CT logs, {} TSAs",
            material.certificate_authorities.len(),
            material.tlogs.len(),
            material.ctlogs.len(),
            material.timestamp_authorities.len()
        );
        Ok(material)
    }

    /// Parse and validate a trusted root JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_trusted_root(&TrustedRoot::from_json(json)?)
    }

    /// Load and validate a trusted root file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_trusted_root(&TrustedRoot::from_file(path)?)
    }

    /// Certificate authorities that issue signing certificates
    pub fn certificate_authorities(&self) -> &[CertificateAuthorityMaterial] {
        &self.certificate_authorities
    }

    /// Timestamp authorities
    pub fn timestamp_authorities(&self) -> &[CertificateAuthorityMaterial] {
        &self.timestamp_authorities
    }

    /// All transparency logs
    pub fn tlogs(&self) -> &[LogMaterial] {
        &self.tlogs
    }

    /// All CT logs
    pub fn ctlogs(&self) -> &[LogMaterial] {
        &self.ctlogs
    }

    /// Transparency log with the given log ID
    pub fn tlog(&self, log_id: &[u8]) -> Option<&LogMaterial> {
        self.tlogs.iter().find(|l| l.log_id == log_id)
    }

    /// CT log with the given log ID
    pub fn ctlog(&self, log_id: &[u8]) -> Option<&LogMaterial> {
        self.ctlogs.iter().find(|l| l.log_id == log_id)
    }

    /// Whether the snapshot has no CA or no transparency log
    pub fn is_empty(&self) -> bool {
        self.certificate_authorities.is_empty() || self.tlogs.is_empty()
    }

    /// Whether at least one CA root certificate is unexpired at `time` (Unix seconds)
    pub fn has_unexpired_root(&self, time: i64) -> bool {
        self.certificate_authorities
            .iter()
            .any(|ca| ca.root().info().not_after >= time)
    }
}

fn authorities(
    entries: &[CertificateAuthority],
    what: &str,
) -> Result<Vec<CertificateAuthorityMaterial>> {
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = if entry.uri.is_empty() {
            what.to_string()
        } else {
            entry.uri.clone()
        };

        let mut chain = Vec::with_capacity(entry.cert_chain.certificates.len());
        let mut supported = true;
        for cert in &entry.cert_chain.certificates {
            match TrustedCertificate::from_der(cert.raw_bytes.as_bytes()) {
                Ok(c) => chain.push(c),
                Err(e) => {
                    tracing::warn!("skipping {what} {name}: {e}");
                    supported = false;
                    break;
                }
            }
        }
        if !supported {
            continue;
        }

        validate_chain(&chain).map_err(|reason| Error::InvalidChain {
            authority: name.clone(),
            reason,
        })?;

        out.push(CertificateAuthorityMaterial {
            uri: entry.uri.clone(),
            chain,
            valid_for: entry.valid_for.unwrap_or_default(),
        });
    }
    Ok(out)
}

/// Each certificate must be issued by the next one, and the last must be
/// self-signed.
fn validate_chain(chain: &[TrustedCertificate]) -> std::result::Result<(), String> {
    let Some(root) = chain.last() else {
        return Err("empty certificate chain".to_string());
    };

    for pair in chain.windows(2) {
        verify_issued_by(pair[0].der(), &pair[0].certificate, &pair[1].certificate)
            .map_err(|e| format!("certificate is not issued by its successor: {e}"))?;
    }

    if !is_self_issued(&root.certificate) {
        return Err("last certificate is not self-issued".to_string());
    }
    verify_issued_by(root.der(), &root.certificate, &root.certificate)
        .map_err(|e| format!("root is not self-signed: {e}"))
}

fn logs(entries: &[TransparencyLogInstance], what: &str) -> Result<Vec<LogMaterial>> {
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(raw) = entry.public_key.raw_bytes.as_ref() else {
            tracing::warn!("skipping {what} {}: no key bytes", entry.base_url);
            continue;
        };
        let Some(scheme) = SigningScheme::from_key_details(&entry.public_key.key_details) else {
            tracing::warn!(
                "skipping {what} {}: unsupported key type {}",
                entry.base_url,
                entry.public_key.key_details
            );
            continue;
        };

        let key = PublicKey::from_spki_der(raw.as_bytes())
            .map_err(|e| Error::InvalidKey(format!("{what} {}: {e}", entry.base_url)))?;
        if key.default_scheme() != scheme {
            return Err(Error::InvalidKey(format!(
                "{what} {}: key does not match {}",
                entry.base_url, entry.public_key.key_details
            )));
        }

        let log_id = match &entry.log_id {
            Some(id) if !id.key_id.is_empty() => id.key_id.as_bytes().to_vec(),
            _ => sha256(raw.as_bytes()).as_bytes().to_vec(),
        };

        out.push(LogMaterial {
            base_url: entry.base_url.clone(),
            log_id,
            key,
            scheme,
            valid_for: entry.public_key.valid_for.unwrap_or_default(),
        });
    }
    Ok(out)
}
