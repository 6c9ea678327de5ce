//! Embedded SCT verification (RFC 6962)
//!
//! A CT log signs the precertificate: the leaf TBS without the SCT list
//! extension, bound to the issuer by the SHA-256 of the issuer's
//! SubjectPublicKeyInfo.

use super::chain::VerifiedChain;
use crate::error::{Error, Result};
use const_oid::db::rfc6962::CT_PRECERT_SCTS;
use der::Encode;
use sigcheck_bundle::{EmbeddedSct, LeafCertificate};
use sigcheck_crypto::{PublicKey, SigningScheme};
use sigcheck_trust_root::TrustedRootMaterial;
use tls_codec::{SerializeBytes, TlsByteVecU16, TlsByteVecU24, TlsSerializeBytes, TlsSize};
use x509_cert::ext::pkix::sct::Version;

// TLS SignatureAndHashAlgorithm values (RFC 5246)
const ECDSA_SHA256: u16 = 0x0403;
const ECDSA_SHA384: u16 = 0x0503;

#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
#[repr(u8)]
enum SignatureType {
    CertificateTimestamp = 0,
}

#[derive(PartialEq, Debug)]
#[repr(u16)]
enum LogEntryType {
    PrecertEntry = 1,
}

#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
struct PreCert {
    issuer_key_hash: [u8; 32],
    tbs_certificate: TlsByteVecU24,
}

#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
#[repr(u16)]
enum SignedEntry {
    #[tls_codec(discriminant = "LogEntryType::PrecertEntry")]
    PrecertEntry(PreCert),
}

/// The structure a CT log signs for an embedded SCT
#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
struct DigitallySigned {
    version: Version,
    signature_type: SignatureType,
    timestamp: u64,
    signed_entry: SignedEntry,
    extensions: TlsByteVecU16,
}

impl DigitallySigned {
    fn for_embedded_sct(
        leaf: &LeafCertificate,
        sct: &EmbeddedSct,
        issuer_key_hash: [u8; 32],
    ) -> Result<Self> {
        let mut tbs_precert = leaf.certificate().tbs_certificate.clone();
        tbs_precert.extensions = tbs_precert.extensions.map(|exts| {
            exts.into_iter()
                .filter(|ext| ext.extn_id != CT_PRECERT_SCTS)
                .collect()
        });
        let tbs_precert_der = tbs_precert.to_der().map_err(|e| {
            Error::InsufficientValidScts(format!("failed to encode precertificate TBS: {e}"))
        })?;

        Ok(DigitallySigned {
            version: Version::V1,
            signature_type: SignatureType::CertificateTimestamp,
            timestamp: sct.timestamp,
            signed_entry: SignedEntry::PrecertEntry(PreCert {
                issuer_key_hash,
                tbs_certificate: tbs_precert_der.as_slice().into(),
            }),
            extensions: sct.extensions.as_slice().into(),
        })
    }
}

fn sct_scheme(key: &PublicKey, algorithm: u16) -> Result<SigningScheme> {
    match (key, algorithm) {
        (PublicKey::P256(_), ECDSA_SHA256) => Ok(SigningScheme::EcdsaP256Sha256),
        (PublicKey::P256(_), ECDSA_SHA384) => Ok(SigningScheme::EcdsaP256Sha384),
        (PublicKey::P384(_), ECDSA_SHA256) => Ok(SigningScheme::EcdsaP384Sha256),
        (PublicKey::P384(_), ECDSA_SHA384) => Ok(SigningScheme::EcdsaP384Sha384),
        _ => Err(Error::InsufficientValidScts(format!(
            "unsupported SCT signature algorithm 0x{algorithm:04x} for {} key",
            key.default_scheme().name()
        ))),
    }
}

/// Verify one SCT, returning its timestamp in Unix seconds
fn verify_sct(
    leaf: &LeafCertificate,
    chain: &VerifiedChain<'_>,
    sct: &EmbeddedSct,
    material: &TrustedRootMaterial,
) -> Result<i64> {
    let log = material.ctlog(&sct.log_id).ok_or_else(|| {
        Error::InsufficientValidScts(format!(
            "SCT log ID {} not found in trusted CT logs",
            hex::encode(sct.log_id)
        ))
    })?;

    let issuer_key_hash = *sigcheck_crypto::sha256(&chain.issuer().info().spki_der).as_bytes();
    let signed_data = DigitallySigned::for_embedded_sct(leaf, sct, issuer_key_hash)?
        .tls_serialize()
        .map_err(|e| Error::InsufficientValidScts(format!("failed to serialize SCT data: {e:?}")))?;

    let scheme = sct_scheme(log.key(), sct.signature_algorithm)?;
    log.key()
        .verify(&signed_data, &sct.signature, scheme)
        .map_err(|e| Error::InsufficientValidScts(format!("SCT signature does not verify: {e}")))?;

    let time = sct.timestamp_secs();
    if !chain.leaf.is_valid_at(time) {
        return Err(Error::InsufficientValidScts(format!(
            "SCT timestamp {time} is outside the certificate validity"
        )));
    }
    if !log.valid_for().contains_unix(time) {
        return Err(Error::InsufficientValidScts(format!(
            "SCT timestamp {time} is outside the validity of CT log {}",
            log.base_url()
        )));
    }
    Ok(time)
}

/// Verify the embedded SCTs, requiring at least `threshold` to be valid
///
/// Returns the timestamps of the verified SCTs.
pub fn verify_scts(
    leaf: &LeafCertificate,
    scts: &[EmbeddedSct],
    chain: &VerifiedChain<'_>,
    material: &TrustedRootMaterial,
    threshold: usize,
) -> Result<Vec<i64>> {
    if threshold == 0 {
        return Ok(Vec::new());
    }

    let mut verified = Vec::new();
    let mut last_error = None;
    for sct in scts {
        match verify_sct(leaf, chain, sct, material) {
            Ok(time) => verified.push(time),
            Err(e) => last_error = Some(e),
        }
    }

    if verified.len() < threshold {
        let mut message = format!(
            "{} of {} SCTs verified, {threshold} required",
            verified.len(),
            scts.len()
        );
        if let Some(e) = last_error {
            message.push_str(&format!(" ({e})"));
        }
        return Err(Error::InsufficientValidScts(message));
    }
    Ok(verified)
}
