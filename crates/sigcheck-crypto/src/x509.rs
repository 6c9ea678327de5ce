//! X.509 certificate helpers

use crate::error::{Error, Result};
use crate::verification::{PublicKey, SigningScheme};
use der::{Decode, Encode, Reader, SliceReader};
use x509_cert::time::Time;
use x509_cert::Certificate;

/// Fields of a certificate that verification needs repeatedly
#[derive(Debug, Clone)]
pub struct CertificateInfo {
    /// notBefore as Unix seconds
    pub not_before: i64,
    /// notAfter as Unix seconds
    pub not_after: i64,
    /// Subject public key
    pub public_key: PublicKey,
    /// Subject public key as SPKI DER
    pub spki_der: Vec<u8>,
    /// Default scheme of the subject key
    pub signing_scheme: SigningScheme,
}

impl CertificateInfo {
    /// Whether `time` (Unix seconds) lies inside the validity window, inclusive
    pub fn is_valid_at(&self, time: i64) -> bool {
        self.not_before <= time && time <= self.not_after
    }
}

/// Parse a DER certificate
pub fn parse_certificate(der: &[u8]) -> Result<Certificate> {
    Certificate::from_der(der).map_err(|e| Error::Certificate(format!("invalid X.509: {e}")))
}

/// Extract the commonly needed fields from a certificate
pub fn certificate_info(cert: &Certificate) -> Result<CertificateInfo> {
    let spki_der = cert.tbs_certificate.subject_public_key_info.to_der()?;
    let public_key = PublicKey::from_spki_der(&spki_der)?;
    Ok(CertificateInfo {
        not_before: unix_time(&cert.tbs_certificate.validity.not_before),
        not_after: unix_time(&cert.tbs_certificate.validity.not_after),
        signing_scheme: public_key.default_scheme(),
        public_key,
        spki_der,
    })
}

/// Parse a DER certificate and extract its info
pub fn parse_certificate_info(der: &[u8]) -> Result<CertificateInfo> {
    certificate_info(&parse_certificate(der)?)
}

/// Convert an X.509 time to Unix seconds
pub fn unix_time(time: &Time) -> i64 {
    time.to_unix_duration().as_secs() as i64
}

/// Decode the first PEM block of `pem` to DER
pub fn der_from_pem(pem: &[u8]) -> Result<Vec<u8>> {
    let (_label, der) = der::pem::decode_vec(pem).map_err(|e| Error::Pem(e.to_string()))?;
    Ok(der)
}

/// The original TBSCertificate bytes of a DER certificate.
///
/// Signatures cover these exact bytes, so they are sliced out of the
/// encoding rather than re-serialized from the parsed structure.
pub fn extract_tbs_der(cert_der: &[u8]) -> Result<Vec<u8>> {
    let mut reader = SliceReader::new(cert_der)?;
    let outer = der::Header::decode(&mut reader)?;
    let contents = reader.read_slice(outer.length)?;

    let mut tbs_reader = SliceReader::new(contents)?;
    let tbs_header = der::Header::decode(&mut tbs_reader)?;
    let header_len = usize::try_from(tbs_header.encoded_len()?)?;
    let body_len = usize::try_from(tbs_header.length)?;
    let total = header_len
        .checked_add(body_len)
        .ok_or_else(|| Error::Certificate("TBS length overflow".to_string()))?;

    contents
        .get(..total)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| Error::Certificate("TBS length exceeds certificate".to_string()))
}

/// Whether subject and issuer names are equal
pub fn is_self_issued(cert: &Certificate) -> bool {
    cert.tbs_certificate.subject == cert.tbs_certificate.issuer
}

/// Verify that `child` (with encoding `child_der`) is signed by the key of `issuer`
pub fn verify_issued_by(child_der: &[u8], child: &Certificate, issuer: &Certificate) -> Result<()> {
    if child.tbs_certificate.issuer != issuer.tbs_certificate.subject {
        return Err(Error::Certificate(
            "issuer name does not match issuer subject".to_string(),
        ));
    }

    let issuer_key = PublicKey::from_spki(&issuer.tbs_certificate.subject_public_key_info)?;
    let scheme = issuer_key.scheme_for_signature_algorithm(child.signature_algorithm.oid)?;
    let signature = child
        .signature
        .as_bytes()
        .ok_or_else(|| Error::InvalidSignature("signature has unused bits".to_string()))?;
    let tbs = extract_tbs_der(child_der)?;

    issuer_key.verify(&tbs, signature, scheme)
}
