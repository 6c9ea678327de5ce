//! Signing certificate chain validation
//!
//! The leaf is chained against the trusted CA chains only. Certificates that
//! came with the bundle are never used as anchors.

use crate::error::{Error, Result};
use const_oid::db::rfc5280::{ID_CE_BASIC_CONSTRAINTS, ID_CE_EXT_KEY_USAGE, ID_CE_KEY_USAGE};
use const_oid::db::rfc5912::ID_KP_CODE_SIGNING;
use der::Decode;
use sigcheck_bundle::LeafCertificate;
use sigcheck_crypto::CertificateInfo;
use sigcheck_trust_root::{CertificateAuthorityMaterial, TrustedCertificate, TrustedRootMaterial};
use x509_cert::ext::pkix::{BasicConstraints, ExtendedKeyUsage, KeyUsage, KeyUsages};
use x509_cert::Certificate;

/// A leaf whose signature chains to a trusted authority
#[derive(Debug)]
pub struct VerifiedChain<'a> {
    authority: &'a CertificateAuthorityMaterial,
    issuer_index: usize,
    pub leaf: CertificateInfo,
}

impl<'a> VerifiedChain<'a> {
    /// The certificate that signed the leaf
    pub fn issuer(&self) -> &'a TrustedCertificate {
        &self.authority.chain()[self.issuer_index]
    }

    /// Check every validity window on the path at `time`
    pub fn check_validity(&self, time: i64) -> Result<()> {
        validate_certificate_time(time, &self.leaf, "signing certificate")?;
        for cert in &self.authority.chain()[self.issuer_index..] {
            validate_certificate_time(time, cert.info(), "CA certificate")?;
        }
        if !self.authority.valid_for().contains_unix(time) {
            return Err(Error::CertificateChainInvalid(format!(
                "time {time} is outside the validity window of {}",
                self.authority.uri()
            )));
        }
        Ok(())
    }
}

/// Find a trusted authority that issued `leaf` and check the leaf profile
pub fn verify_certificate_chain<'a>(
    leaf: &LeafCertificate,
    material: &'a TrustedRootMaterial,
) -> Result<VerifiedChain<'a>> {
    let cert = leaf.certificate();
    let info = sigcheck_crypto::certificate_info(cert)
        .map_err(|e| Error::CertificateChainInvalid(format!("signing certificate: {e}")))?;

    let issuer_name = &cert.tbs_certificate.issuer;
    let mut last_error = None;
    let mut found = None;
    for authority in material.certificate_authorities() {
        let Some(index) = authority.position_of(issuer_name) else {
            continue;
        };
        let issuer = &authority.chain()[index];
        match sigcheck_crypto::verify_issued_by(leaf.der(), cert, issuer.certificate()) {
            Ok(()) => {
                found = Some((authority, index));
                break;
            }
            Err(e) => last_error = Some(e),
        }
    }

    let Some((authority, issuer_index)) = found else {
        return Err(Error::CertificateChainInvalid(match last_error {
            Some(e) => format!("signature by trusted issuer does not verify: {e}"),
            None => format!("no trusted CA has subject {issuer_name}"),
        }));
    };

    verify_x509_profile(cert)?;

    Ok(VerifiedChain {
        authority,
        issuer_index,
        leaf: info,
    })
}

/// Validate that a certificate is within its validity period
pub fn validate_certificate_time(time: i64, info: &CertificateInfo, what: &str) -> Result<()> {
    if time < info.not_before {
        return Err(Error::CertificateChainInvalid(format!(
            "{what} not yet valid: time {time} is before not_before {}",
            info.not_before
        )));
    }
    if time > info.not_after {
        return Err(Error::CertificateChainInvalid(format!(
            "{what} has expired: time {time} is after not_after {}",
            info.not_after
        )));
    }
    Ok(())
}

/// Check the code-signing profile: digitalSignature, codeSigning, not a CA
fn verify_x509_profile(cert: &Certificate) -> Result<()> {
    let extensions = cert
        .tbs_certificate
        .extensions
        .as_deref()
        .ok_or_else(|| Error::CertificateChainInvalid("certificate has no extensions".into()))?;

    let key_usage_ext = extensions
        .iter()
        .find(|ext| ext.extn_id == ID_CE_KEY_USAGE)
        .ok_or_else(|| {
            Error::CertificateChainInvalid("certificate is missing KeyUsage extension".into())
        })?;
    let key_usage = KeyUsage::from_der(key_usage_ext.extn_value.as_bytes()).map_err(|e| {
        Error::CertificateChainInvalid(format!("failed to parse KeyUsage extension: {e}"))
    })?;
    if !key_usage.0.contains(KeyUsages::DigitalSignature) {
        return Err(Error::CertificateChainInvalid(
            "KeyUsage extension does not contain digitalSignature".into(),
        ));
    }

    let eku_ext = extensions
        .iter()
        .find(|ext| ext.extn_id == ID_CE_EXT_KEY_USAGE)
        .ok_or_else(|| {
            Error::CertificateChainInvalid(
                "certificate is missing ExtendedKeyUsage extension".into(),
            )
        })?;
    let eku = ExtendedKeyUsage::from_der(eku_ext.extn_value.as_bytes()).map_err(|e| {
        Error::CertificateChainInvalid(format!("failed to parse ExtendedKeyUsage extension: {e}"))
    })?;
    if !eku.0.contains(&ID_KP_CODE_SIGNING) {
        return Err(Error::CertificateChainInvalid(
            "ExtendedKeyUsage extension does not contain codeSigning".into(),
        ));
    }

    if let Some(ext) = extensions
        .iter()
        .find(|ext| ext.extn_id == ID_CE_BASIC_CONSTRAINTS)
    {
        let constraints = BasicConstraints::from_der(ext.extn_value.as_bytes()).map_err(|e| {
            Error::CertificateChainInvalid(format!("failed to parse BasicConstraints: {e}"))
        })?;
        if constraints.ca {
            return Err(Error::CertificateChainInvalid(
                "signing certificate is a CA".into(),
            ));
        }
    }

    Ok(())
}
