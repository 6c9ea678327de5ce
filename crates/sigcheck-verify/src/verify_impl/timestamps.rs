//! RFC 3161 signed timestamp verification
//!
//! A timestamp is accepted when the response was granted, its message
//! imprint covers the bundle signature, the CMS signer attributes bind the
//! TSTInfo, and the signer chains to a trusted timestamp authority that was
//! valid at the generation time.

use super::signature::scheme_for_digest;
use crate::error::{Error, Result};
use cms::cert::CertificateChoices;
use cms::content_info::ContentInfo;
use cms::signed_data::{SignedData, SignerIdentifier, SignerInfo};
use const_oid::db::rfc5912::{
    ID_EC_PUBLIC_KEY, ID_KP_TIME_STAMPING, ID_SHA_256, ID_SHA_384, ID_SHA_512,
};
use const_oid::ObjectIdentifier;
use der::asn1::{BitString, OctetString, OctetStringRef};
use der::{Decode, Encode, Sequence};
use sigcheck_crypto::PublicKey;
use sigcheck_trust_root::TrustedRootMaterial;
use sigcheck_types::{HashAlgorithm, SignedTimestamp};
use x509_cert::ext::pkix::{ExtendedKeyUsage, SubjectKeyIdentifier};
use x509_cert::Certificate;
use x509_tsp::TstInfo;

const ID_SIGNED_DATA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");
const ID_MESSAGE_DIGEST: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.4");
const ID_CT_TST_INFO: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.16.1.4");

/// PKIStatus values that carry a token
const STATUS_GRANTED: u8 = 0;
const STATUS_GRANTED_WITH_MODS: u8 = 1;

#[derive(Clone, Debug, Sequence)]
struct PkiStatusInfo {
    status: u8,
    #[asn1(optional = "true")]
    status_string: Option<Vec<String>>,
    #[asn1(optional = "true")]
    fail_info: Option<BitString>,
}

#[derive(Clone, Debug, Sequence)]
struct TimeStampResp {
    status: PkiStatusInfo,
    #[asn1(optional = "true")]
    time_stamp_token: Option<ContentInfo>,
}

fn untrusted(message: impl Into<String>) -> Error {
    Error::NoTrustworthyTimestamp(message.into())
}

fn hash_algorithm(oid: ObjectIdentifier) -> Result<HashAlgorithm> {
    match oid {
        o if o == ID_SHA_256 => Ok(HashAlgorithm::Sha2_256),
        o if o == ID_SHA_384 => Ok(HashAlgorithm::Sha2_384),
        o if o == ID_SHA_512 => Ok(HashAlgorithm::Sha2_512),
        other => Err(untrusted(format!("unsupported digest algorithm {other}"))),
    }
}

/// Accept a full TimeStampResp or a bare TimeStampToken
fn time_stamp_token(bytes: &[u8]) -> Result<ContentInfo> {
    if let Ok(resp) = TimeStampResp::from_der(bytes) {
        let status = resp.status.status;
        if status != STATUS_GRANTED && status != STATUS_GRANTED_WITH_MODS {
            let text = resp.status.status_string.unwrap_or_default().join("; ");
            return Err(untrusted(format!(
                "timestamp request was not granted (status {status}: {text})"
            )));
        }
        return resp
            .time_stamp_token
            .ok_or_else(|| untrusted("granted response has no timestamp token"));
    }
    ContentInfo::from_der(bytes).map_err(|e| untrusted(format!("invalid timestamp response: {e}")))
}

fn matches_signer(cert: &Certificate, sid: &SignerIdentifier) -> bool {
    match sid {
        SignerIdentifier::IssuerAndSerialNumber(id) => {
            cert.tbs_certificate.issuer == id.issuer
                && cert.tbs_certificate.serial_number == id.serial_number
        }
        SignerIdentifier::SubjectKeyIdentifier(ski) => {
            matches!(
                cert.tbs_certificate.get::<SubjectKeyIdentifier>(),
                Ok(Some((_, own))) if &own == ski
            )
        }
    }
}

/// The value of the messageDigest signed attribute
fn signed_message_digest(signer: &SignerInfo) -> Result<Vec<u8>> {
    let attrs = signer
        .signed_attrs
        .as_ref()
        .ok_or_else(|| untrusted("signer info has no signed attributes"))?;
    let attr = attrs
        .iter()
        .find(|a| a.oid == ID_MESSAGE_DIGEST)
        .ok_or_else(|| untrusted("signed attributes have no message digest"))?;
    let value = attr
        .values
        .iter()
        .next()
        .ok_or_else(|| untrusted("message digest attribute is empty"))?;
    let digest = value
        .decode_as::<OctetString>()
        .map_err(|e| untrusted(format!("invalid message digest attribute: {e}")))?;
    Ok(digest.as_bytes().to_vec())
}

fn verify_signer_signature(signer: &SignerInfo, cert: &Certificate) -> Result<()> {
    let key = PublicKey::from_spki(&cert.tbs_certificate.subject_public_key_info)
        .map_err(|e| untrusted(format!("invalid TSA key: {e}")))?;
    let scheme = if signer.signature_algorithm.oid == ID_EC_PUBLIC_KEY {
        let digest_alg = hash_algorithm(signer.digest_alg.oid)?;
        scheme_for_digest(&key, digest_alg)
            .ok_or_else(|| untrusted(format!("unsupported TSA signature with {digest_alg}")))?
    } else {
        key.scheme_for_signature_algorithm(signer.signature_algorithm.oid)
            .map_err(|e| untrusted(format!("unsupported TSA signature: {e}")))?
    };

    let signed_attrs = signer
        .signed_attrs
        .as_ref()
        .ok_or_else(|| untrusted("signer info has no signed attributes"))?
        .to_der()
        .map_err(|e| untrusted(format!("failed to encode signed attributes: {e}")))?;
    key.verify(&signed_attrs, signer.signature.as_bytes(), scheme)
        .map_err(|e| untrusted(format!("TSA signature does not verify: {e}")))
}

fn check_time_stamping_usage(cert: &Certificate) -> Result<()> {
    match cert.tbs_certificate.get::<ExtendedKeyUsage>() {
        Ok(Some((_, eku))) if !eku.0.contains(&ID_KP_TIME_STAMPING) => {
            Err(untrusted("TSA certificate is not valid for timeStamping"))
        }
        Ok(_) => Ok(()),
        Err(e) => Err(untrusted(format!("invalid ExtendedKeyUsage: {e}"))),
    }
}

/// Chain the signer to a trusted TSA valid at `time`
fn verify_tsa_chain(
    cert: &Certificate,
    material: &TrustedRootMaterial,
    time: i64,
) -> Result<()> {
    let cert_der = cert
        .to_der()
        .map_err(|e| untrusted(format!("failed to encode TSA certificate: {e}")))?;
    let info = sigcheck_crypto::certificate_info(cert)
        .map_err(|e| untrusted(format!("invalid TSA certificate: {e}")))?;
    if !info.is_valid_at(time) {
        return Err(untrusted(format!(
            "generation time {time} is outside the TSA certificate validity"
        )));
    }

    for authority in material.timestamp_authorities() {
        let chain = authority.chain();
        let anchored = match chain.iter().position(|c| c.der() == cert_der) {
            Some(i) => Some(i),
            None => authority
                .position_of(&cert.tbs_certificate.issuer)
                .filter(|&i| {
                    sigcheck_crypto::verify_issued_by(&cert_der, cert, chain[i].certificate())
                        .is_ok()
                }),
        };
        let Some(index) = anchored else {
            continue;
        };

        if !authority.valid_for().contains_unix(time) {
            return Err(untrusted(format!(
                "generation time {time} is outside the validity of TSA {}",
                authority.uri()
            )));
        }
        if chain[index..].iter().any(|c| !c.info().is_valid_at(time)) {
            return Err(untrusted(format!(
                "generation time {time} is outside the TSA chain validity"
            )));
        }
        return Ok(());
    }
    Err(untrusted("TSA certificate does not chain to a trusted timestamp authority"))
}

/// Verify one timestamp over `signature`, returning its generation time
fn verify_timestamp(
    timestamp: &[u8],
    signature: &[u8],
    material: &TrustedRootMaterial,
) -> Result<i64> {
    let token = time_stamp_token(timestamp)?;
    if token.content_type != ID_SIGNED_DATA {
        return Err(untrusted(format!(
            "timestamp token content type {} is not signed data",
            token.content_type
        )));
    }
    let signed_data = token
        .content
        .decode_as::<SignedData>()
        .map_err(|e| untrusted(format!("invalid timestamp signed data: {e}")))?;

    let encap = &signed_data.encap_content_info;
    if encap.econtent_type != ID_CT_TST_INFO {
        return Err(untrusted(format!(
            "timestamp content type {} is not TSTInfo",
            encap.econtent_type
        )));
    }
    let tst_der = encap
        .econtent
        .as_ref()
        .ok_or_else(|| untrusted("timestamp token has no TSTInfo"))?
        .decode_as::<OctetStringRef<'_>>()
        .map_err(|e| untrusted(format!("invalid TSTInfo wrapper: {e}")))?
        .as_bytes()
        .to_vec();
    let tst_info =
        TstInfo::from_der(&tst_der).map_err(|e| untrusted(format!("invalid TSTInfo: {e}")))?;

    let imprint = &tst_info.message_imprint;
    let imprint_alg = hash_algorithm(imprint.hash_algorithm.oid)?;
    if sigcheck_crypto::digest(imprint_alg, signature) != imprint.hashed_message.as_bytes() {
        return Err(untrusted("message imprint does not match the bundle signature"));
    }

    let [signer] = signed_data.signer_infos.0.as_slice() else {
        return Err(untrusted(format!(
            "timestamp token must have exactly one signer, found {}",
            signed_data.signer_infos.0.len()
        )));
    };
    let digest_alg = hash_algorithm(signer.digest_alg.oid)?;
    if signed_message_digest(signer)? != sigcheck_crypto::digest(digest_alg, &tst_der) {
        return Err(untrusted("signed message digest does not match TSTInfo"));
    }

    let embedded = signed_data
        .certificates
        .iter()
        .flat_map(|set| set.0.iter())
        .filter_map(|choice| match choice {
            CertificateChoices::Certificate(cert) => Some(cert),
            _ => None,
        });
    let trusted = material
        .timestamp_authorities()
        .iter()
        .flat_map(|a| a.chain().iter().map(|c| c.certificate()));
    let signer_cert = embedded
        .chain(trusted)
        .find(|cert| matches_signer(cert, &signer.sid))
        .ok_or_else(|| untrusted("TSA signing certificate not found"))?;

    verify_signer_signature(signer, signer_cert)?;
    check_time_stamping_usage(signer_cert)?;

    let time = tst_info.gen_time.to_unix_duration().as_secs() as i64;
    verify_tsa_chain(signer_cert, material, time)?;
    Ok(time)
}

/// Verify every RFC 3161 timestamp over the bundle signature
///
/// Returns the generation times; any failing timestamp is an error.
pub fn verify_timestamps(
    timestamps: &[SignedTimestamp],
    signature: &[u8],
    material: &TrustedRootMaterial,
) -> Result<Vec<i64>> {
    if !timestamps.is_empty() && material.timestamp_authorities().is_empty() {
        return Err(untrusted("bundle has timestamps but no timestamp authority is trusted"));
    }
    timestamps
        .iter()
        .map(|ts| verify_timestamp(ts.as_bytes(), signature, material))
        .collect()
}
