//! Log entry body matching
//!
//! A verified inclusion proof only shows that the log holds the body. These
//! checks show that the body describes this bundle: the same signature, the
//! same certificate and the same digest or payload.

use crate::error::{Error, Result};
use sigcheck_bundle::{SignedBundle, SignedContent};
use sigcheck_rekor::body::{
    DsseV001Body, DsseV002Body, HashedRekordV001Body, HashedRekordV002Body, IntotoSignature,
    IntotoV002Body, V002Verifier,
};
use sigcheck_rekor::RekorEntryBody;
use sigcheck_types::{DsseEnvelope, HashAlgorithm, MessageSignature, TransparencyLogEntry};

/// The artifact digest recorded by a hashedrekord entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedDigest {
    pub algorithm: HashAlgorithm,
    pub digest: Vec<u8>,
}

fn mismatch(message: impl Into<String>) -> Error {
    Error::InclusionProofInvalid(message.into())
}

/// Check that `entry` records this bundle
///
/// Returns the logged artifact digest for hashedrekord entries.
pub fn verify_entry_body(
    entry: &TransparencyLogEntry,
    bundle: &SignedBundle,
) -> Result<Option<LoggedDigest>> {
    let kv = &entry.kind_version;
    let body = RekorEntryBody::parse(entry.canonicalized_body.as_bytes(), &kv.kind, &kv.version)
        .map_err(|e| mismatch(format!("failed to parse entry body: {e}")))?;

    match (&body, bundle.content()) {
        (RekorEntryBody::HashedRekordV001(body), SignedContent::MessageSignature(sig)) => {
            verify_hashedrekord_v001(body, sig, bundle).map(Some)
        }
        (RekorEntryBody::HashedRekordV002(body), SignedContent::MessageSignature(sig)) => {
            verify_hashedrekord_v002(body, sig, bundle).map(Some)
        }
        (RekorEntryBody::DsseV001(body), SignedContent::DsseEnvelope(env)) => {
            verify_dsse_v001(body, env, bundle).map(|_| None)
        }
        (RekorEntryBody::DsseV002(body), SignedContent::DsseEnvelope(env)) => {
            verify_dsse_v002(body, env, bundle).map(|_| None)
        }
        (RekorEntryBody::IntotoV002(body), SignedContent::DsseEnvelope(env)) => {
            verify_intoto_v002(body, env, bundle).map(|_| None)
        }
        _ => Err(mismatch(format!(
            "{} {} entry does not match the bundle content",
            kv.kind, kv.version
        ))),
    }
}

/// The digest a hashedrekord entry found must agree with the one the bundle
/// claims, if it claims one
fn check_claimed_digest(sig: &MessageSignature, logged: &LoggedDigest) -> Result<()> {
    if let Some(claimed) = &sig.message_digest {
        if claimed.algorithm != logged.algorithm || claimed.digest.as_bytes() != logged.digest {
            return Err(mismatch(
                "bundle message digest differs from the logged digest",
            ));
        }
    }
    Ok(())
}

fn verify_hashedrekord_v001(
    body: &HashedRekordV001Body,
    sig: &MessageSignature,
    bundle: &SignedBundle,
) -> Result<LoggedDigest> {
    if body.spec.signature.content.as_bytes() != sig.signature.as_bytes() {
        return Err(mismatch("signature in log entry does not match bundle signature"));
    }

    let logged_cert = body
        .spec
        .signature
        .public_key
        .content
        .to_der()
        .map_err(|e| mismatch(format!("invalid certificate in log entry: {e}")))?;
    if logged_cert != bundle.leaf().der() {
        return Err(mismatch("certificate in log entry does not match bundle certificate"));
    }

    let hash = &body.spec.data.hash;
    let algorithm = hash
        .hash_algorithm()
        .ok_or_else(|| mismatch(format!("unsupported hash algorithm {:?}", hash.algorithm)))?;
    let digest = hash
        .bytes()
        .map_err(|e| mismatch(format!("invalid hash in log entry: {e}")))?;
    if digest.len() != algorithm.digest_len() {
        return Err(mismatch(format!("logged {algorithm} digest has wrong length")));
    }

    let logged = LoggedDigest { algorithm, digest };
    check_claimed_digest(sig, &logged)?;
    Ok(logged)
}

fn verify_hashedrekord_v002(
    body: &HashedRekordV002Body,
    sig: &MessageSignature,
    bundle: &SignedBundle,
) -> Result<LoggedDigest> {
    let rekord = &body.spec.hashed_rekord_v002;
    if rekord.signature.content.as_bytes() != sig.signature.as_bytes() {
        return Err(mismatch("signature in log entry does not match bundle signature"));
    }
    check_verifier(&rekord.signature.verifier, bundle)?;

    let algorithm = rekord.data.algorithm;
    let digest = rekord.data.digest.as_bytes().to_vec();
    if digest.len() != algorithm.digest_len() {
        return Err(mismatch(format!("logged {algorithm} digest has wrong length")));
    }

    let logged = LoggedDigest { algorithm, digest };
    check_claimed_digest(sig, &logged)?;
    Ok(logged)
}

fn check_verifier(verifier: &V002Verifier, bundle: &SignedBundle) -> Result<()> {
    match &verifier.x509_certificate {
        Some(cert) if cert.raw_bytes.as_bytes() == bundle.leaf().der() => Ok(()),
        Some(_) => Err(mismatch(
            "certificate in log entry does not match bundle certificate",
        )),
        None => Err(mismatch("log entry verifier is not a certificate")),
    }
}

/// Every bundle signature must appear in the entry and the counts must agree
fn check_signature_set(
    envelope: &DsseEnvelope,
    logged: impl Iterator<Item = Result<(Vec<u8>, bool)>>,
) -> Result<()> {
    let logged = logged.collect::<Result<Vec<_>>>()?;
    if logged.len() != envelope.signatures.len() {
        return Err(mismatch(format!(
            "DSSE signature count mismatch: bundle has {}, log entry has {}",
            envelope.signatures.len(),
            logged.len()
        )));
    }
    for bundle_sig in &envelope.signatures {
        let found = logged
            .iter()
            .any(|(sig, verifier_matches)| *verifier_matches && sig == bundle_sig.sig.as_bytes());
        if !found {
            return Err(mismatch(
                "DSSE signature not found in log entry with the bundle certificate",
            ));
        }
    }
    Ok(())
}

fn verify_dsse_v001(body: &DsseV001Body, envelope: &DsseEnvelope, bundle: &SignedBundle) -> Result<()> {
    let expected = &body.spec.payload_hash;
    if expected.hash_algorithm() != Some(HashAlgorithm::Sha2_256) {
        return Err(mismatch(format!(
            "unsupported payload hash algorithm {:?}",
            expected.algorithm
        )));
    }
    let computed = sigcheck_crypto::sha256(envelope.payload.as_bytes()).to_hex();
    if !computed.eq_ignore_ascii_case(&expected.value) {
        return Err(mismatch(format!(
            "DSSE payload hash mismatch: computed {computed}, logged {}",
            expected.value
        )));
    }

    let leaf = bundle.leaf().der();
    check_signature_set(
        envelope,
        body.spec.signatures.iter().map(|s| {
            let verifier = s
                .verifier
                .to_der()
                .map_err(|e| mismatch(format!("invalid verifier in log entry: {e}")))?;
            Ok((s.signature.as_bytes().to_vec(), verifier == leaf))
        }),
    )
}

fn verify_dsse_v002(body: &DsseV002Body, envelope: &DsseEnvelope, bundle: &SignedBundle) -> Result<()> {
    let dsse = &body.spec.dsse_v002;
    let computed = sigcheck_crypto::digest(dsse.payload_hash.algorithm, envelope.payload.as_bytes());
    if computed != dsse.payload_hash.digest.as_bytes() {
        return Err(mismatch("DSSE payload hash mismatch"));
    }

    let leaf = bundle.leaf().der();
    check_signature_set(
        envelope,
        dsse.signatures.iter().map(|s| {
            let verifier_matches = s
                .verifier
                .x509_certificate
                .as_ref()
                .is_some_and(|c| c.raw_bytes.as_bytes() == leaf);
            Ok((s.content.as_bytes().to_vec(), verifier_matches))
        }),
    )
}

fn verify_intoto_v002(body: &IntotoV002Body, envelope: &DsseEnvelope, bundle: &SignedBundle) -> Result<()> {
    let logged = &body.spec.content.envelope;
    if logged.payload_type != envelope.payload_type {
        return Err(mismatch("in-toto payload type does not match the envelope"));
    }
    let payload = logged
        .payload_bytes()
        .map_err(|e| mismatch(format!("invalid payload in log entry: {e}")))?;
    if payload != envelope.payload.as_bytes() {
        return Err(mismatch("in-toto payload does not match the envelope"));
    }

    let leaf = bundle.leaf().der();
    check_signature_set(
        envelope,
        logged.signatures.iter().map(|s| intoto_signature(s, leaf)),
    )
}

/// Signature bytes of an intoto entry signature and whether its verifier is `leaf`
///
/// A signature without a public key does not bind any certificate.
fn intoto_signature(signature: &IntotoSignature, leaf: &[u8]) -> Result<(Vec<u8>, bool)> {
    let sig = signature
        .signature_bytes()
        .map_err(|e| mismatch(format!("invalid signature in log entry: {e}")))?;
    let verifier_matches = match &signature.public_key {
        Some(pem) => {
            pem.to_der()
                .map_err(|e| mismatch(format!("invalid verifier in log entry: {e}")))?
                == leaf
        }
        None => false,
    };
    Ok((sig, verifier_matches))
}

/// Combine the digests of several entries; they must agree
pub fn merge_logged_digest(
    current: Option<LoggedDigest>,
    next: Option<LoggedDigest>,
) -> Result<Option<LoggedDigest>> {
    match (current, next) {
        (Some(a), Some(b)) if a != b => Err(mismatch("log entries record different digests")),
        (Some(a), _) => Ok(Some(a)),
        (None, b) => Ok(b),
    }
}
