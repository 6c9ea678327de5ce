//! Bundle signature verification with the leaf key

use crate::error::{Error, Result};
use sigcheck_crypto::{PublicKey, SigningScheme};
use sigcheck_types::{DsseEnvelope, HashAlgorithm};

/// The scheme for a signature over a digest of `algorithm` made with `key`
pub(super) fn scheme_for_digest(key: &PublicKey, algorithm: HashAlgorithm) -> Option<SigningScheme> {
    match (key, algorithm) {
        (PublicKey::P256(_), HashAlgorithm::Sha2_256) => Some(SigningScheme::EcdsaP256Sha256),
        (PublicKey::P256(_), HashAlgorithm::Sha2_384) => Some(SigningScheme::EcdsaP256Sha384),
        (PublicKey::P384(_), HashAlgorithm::Sha2_256) => Some(SigningScheme::EcdsaP384Sha256),
        (PublicKey::P384(_), HashAlgorithm::Sha2_384) => Some(SigningScheme::EcdsaP384Sha384),
        _ => None,
    }
}

/// Verify a message signature over the artifact digest
pub fn verify_message_signature(
    key: &PublicKey,
    signature: &[u8],
    algorithm: HashAlgorithm,
    digest: &[u8],
) -> Result<()> {
    let scheme = scheme_for_digest(key, algorithm).ok_or_else(|| {
        Error::SignatureInvalid(format!(
            "cannot verify a {algorithm} digest with a {} key",
            key.default_scheme().name()
        ))
    })?;
    key.verify_prehashed(digest, signature, scheme)
        .map_err(|e| Error::SignatureInvalid(format!("message signature does not verify: {e}")))
}

/// Verify the single signature of a DSSE envelope over its PAE
pub fn verify_dsse_signature(key: &PublicKey, envelope: &DsseEnvelope) -> Result<()> {
    let [signature] = envelope.signatures.as_slice() else {
        return Err(Error::SignatureInvalid(format!(
            "DSSE envelope must have exactly one signature, found {}",
            envelope.signatures.len()
        )));
    };

    key.verify(&envelope.pae(), signature.sig.as_bytes(), key.default_scheme())
        .map_err(|e| Error::SignatureInvalid(format!("DSSE signature does not verify: {e}")))
}
