//! Signature verification
//!
//! Keys are decoded from SubjectPublicKeyInfo DER so that the same code path
//! serves trusted-root keys, certificate keys and CT log keys.

use crate::error::{Error, Result};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, SECP_256_R_1, SECP_384_R_1};
use const_oid::db::rfc8410::ID_ED_25519;
use const_oid::ObjectIdentifier;
use der::{Decode, Encode};
use ecdsa::signature::hazmat::PrehashVerifier;
use ecdsa::signature::Verifier;
use sha2::{Digest, Sha256, Sha384};
use sigcheck_types::HashAlgorithm;
use spki::{DecodePublicKey, SubjectPublicKeyInfoOwned};

/// Supported key and hash combinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningScheme {
    EcdsaP256Sha256,
    EcdsaP256Sha384,
    EcdsaP384Sha256,
    EcdsaP384Sha384,
    Ed25519,
}

impl SigningScheme {
    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            SigningScheme::EcdsaP256Sha256 => "ECDSA_P256_SHA256",
            SigningScheme::EcdsaP256Sha384 => "ECDSA_P256_SHA384",
            SigningScheme::EcdsaP384Sha256 => "ECDSA_P384_SHA256",
            SigningScheme::EcdsaP384Sha384 => "ECDSA_P384_SHA384",
            SigningScheme::Ed25519 => "ED25519",
        }
    }

    /// The message hash, `None` for schemes that hash internally
    pub fn hash_algorithm(&self) -> Option<HashAlgorithm> {
        match self {
            SigningScheme::EcdsaP256Sha256 | SigningScheme::EcdsaP384Sha256 => {
                Some(HashAlgorithm::Sha2_256)
            }
            SigningScheme::EcdsaP256Sha384 | SigningScheme::EcdsaP384Sha384 => {
                Some(HashAlgorithm::Sha2_384)
            }
            SigningScheme::Ed25519 => None,
        }
    }

    /// Whether a precomputed digest can be verified directly
    pub fn supports_prehashed(&self) -> bool {
        !matches!(self, SigningScheme::Ed25519)
    }

    /// Map a trusted-root `keyDetails` value
    pub fn from_key_details(details: &str) -> Option<Self> {
        match details {
            "PKIX_ECDSA_P256_SHA_256" => Some(SigningScheme::EcdsaP256Sha256),
            "PKIX_ECDSA_P384_SHA_384" => Some(SigningScheme::EcdsaP384Sha384),
            "PKIX_ED25519" | "PKIX_ED25519_PH" => Some(SigningScheme::Ed25519),
            _ => None,
        }
    }
}

/// A decoded verification key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
    Ed25519(ed25519_dalek::VerifyingKey),
}

impl PublicKey {
    /// Decode a key from SubjectPublicKeyInfo DER
    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        let spki = SubjectPublicKeyInfoOwned::from_der(der)?;
        match key_kind(&spki)? {
            KeyKind::P256 => p256::ecdsa::VerifyingKey::from_public_key_der(der)
                .map(PublicKey::P256)
                .map_err(|e| Error::InvalidKey(format!("P-256: {e}"))),
            KeyKind::P384 => p384::ecdsa::VerifyingKey::from_public_key_der(der)
                .map(PublicKey::P384)
                .map_err(|e| Error::InvalidKey(format!("P-384: {e}"))),
            KeyKind::Ed25519 => ed25519_dalek::VerifyingKey::from_public_key_der(der)
                .map(PublicKey::Ed25519)
                .map_err(|e| Error::InvalidKey(format!("Ed25519: {e}"))),
        }
    }

    /// Decode a key from a parsed SubjectPublicKeyInfo
    pub fn from_spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        Self::from_spki_der(&spki.to_der()?)
    }

    /// The scheme a key of this type signs with unless told otherwise
    pub fn default_scheme(&self) -> SigningScheme {
        match self {
            PublicKey::P256(_) => SigningScheme::EcdsaP256Sha256,
            PublicKey::P384(_) => SigningScheme::EcdsaP384Sha384,
            PublicKey::Ed25519(_) => SigningScheme::Ed25519,
        }
    }

    /// Map an X.509 signature algorithm OID to a scheme for this key
    pub fn scheme_for_signature_algorithm(&self, oid: ObjectIdentifier) -> Result<SigningScheme> {
        use const_oid::db::rfc5912::{ECDSA_WITH_SHA_256, ECDSA_WITH_SHA_384};

        match (self, oid) {
            (PublicKey::P256(_), o) if o == ECDSA_WITH_SHA_256 => Ok(SigningScheme::EcdsaP256Sha256),
            (PublicKey::P256(_), o) if o == ECDSA_WITH_SHA_384 => Ok(SigningScheme::EcdsaP256Sha384),
            (PublicKey::P384(_), o) if o == ECDSA_WITH_SHA_256 => Ok(SigningScheme::EcdsaP384Sha256),
            (PublicKey::P384(_), o) if o == ECDSA_WITH_SHA_384 => Ok(SigningScheme::EcdsaP384Sha384),
            (PublicKey::Ed25519(_), o) if o == ID_ED_25519 => Ok(SigningScheme::Ed25519),
            _ => Err(Error::UnsupportedAlgorithm(format!(
                "signature algorithm {oid} with {} key",
                self.default_scheme().name()
            ))),
        }
    }

    /// Verify `signature` over `message`
    pub fn verify(&self, message: &[u8], signature: &[u8], scheme: SigningScheme) -> Result<()> {
        match (self, scheme) {
            (PublicKey::P256(key), SigningScheme::EcdsaP256Sha256) => {
                key.verify(message, &p256_signature(signature)?)
                    .map_err(|e| Error::VerificationFailed(e.to_string()))
            }
            (PublicKey::P384(key), SigningScheme::EcdsaP384Sha384) => {
                key.verify(message, &p384_signature(signature)?)
                    .map_err(|e| Error::VerificationFailed(e.to_string()))
            }
            (PublicKey::P256(_), SigningScheme::EcdsaP256Sha384)
            | (PublicKey::P384(_), SigningScheme::EcdsaP384Sha256) => {
                let digest = match scheme.hash_algorithm() {
                    Some(HashAlgorithm::Sha2_384) => Sha384::digest(message).to_vec(),
                    _ => Sha256::digest(message).to_vec(),
                };
                self.verify_prehashed(&digest, signature, scheme)
            }
            (PublicKey::Ed25519(key), SigningScheme::Ed25519) => {
                let sig = ed25519_dalek::Signature::from_slice(signature)
                    .map_err(|e| Error::InvalidSignature(e.to_string()))?;
                key.verify_strict(message, &sig)
                    .map_err(|e| Error::VerificationFailed(e.to_string()))
            }
            _ => Err(scheme_mismatch(self, scheme)),
        }
    }

    /// Verify `signature` over a precomputed message digest
    pub fn verify_prehashed(
        &self,
        digest: &[u8],
        signature: &[u8],
        scheme: SigningScheme,
    ) -> Result<()> {
        if let Some(algorithm) = scheme.hash_algorithm() {
            if digest.len() != algorithm.digest_len() {
                return Err(Error::VerificationFailed(format!(
                    "digest length {} does not match {}",
                    digest.len(),
                    algorithm
                )));
            }
        }

        match (self, scheme) {
            (
                PublicKey::P256(key),
                SigningScheme::EcdsaP256Sha256 | SigningScheme::EcdsaP256Sha384,
            ) => key
                .verify_prehash(digest, &p256_signature(signature)?)
                .map_err(|e| Error::VerificationFailed(e.to_string())),
            (
                PublicKey::P384(key),
                SigningScheme::EcdsaP384Sha256 | SigningScheme::EcdsaP384Sha384,
            ) => key
                .verify_prehash(digest, &p384_signature(signature)?)
                .map_err(|e| Error::VerificationFailed(e.to_string())),
            (PublicKey::Ed25519(_), _) => Err(Error::UnsupportedAlgorithm(
                "Ed25519 does not support prehashed verification".to_string(),
            )),
            _ => Err(scheme_mismatch(self, scheme)),
        }
    }
}

/// Verify a signature with a key given as SPKI DER
pub fn verify_signature(
    spki_der: &[u8],
    message: &[u8],
    signature: &[u8],
    scheme: SigningScheme,
) -> Result<()> {
    PublicKey::from_spki_der(spki_der)?.verify(message, signature, scheme)
}

/// Verify a signature with the key's default scheme
pub fn verify_signature_auto(spki_der: &[u8], message: &[u8], signature: &[u8]) -> Result<()> {
    let key = PublicKey::from_spki_der(spki_der)?;
    key.verify(message, signature, key.default_scheme())
}

enum KeyKind {
    P256,
    P384,
    Ed25519,
}

fn key_kind(spki: &SubjectPublicKeyInfoOwned) -> Result<KeyKind> {
    if spki.algorithm.oid == ID_ED_25519 {
        return Ok(KeyKind::Ed25519);
    }
    if spki.algorithm.oid != ID_EC_PUBLIC_KEY {
        return Err(Error::UnsupportedAlgorithm(format!(
            "public key algorithm {}",
            spki.algorithm.oid
        )));
    }
    let params = spki
        .algorithm
        .parameters
        .as_ref()
        .ok_or_else(|| Error::InvalidKey("EC key missing curve parameters".to_string()))?;
    let curve = ObjectIdentifier::from_bytes(params.value())
        .map_err(|e| Error::InvalidKey(format!("invalid curve OID: {e}")))?;
    if curve == SECP_256_R_1 {
        Ok(KeyKind::P256)
    } else if curve == SECP_384_R_1 {
        Ok(KeyKind::P384)
    } else {
        Err(Error::UnsupportedAlgorithm(format!("EC curve {curve}")))
    }
}

// ECDSA signatures in Sigstore artifacts are DER; raw r||s is tolerated.
fn p256_signature(bytes: &[u8]) -> Result<p256::ecdsa::Signature> {
    p256::ecdsa::Signature::from_der(bytes)
        .or_else(|_| p256::ecdsa::Signature::from_slice(bytes))
        .map_err(|e| Error::InvalidSignature(e.to_string()))
}

fn p384_signature(bytes: &[u8]) -> Result<p384::ecdsa::Signature> {
    p384::ecdsa::Signature::from_der(bytes)
        .or_else(|_| p384::ecdsa::Signature::from_slice(bytes))
        .map_err(|e| Error::InvalidSignature(e.to_string()))
}

fn scheme_mismatch(key: &PublicKey, scheme: SigningScheme) -> Error {
    Error::UnsupportedAlgorithm(format!(
        "scheme {} cannot be used with a {} key",
        scheme.name(),
        key.default_scheme().name()
    ))
}
