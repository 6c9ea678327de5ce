//! Artifact digest policy

use super::identity::IdentityPolicy;
use crate::error::{Error, Result};
use sigcheck_types::HashAlgorithm;
use subtle::ConstantTimeEq;

/// The digest the signed artifact must have
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPolicy {
    algorithm: HashAlgorithm,
    digest: Vec<u8>,
}

impl ArtifactPolicy {
    /// Expect `digest`, which must be as long as the algorithm's output
    pub fn new(algorithm: HashAlgorithm, digest: Vec<u8>) -> Result<Self> {
        if digest.len() != algorithm.digest_len() {
            return Err(Error::parse(format!(
                "{algorithm} digest must be {} bytes, got {}",
                algorithm.digest_len(),
                digest.len()
            )));
        }
        Ok(Self { algorithm, digest })
    }

    /// Expect the digest given as hex, in either case
    pub fn from_hex(algorithm: HashAlgorithm, digest_hex: &str) -> Result<Self> {
        let digest = hex::decode(digest_hex)
            .map_err(|e| Error::parse(format!("invalid digest hex: {e}")))?;
        Self::new(algorithm, digest)
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Whether `candidate` is the expected digest under `algorithm`
    pub fn evaluate(&self, candidate: &[u8], algorithm: HashAlgorithm) -> bool {
        if algorithm != self.algorithm || candidate.len() != self.digest.len() {
            return false;
        }
        self.digest.ct_eq(candidate).into()
    }
}

/// Everything a bundle is checked against
#[derive(Debug, Clone)]
pub struct Policy {
    pub artifact: ArtifactPolicy,
    pub identity: IdentityPolicy,
}

impl Policy {
    pub fn new(artifact: ArtifactPolicy, identity: impl Into<IdentityPolicy>) -> Self {
        Self {
            artifact,
            identity: identity.into(),
        }
    }
}
