//! Hash algorithm identifiers

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Digest algorithms accepted for artifacts and log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "SHA2_256")]
    Sha2_256,
    #[serde(rename = "SHA2_384")]
    Sha2_384,
    #[serde(rename = "SHA2_512")]
    Sha2_512,
}

impl HashAlgorithm {
    /// Output length in bytes
    pub fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha2_256 => 32,
            HashAlgorithm::Sha2_384 => 48,
            HashAlgorithm::Sha2_512 => 64,
        }
    }

    /// Short lower-case name ("sha256"), as used in Rekor bodies and in-toto subjects
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha2_256 => "sha256",
            HashAlgorithm::Sha2_384 => "sha384",
            HashAlgorithm::Sha2_512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha2-256" | "sha2_256" | "sha-256" => Ok(HashAlgorithm::Sha2_256),
            "sha384" | "sha2-384" | "sha2_384" | "sha-384" => Ok(HashAlgorithm::Sha2_384),
            "sha512" | "sha2-512" | "sha2_512" | "sha-512" => Ok(HashAlgorithm::Sha2_512),
            _ => Err(Error::UnsupportedHashAlgorithm(s.to_string())),
        }
    }
}
