//! SHA-2 hashing helpers

use sha2::{Digest, Sha256, Sha384, Sha512};
use sigcheck_types::{HashAlgorithm, Sha256Hash};

/// SHA-256 of `data`
pub fn sha256(data: &[u8]) -> Sha256Hash {
    Sha256Hash::from_bytes(Sha256::digest(data).into())
}

/// Digest `data` with the given algorithm
pub fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        HashAlgorithm::Sha2_256 => Sha256::digest(data).to_vec(),
        HashAlgorithm::Sha2_384 => Sha384::digest(data).to_vec(),
        HashAlgorithm::Sha2_512 => Sha512::digest(data).to_vec(),
    }
}
