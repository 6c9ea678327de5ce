//! Merkle tree proofs for transparency logs
//!
//! Hashing follows RFC 6962: leaves are `SHA-256(0x00 || data)` and interior
//! nodes are `SHA-256(0x01 || left || right)`. Proof verification follows the
//! iterative algorithms of RFC 9162 sections 2.1.3.2 and 2.1.4.2.

use sha2::{Digest, Sha256};
use sigcheck_types::Sha256Hash;
use thiserror::Error;

/// Errors from proof verification
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// Leaf index is not inside the tree
    #[error("leaf index {index} is out of range for tree size {tree_size}")]
    IndexOutOfRange { index: u64, tree_size: u64 },

    /// Proof has more or fewer hashes than the tree shape allows
    #[error("proof has the wrong number of hashes")]
    WrongProofSize,

    /// Recomputed root differs from the expected root
    #[error("root hash mismatch: computed {computed}, expected {expected}")]
    RootMismatch {
        computed: Sha256Hash,
        expected: Sha256Hash,
    },

    /// Tree sizes are inconsistent (the second tree is smaller)
    #[error("invalid tree sizes: {old_size} > {new_size}")]
    InvalidTreeSizes { old_size: u64, new_size: u64 },
}

/// Result type for Merkle operations
pub type Result<T> = std::result::Result<T, Error>;

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// Hash a leaf
pub fn hash_leaf(data: &[u8]) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(data);
    Sha256Hash::from_bytes(hasher.finalize().into())
}

/// Hash two child nodes
pub fn hash_children(left: &Sha256Hash, right: &Sha256Hash) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update([NODE_PREFIX]);
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Sha256Hash::from_bytes(hasher.finalize().into())
}

/// Root implied by an inclusion proof
pub fn root_from_inclusion_proof(
    leaf_hash: &Sha256Hash,
    index: u64,
    tree_size: u64,
    proof: &[Sha256Hash],
) -> Result<Sha256Hash> {
    if index >= tree_size {
        return Err(Error::IndexOutOfRange { index, tree_size });
    }

    let mut fn_ = index;
    let mut sn = tree_size - 1;
    let mut r = *leaf_hash;

    for p in proof {
        if sn == 0 {
            return Err(Error::WrongProofSize);
        }
        if fn_ & 1 == 1 || fn_ == sn {
            r = hash_children(p, &r);
            if fn_ & 1 == 0 {
                while fn_ & 1 == 0 && fn_ != 0 {
                    fn_ >>= 1;
                    sn >>= 1;
                }
            }
        } else {
            r = hash_children(&r, p);
        }
        fn_ >>= 1;
        sn >>= 1;
    }

    if sn != 0 {
        return Err(Error::WrongProofSize);
    }
    Ok(r)
}

/// Verify that `leaf_hash` is at `index` in the tree of `tree_size` with `root`
pub fn verify_inclusion_proof(
    leaf_hash: &Sha256Hash,
    index: u64,
    tree_size: u64,
    proof: &[Sha256Hash],
    root: &Sha256Hash,
) -> Result<()> {
    let computed = root_from_inclusion_proof(leaf_hash, index, tree_size, proof)?;
    if &computed != root {
        return Err(Error::RootMismatch {
            computed,
            expected: *root,
        });
    }
    Ok(())
}

/// Verify that the tree of `old_size` with `old_root` is a prefix of the tree
/// of `new_size` with `new_root`
pub fn verify_consistency_proof(
    old_size: u64,
    new_size: u64,
    proof: &[Sha256Hash],
    old_root: &Sha256Hash,
    new_root: &Sha256Hash,
) -> Result<()> {
    if old_size > new_size {
        return Err(Error::InvalidTreeSizes { old_size, new_size });
    }
    if old_size == new_size {
        if !proof.is_empty() {
            return Err(Error::WrongProofSize);
        }
        return check_root(old_root, old_root, new_root);
    }
    if old_size == 0 {
        // The empty tree is a prefix of every tree.
        return if proof.is_empty() {
            Ok(())
        } else {
            Err(Error::WrongProofSize)
        };
    }
    if proof.is_empty() {
        return Err(Error::WrongProofSize);
    }

    let mut path: Vec<Sha256Hash> = Vec::with_capacity(proof.len() + 1);
    if old_size.is_power_of_two() {
        path.push(*old_root);
    }
    path.extend_from_slice(proof);

    let mut fn_ = old_size - 1;
    let mut sn = new_size - 1;
    while fn_ & 1 == 1 {
        fn_ >>= 1;
        sn >>= 1;
    }

    let mut fr = path[0];
    let mut sr = path[0];
    for c in &path[1..] {
        if sn == 0 {
            return Err(Error::WrongProofSize);
        }
        if fn_ & 1 == 1 || fn_ == sn {
            fr = hash_children(c, &fr);
            sr = hash_children(c, &sr);
            if fn_ & 1 == 0 {
                while fn_ & 1 == 0 && fn_ != 0 {
                    fn_ >>= 1;
                    sn >>= 1;
                }
            }
        } else {
            sr = hash_children(&sr, c);
        }
        fn_ >>= 1;
        sn >>= 1;
    }

    if sn != 0 {
        return Err(Error::WrongProofSize);
    }
    check_root(&fr, old_root, old_root)?;
    check_root(&sr, new_root, new_root)
}

fn check_root(computed: &Sha256Hash, expected: &Sha256Hash, other: &Sha256Hash) -> Result<()> {
    if computed != expected || expected != other {
        return Err(Error::RootMismatch {
            computed: *computed,
            expected: *other,
        });
    }
    Ok(())
}
