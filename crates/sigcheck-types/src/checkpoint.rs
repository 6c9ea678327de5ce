//! Signed-note checkpoints
//!
//! A checkpoint is the signed tree head of a transparency log, serialized as a
//! signed note:
//!
//! ```text
//! rekor.example.dev - 1193050959916656506
//! 42
//! 3q2+7w==...
//!
//! — rekor.example.dev wNI9ajBFAiEA...
//! ```
//!
//! The body (origin, tree size, base64 root hash, optional extension lines) is
//! followed by a blank line and one or more signature lines. Each signature
//! line carries the signer name and base64 of a 4-byte key hint followed by
//! the signature.

use crate::encoding::{decode_base64, Sha256Hash};
use crate::error::{Error, Result};

/// Prefix of a signature line in a signed note (em dash followed by a space)
const SIGNATURE_PREFIX: &str = "\u{2014} ";

/// A parsed checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// Log origin string
    pub origin: String,
    /// Tree size this checkpoint commits to
    pub tree_size: u64,
    /// Merkle root hash
    pub root_hash: Sha256Hash,
    /// Extension lines after the root hash
    pub other_content: Vec<String>,
    /// Signatures over the body
    pub signatures: Vec<CheckpointSignature>,
    body: String,
}

/// One signature line of a checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointSignature {
    /// Signer name
    pub name: String,
    /// First four bytes of the signer's key ID
    pub key_id: [u8; 4],
    /// Signature bytes
    pub signature: Vec<u8>,
}

impl Checkpoint {
    /// Parse a checkpoint from its signed-note text
    pub fn from_text(text: &str) -> Result<Self> {
        let (body, signature_block) = text
            .split_once("\n\n")
            .ok_or_else(|| Error::InvalidCheckpoint("missing blank line before signatures".into()))?;

        let mut lines = body.split('\n');
        let origin = lines
            .next()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| Error::InvalidCheckpoint("missing origin".into()))?
            .to_string();
        let tree_size = lines
            .next()
            .ok_or_else(|| Error::InvalidCheckpoint("missing tree size".into()))?
            .parse::<u64>()
            .map_err(|e| Error::InvalidCheckpoint(format!("invalid tree size: {e}")))?;
        let root_line = lines
            .next()
            .ok_or_else(|| Error::InvalidCheckpoint("missing root hash".into()))?;
        let root_hash = Sha256Hash::try_from_slice(&decode_base64(root_line)?)?;
        let other_content = lines.map(str::to_string).collect();

        let mut signatures = Vec::new();
        for line in signature_block.lines().filter(|l| !l.is_empty()) {
            signatures.push(parse_signature_line(line)?);
        }
        if signatures.is_empty() {
            return Err(Error::InvalidCheckpoint("no signatures".into()));
        }

        Ok(Self {
            origin,
            tree_size,
            root_hash,
            other_content,
            signatures,
            body: format!("{body}\n"),
        })
    }

    /// The bytes covered by the note signatures: the body including its
    /// trailing newline
    pub fn signed_data(&self) -> &[u8] {
        self.body.as_bytes()
    }

    /// Signatures whose key hint matches
    pub fn signatures_for_hint<'a>(
        &'a self,
        key_hint: &'a [u8; 4],
    ) -> impl Iterator<Item = &'a CheckpointSignature> + 'a {
        self.signatures.iter().filter(move |s| &s.key_id == key_hint)
    }
}

fn parse_signature_line(line: &str) -> Result<CheckpointSignature> {
    let rest = line
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or_else(|| Error::InvalidCheckpoint(format!("malformed signature line: {line}")))?;
    let (name, encoded) = rest
        .rsplit_once(' ')
        .ok_or_else(|| Error::InvalidCheckpoint("signature line missing signature".into()))?;
    let raw = decode_base64(encoded)?;
    if raw.len() < 5 {
        return Err(Error::InvalidCheckpoint("signature too short".into()));
    }
    let mut key_id = [0u8; 4];
    key_id.copy_from_slice(&raw[..4]);
    Ok(CheckpointSignature {
        name: name.to_string(),
        key_id,
        signature: raw[4..].to_vec(),
    })
}
