//! Transparency log verification
//!
//! Each entry is checked against a trusted log: the inclusion proof and its
//! signed checkpoint, the signed entry timestamp (SET), the integrated time
//! and finally the body itself.

use super::entry::{merge_logged_digest, verify_entry_body, LoggedDigest};
use crate::error::{Error, Result};
use serde::Serialize;
use sigcheck_bundle::SignedBundle;
use sigcheck_trust_root::{LogMaterial, TrustedRootMaterial};
use sigcheck_types::{encode_base64, InclusionProof, Sha256Hash, TransparencyLogEntry};

/// What the log entries established
#[derive(Debug, Default)]
pub struct TlogOutcome {
    /// Integrated times backed by a verified SET
    pub set_times: Vec<i64>,
    /// Digest recorded by hashedrekord entries
    pub logged_digest: Option<LoggedDigest>,
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InclusionProofInvalid(message.into())
}

/// Verify every transparency log entry of `bundle`
///
/// At least `min_entries` entries must carry a verified inclusion proof.
pub fn verify_tlog_entries(
    bundle: &SignedBundle,
    material: &TrustedRootMaterial,
    min_entries: usize,
    now: i64,
    clock_skew_seconds: i64,
) -> Result<TlogOutcome> {
    let mut outcome = TlogOutcome::default();
    let mut proven = 0;

    for entry in bundle.tlog_entries() {
        let log = material.tlog(entry.log_id.key_id.as_bytes()).ok_or_else(|| {
            invalid(format!(
                "log ID {} not found in trusted transparency logs",
                entry.log_id.key_id.to_hex()
            ))
        })?;

        if let Some(proof) = &entry.inclusion_proof {
            verify_inclusion(entry, proof, log)?;
            proven += 1;
        }

        if entry.inclusion_promise.is_some() {
            verify_set(entry, log)?;
            if entry.has_integrated_time() {
                outcome.set_times.push(entry.integrated_time);
            }
        }

        // 0 means the log did not record a time
        if entry.has_integrated_time() {
            let time = entry.integrated_time;
            if time > now.saturating_add(clock_skew_seconds) {
                return Err(invalid(format!(
                    "integrated time {time} is in the future (now {now}, tolerance {clock_skew_seconds}s)"
                )));
            }
            if !log.valid_for().contains_unix(time) {
                return Err(invalid(format!(
                    "integrated time {time} is outside the validity of log {}",
                    log.base_url()
                )));
            }
        }

        let digest = verify_entry_body(entry, bundle)?;
        outcome.logged_digest = merge_logged_digest(outcome.logged_digest, digest)?;
    }

    if proven < min_entries {
        return Err(invalid(format!(
            "{proven} log entries with a verified inclusion proof, {min_entries} required"
        )));
    }
    Ok(outcome)
}

/// Check the Merkle path from the entry body to the checkpointed root
fn verify_inclusion(
    entry: &TransparencyLogEntry,
    proof: &InclusionProof,
    log: &LogMaterial,
) -> Result<()> {
    let index = u64::try_from(proof.log_index)
        .map_err(|_| invalid(format!("negative log index {}", proof.log_index)))?;
    let tree_size = u64::try_from(proof.tree_size)
        .map_err(|_| invalid(format!("negative tree size {}", proof.tree_size)))?;
    let hashes = proof
        .hashes
        .iter()
        .map(|h| Sha256Hash::try_from_slice(h.as_bytes()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| invalid(format!("invalid proof hash: {e}")))?;
    let root = Sha256Hash::try_from_slice(proof.root_hash.as_bytes())
        .map_err(|e| invalid(format!("invalid root hash: {e}")))?;

    let leaf = sigcheck_merkle::hash_leaf(entry.canonicalized_body.as_bytes());
    sigcheck_merkle::verify_inclusion_proof(&leaf, index, tree_size, &hashes, &root)
        .map_err(|e| invalid(format!("inclusion proof does not verify: {e}")))?;

    verify_checkpoint(proof, &root, tree_size, log)
}

/// The checkpoint must commit to the proof's root and be signed by the log
fn verify_checkpoint(
    proof: &InclusionProof,
    root: &Sha256Hash,
    tree_size: u64,
    log: &LogMaterial,
) -> Result<()> {
    let checkpoint = proof
        .parse_checkpoint()
        .map_err(|e| invalid(format!("failed to parse checkpoint: {e}")))?;

    if &checkpoint.root_hash != root {
        return Err(invalid(format!(
            "checkpoint root hash {} does not match proof root hash {}",
            checkpoint.root_hash.to_hex(),
            root.to_hex()
        )));
    }
    if checkpoint.tree_size != tree_size {
        return Err(invalid(format!(
            "checkpoint tree size {} does not match proof tree size {tree_size}",
            checkpoint.tree_size
        )));
    }

    let hint = log
        .key_hint()
        .ok_or_else(|| invalid(format!("log {} has no key hint", log.base_url())))?;
    let mut last_error = None;
    for sig in checkpoint.signatures_for_hint(&hint) {
        match log
            .key()
            .verify(checkpoint.signed_data(), &sig.signature, log.scheme())
        {
            Ok(()) => return Ok(()),
            Err(e) => last_error = Some(e),
        }
    }
    Err(invalid(match last_error {
        Some(e) => format!("checkpoint signature does not verify: {e}"),
        None => format!("checkpoint has no signature from log {}", log.base_url()),
    }))
}

#[derive(Serialize)]
struct RekorPayload {
    body: String,
    #[serde(rename = "integratedTime")]
    integrated_time: i64,
    #[serde(rename = "logIndex")]
    log_index: i64,
    #[serde(rename = "logID")]
    log_id: String,
}

impl RekorPayload {
    fn for_entry(entry: &TransparencyLogEntry) -> Self {
        Self {
            body: encode_base64(entry.canonicalized_body.as_bytes()),
            integrated_time: entry.integrated_time,
            log_index: entry.log_index,
            log_id: entry.log_id.key_id.to_hex(),
        }
    }

    fn canonical_json(&self) -> Result<Vec<u8>> {
        serde_json_canonicalizer::to_vec(self)
            .map_err(|e| invalid(format!("failed to canonicalize SET payload: {e}")))
    }
}

/// Verify the signed entry timestamp over the canonical entry payload
fn verify_set(entry: &TransparencyLogEntry, log: &LogMaterial) -> Result<()> {
    let Some(promise) = &entry.inclusion_promise else {
        return Err(invalid("missing inclusion promise"));
    };
    let payload = RekorPayload::for_entry(entry).canonical_json()?;

    log.key()
        .verify(
            &payload,
            promise.signed_entry_timestamp.as_bytes(),
            log.scheme(),
        )
        .map_err(|e| invalid(format!("SET does not verify: {e}")))
}
