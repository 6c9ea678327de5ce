//! The verification engine
//!
//! [`Verifier::verify`] runs the checks in a fixed order and stops at the
//! first failure:
//!
//! 1. trust material is usable at the current time
//! 2. the leaf chains to a trusted CA and fits the code-signing profile
//! 3. enough embedded SCTs verify
//! 4. enough log entries carry a verified inclusion proof, and every entry
//!    records this bundle
//! 5. the bundle signature verifies with the leaf key
//! 6. enough observer timestamps exist; the earliest trusted time is the
//!    verification time, and the chain must be valid at it
//! 7. the artifact digest, then the certificate identity, match the policy

use crate::error::{Error, Result};
use crate::policy::{CertificateSummary, Policy};
use crate::verify_impl::chain::verify_certificate_chain;
use crate::verify_impl::sct::verify_scts;
use crate::verify_impl::signature::{verify_dsse_signature, verify_message_signature};
use crate::verify_impl::timestamps::verify_timestamps;
use crate::verify_impl::tlog::verify_tlog_entries;
use serde::{Deserialize, Serialize};
use sigcheck_bundle::{SignedBundle, SignedContent};
use sigcheck_trust_root::TrustedRootMaterial;
use sigcheck_types::{DsseEnvelope, HashAlgorithm, MediaType, Statement};

/// Default tolerance for log times ahead of the local clock
pub const DEFAULT_CLOCK_SKEW_SECONDS: i64 = 60;

/// Thresholds and switches of the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
    /// Embedded SCTs that must verify
    pub min_scts: usize,
    /// Log entries that must carry a verified inclusion proof
    pub min_tlog_entries: usize,
    /// Trusted observer timestamps (RFC 3161 or SET-backed log times)
    pub min_observer_timestamps: usize,
    /// Check certificate validity at the earliest trusted time instead of now
    pub reconcile_timestamps: bool,
    /// Seconds an integrated time may lie in the future
    pub clock_skew_seconds: i64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            min_scts: 1,
            min_tlog_entries: 1,
            min_observer_timestamps: 1,
            reconcile_timestamps: true,
            clock_skew_seconds: DEFAULT_CLOCK_SKEW_SECONDS,
        }
    }
}

/// Who vouched for a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampSource {
    /// An embedded certificate timestamp
    Sct,
    /// An integrated time with a verified SET
    TransparencyLog,
    /// An RFC 3161 timestamp authority
    TimestampAuthority,
}

/// A timestamp that passed verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedTimestamp {
    pub source: TimestampSource,
    /// Unix seconds
    pub time: i64,
}

/// The outcome of a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Identity fields of the verified leaf certificate
    pub identity: CertificateSummary,
    /// The time the certificate was checked at, in Unix seconds
    pub verification_time: i64,
    /// Every verified timestamp
    pub timestamps: Vec<VerifiedTimestamp>,
    pub media_type: MediaType,
}

impl VerificationResult {
    /// The certificate's subject alternative name
    pub fn san(&self) -> Option<&str> {
        self.identity.subject_alternative_name.as_deref()
    }

    /// The certificate's OIDC issuer
    pub fn issuer(&self) -> Option<&str> {
        self.identity.issuer.as_deref()
    }
}

/// Bundle verifier over one trust material snapshot
///
/// The verifier holds no mutable state; one instance may verify any number
/// of bundles, from any number of threads.
#[derive(Debug, Clone)]
pub struct Verifier<'a> {
    material: &'a TrustedRootMaterial,
    config: VerifierConfig,
    current_time: Option<i64>,
}

impl<'a> Verifier<'a> {
    /// A verifier with the default configuration
    pub fn new(material: &'a TrustedRootMaterial) -> Self {
        Self {
            material,
            config: VerifierConfig::default(),
            current_time: None,
        }
    }

    pub fn with_config(mut self, config: VerifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Verify as if the clock read `time` (Unix seconds)
    pub fn with_current_time(mut self, time: i64) -> Self {
        self.current_time = Some(time);
        self
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify `bundle` against `policy`
    pub fn verify(&self, bundle: &SignedBundle, policy: &Policy) -> Result<VerificationResult> {
        let now = self
            .current_time
            .unwrap_or_else(|| chrono::Utc::now().timestamp());
        let config = &self.config;

        if self.material.is_empty() {
            return Err(Error::TrustMaterialUnavailable(
                "trusted root has no certificate authority or no transparency log".into(),
            ));
        }
        if !self.material.has_unexpired_root(now) {
            return Err(Error::TrustMaterialUnavailable(format!(
                "every certificate authority root has expired at {now}"
            )));
        }

        let chain = verify_certificate_chain(bundle.leaf(), self.material)?;
        if !config.reconcile_timestamps {
            chain.check_validity(now)?;
        }

        let sct_times = verify_scts(
            bundle.leaf(),
            bundle.scts(),
            &chain,
            self.material,
            config.min_scts,
        )?;

        let tlog = verify_tlog_entries(
            bundle,
            self.material,
            config.min_tlog_entries,
            now,
            config.clock_skew_seconds,
        )?;

        let key = &chain.leaf.public_key;
        let signed_digest = match bundle.content() {
            SignedContent::MessageSignature(sig) => {
                let (algorithm, digest) = match (&tlog.logged_digest, &sig.message_digest) {
                    (Some(logged), _) => (logged.algorithm, logged.digest.clone()),
                    (None, Some(claimed)) => (claimed.algorithm, claimed.digest.as_bytes().to_vec()),
                    (None, None) => (policy.artifact.algorithm(), policy.artifact.digest().to_vec()),
                };
                verify_message_signature(key, sig.signature.as_bytes(), algorithm, &digest)?;
                Some((algorithm, digest))
            }
            SignedContent::DsseEnvelope(envelope) => {
                verify_dsse_signature(key, envelope)?;
                None
            }
        };

        let tsa_times = verify_timestamps(
            bundle.rfc3161_timestamps(),
            bundle.content().signature(),
            self.material,
        )?;
        let observers = tsa_times.len() + tlog.set_times.len();
        if observers < config.min_observer_timestamps {
            return Err(Error::NoTrustworthyTimestamp(format!(
                "{observers} observer timestamps verified, {} required",
                config.min_observer_timestamps
            )));
        }

        let mut timestamps: Vec<VerifiedTimestamp> = sct_times
            .iter()
            .map(|&time| (TimestampSource::Sct, time))
            .chain(tsa_times.iter().map(|&t| (TimestampSource::TimestampAuthority, t)))
            .chain(tlog.set_times.iter().map(|&t| (TimestampSource::TransparencyLog, t)))
            .map(|(source, time)| VerifiedTimestamp { source, time })
            .collect();
        timestamps.sort_by_key(|t| t.time);

        let verification_time = if config.reconcile_timestamps {
            let time = timestamps.first().map_or(now, |t| t.time);
            chain.check_validity(time)?;
            for observer in timestamps.iter().filter(|t| t.source != TimestampSource::Sct) {
                if !chain.leaf.is_valid_at(observer.time) {
                    return Err(Error::CertificateChainInvalid(format!(
                        "observer timestamp {} is outside the certificate validity",
                        observer.time
                    )));
                }
            }
            time
        } else {
            now
        };

        match (bundle.content(), signed_digest) {
            (SignedContent::MessageSignature(_), Some((algorithm, digest))) => {
                if !policy.artifact.evaluate(&digest, algorithm) {
                    return Err(Error::DigestMismatch(format!(
                        "signed {algorithm} digest {} is not the expected {} digest {}",
                        hex::encode(&digest),
                        policy.artifact.algorithm(),
                        hex::encode(policy.artifact.digest())
                    )));
                }
            }
            (SignedContent::DsseEnvelope(envelope), _) => check_statement_digest(envelope, policy)?,
            (SignedContent::MessageSignature(_), None) => {
                return Err(Error::DigestMismatch("no signed digest".into()));
            }
        }

        let identity = CertificateSummary::from_certificate(bundle.leaf().certificate());
        if let Some(reason) = policy.identity.mismatch_reason(&identity) {
            return Err(Error::IdentityPolicyMismatch(reason));
        }

        Ok(VerificationResult {
            identity,
            verification_time,
            timestamps,
            media_type: bundle.media_type(),
        })
    }
}

/// Some subject of the in-toto statement must carry the expected digest
fn check_statement_digest(envelope: &DsseEnvelope, policy: &Policy) -> Result<()> {
    let statement = Statement::from_slice(envelope.payload.as_bytes()).map_err(|e| {
        Error::DigestMismatch(format!("envelope payload is not an in-toto statement: {e}"))
    })?;

    let algorithm: HashAlgorithm = policy.artifact.algorithm();
    let matched = statement
        .subject_digests(algorithm)
        .filter_map(|digest_hex| hex::decode(digest_hex).ok())
        .any(|digest| policy.artifact.evaluate(&digest, algorithm));
    if !matched {
        return Err(Error::DigestMismatch(format!(
            "no statement subject has {algorithm} digest {}",
            hex::encode(policy.artifact.digest())
        )));
    }
    Ok(())
}
