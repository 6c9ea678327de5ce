//! Process-wide verification context
//!
//! The adapters build one [`VerifierContext`] from [`Settings`] and call
//! [`VerifierContext::verify`] per request. The context owns the shared trust
//! snapshot; every call verifies against the snapshot current when it starts.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::policy::{ArtifactPolicy, IdentityPolicy, Policy};
use crate::verify::{VerificationResult, Verifier, VerifierConfig};
use sigcheck_trust_root::{FileSource, SharedTrustMaterial, TrustMaterialSource, TrustedRootMaterial};
use sigcheck_types::HashAlgorithm;
use std::path::Path;

fn unavailable(e: sigcheck_trust_root::Error) -> Error {
    Error::TrustMaterialUnavailable(e.to_string())
}

/// Trust material, identity policy and engine configuration
pub struct VerifierContext {
    trust: SharedTrustMaterial,
    source: Option<Box<dyn TrustMaterialSource>>,
    algorithm: HashAlgorithm,
    identity: IdentityPolicy,
    config: VerifierConfig,
    current_time: Option<i64>,
}

impl std::fmt::Debug for VerifierContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierContext")
            .field("algorithm", &self.algorithm)
            .field("identity", &self.identity)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VerifierContext {
    pub fn new(
        material: TrustedRootMaterial,
        algorithm: HashAlgorithm,
        identity: IdentityPolicy,
        config: VerifierConfig,
    ) -> Self {
        Self {
            trust: SharedTrustMaterial::new(material),
            source: None,
            algorithm,
            identity,
            config,
            current_time: None,
        }
    }

    /// Build a context whose trust material is loaded from `source`
    ///
    /// [`refresh`](Self::refresh) reloads from the same source.
    pub fn from_source(
        source: Box<dyn TrustMaterialSource>,
        algorithm: HashAlgorithm,
        identity: IdentityPolicy,
        config: VerifierConfig,
    ) -> Result<Self> {
        let trust = SharedTrustMaterial::load(source.as_ref()).map_err(unavailable)?;
        Ok(Self {
            trust,
            source: Some(source),
            algorithm,
            identity,
            config,
            current_time: None,
        })
    }

    /// Build a context from settings; the trusted root path is required
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let path = settings.trusted_root.as_ref().ok_or_else(|| {
            Error::TrustMaterialUnavailable("no trusted root file configured".into())
        })?;
        Self::from_source(
            Box::new(FileSource::new(path)),
            settings.artifact_algorithm()?,
            settings.identity_policy()?,
            settings.verification.clone(),
        )
    }

    /// Verify as if the clock read `time` (Unix seconds)
    pub fn with_current_time(mut self, time: i64) -> Self {
        self.current_time = Some(time);
        self
    }

    /// Verify the bundle at `bundle_path` for the artifact with digest `digest_hex`
    pub fn verify(
        &self,
        digest_hex: &str,
        bundle_path: impl AsRef<Path>,
    ) -> Result<VerificationResult> {
        let artifact = ArtifactPolicy::from_hex(self.algorithm, digest_hex)?;
        let bundle_path = bundle_path.as_ref();
        tracing::debug!("loading bundle from {}", bundle_path.display());
        let bundle = sigcheck_bundle::load(bundle_path)?;

        let policy = Policy::new(artifact, self.identity.clone());
        let material = self.trust.snapshot();
        let mut verifier = Verifier::new(&material).with_config(self.config.clone());
        if let Some(time) = self.current_time {
            verifier = verifier.with_current_time(time);
        }
        verifier.verify(&bundle, &policy)
    }

    /// Reload trust material from the configured source
    ///
    /// Contexts built with [`new`](Self::new) have no source and keep their
    /// snapshot.
    pub fn refresh(&self) -> Result<()> {
        match &self.source {
            Some(source) => self.refresh_from(source.as_ref()),
            None => Ok(()),
        }
    }

    /// Replace the trust material with a snapshot loaded from `source`
    pub fn refresh_from(&self, source: &dyn TrustMaterialSource) -> Result<()> {
        self.trust.refresh(source).map_err(unavailable)?;
        tracing::debug!("trust material refreshed");
        Ok(())
    }

    /// The trust material current verifications use
    pub fn material(&self) -> std::sync::Arc<TrustedRootMaterial> {
        self.trust.snapshot()
    }
}
