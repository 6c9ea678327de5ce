//! Configuration file support
//!
//! The adapters are configured by a TOML file:
//!
//! ```toml
//! trusted_root = "/etc/sigcheck/trusted_root.json"
//!
//! [policy]
//! san = { regex = "^https://github.com/org/repo/" }
//! issuer = { literal = "https://token.actions.githubusercontent.com" }
//! digest_algorithm = "sha256"
//!
//! [policy.extensions]
//! RunnerEnvironment = "github-hosted"
//!
//! [verification]
//! min_scts = 1
//! clock_skew_seconds = 60
//! ```
//!
//! Anything left out takes the value of [`Settings::default`], which is the
//! policy the verifier was first deployed with.

use crate::error::{Error, Result};
use crate::policy::{CertificateIdentityPolicy, IdentityPolicy, StringMatcher};
use crate::verify::VerifierConfig;
use serde::{Deserialize, Serialize};
use sigcheck_types::HashAlgorithm;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the settings file
pub const CONFIG_ENV: &str = "SIGCHECK_CONFIG";
/// Environment variable naming the trusted root file, over the settings file
pub const TRUSTED_ROOT_ENV: &str = "SIGCHECK_TRUSTED_ROOT";

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Trusted root JSON file
    pub trusted_root: Option<PathBuf>,
    pub policy: PolicySettings,
    pub verification: VerifierConfig,
}

/// The identity and digest requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicySettings {
    pub san: MatcherSettings,
    pub issuer: MatcherSettings,
    pub digest_algorithm: String,
    /// Required extension values, keyed by Fulcio name or dotted OID
    pub extensions: BTreeMap<String, String>,
}

/// A matcher as written in the file; exactly one field must be set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatcherSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

impl MatcherSettings {
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            literal: Some(value.into()),
            regex: None,
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            literal: None,
            regex: Some(pattern.into()),
        }
    }

    pub fn to_matcher(&self) -> Result<StringMatcher> {
        StringMatcher::new(
            self.literal.as_deref().unwrap_or_default(),
            self.regex.as_deref().unwrap_or_default(),
        )
    }
}

impl Default for PolicySettings {
    fn default() -> Self {
        let extensions = [
            ("BuildTrigger", "release"),
            (
                "SourceRepositoryURI",
                "https://github.com/Fabulously-Optimized/fabulously-optimized",
            ),
            ("RunnerEnvironment", "github-hosted"),
            ("SourceRepositoryVisibilityAtSigning", "public"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            san: MatcherSettings::regex("^https://github.com/Fabulously-Optimized/fabulously-optimized/"),
            issuer: MatcherSettings::literal("https://token.actions.githubusercontent.com"),
            digest_algorithm: HashAlgorithm::Sha2_256.as_str().to_string(),
            extensions,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(text).map_err(|e| Error::InvalidPolicyConfig(e.to_string()))?;
        if settings.verification.clock_skew_seconds < 0 {
            return Err(Error::InvalidPolicyConfig(format!(
                "clock_skew_seconds must not be negative, got {}",
                settings.verification.clock_skew_seconds
            )));
        }
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidPolicyConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        tracing::debug!("loaded settings from {}", path.display());
        Self::from_toml(&text)
    }

    /// Settings from the file at `config`, or the defaults without one
    ///
    /// A `trusted_root` given here wins over the file's.
    pub fn resolve(config: Option<&Path>, trusted_root: Option<PathBuf>) -> Result<Self> {
        let mut settings = match config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if trusted_root.is_some() {
            settings.trusted_root = trusted_root;
        }
        Ok(settings)
    }

    /// Settings named by [`CONFIG_ENV`] and [`TRUSTED_ROOT_ENV`]
    pub fn from_env() -> Result<Self> {
        let config = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let trusted_root = std::env::var_os(TRUSTED_ROOT_ENV).map(PathBuf::from);
        Self::resolve(config.as_deref(), trusted_root)
    }

    /// The digest algorithm artifacts are checked with
    pub fn artifact_algorithm(&self) -> Result<HashAlgorithm> {
        self.policy
            .digest_algorithm
            .parse()
            .map_err(|_| {
                Error::InvalidPolicyConfig(format!(
                    "unsupported digest algorithm {:?}",
                    self.policy.digest_algorithm
                ))
            })
    }

    /// Build the identity policy
    pub fn identity_policy(&self) -> Result<IdentityPolicy> {
        let mut identity = CertificateIdentityPolicy::new(
            self.policy.san.to_matcher()?,
            self.policy.issuer.to_matcher()?,
        );
        for (key, value) in &self.policy.extensions {
            identity = identity.with_extension(key, value.clone())?;
        }
        Ok(identity.into())
    }
}
