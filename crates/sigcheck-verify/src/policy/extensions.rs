//! Fulcio certificate extensions
//!
//! Fulcio records facts about the OIDC token in extensions under
//! 1.3.6.1.4.1.57264.1. Arcs .1 to .6 are the deprecated GitHub-specific
//! extensions whose value is the raw string; later arcs hold a DER
//! UTF8String.

use crate::error::{Error, Result};
use const_oid::ObjectIdentifier;

/// The Fulcio extension arc
pub const FULCIO_ARC: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1");

/// Known Fulcio extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FulcioExtension {
    Issuer,
    GithubWorkflowTrigger,
    GithubWorkflowSha,
    GithubWorkflowName,
    GithubWorkflowRepository,
    GithubWorkflowRef,
    OtherName,
    IssuerV2,
    BuildSignerUri,
    BuildSignerDigest,
    RunnerEnvironment,
    SourceRepositoryUri,
    SourceRepositoryDigest,
    SourceRepositoryRef,
    SourceRepositoryIdentifier,
    SourceRepositoryOwnerUri,
    SourceRepositoryOwnerIdentifier,
    BuildConfigUri,
    BuildConfigDigest,
    BuildTrigger,
    RunInvocationUri,
    SourceRepositoryVisibilityAtSigning,
}

const EXTENSIONS: [(FulcioExtension, &str, ObjectIdentifier); 22] = [
    (FulcioExtension::Issuer, "Issuer", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.1")),
    (FulcioExtension::GithubWorkflowTrigger, "GithubWorkflowTrigger", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.2")),
    (FulcioExtension::GithubWorkflowSha, "GithubWorkflowSHA", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.3")),
    (FulcioExtension::GithubWorkflowName, "GithubWorkflowName", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.4")),
    (FulcioExtension::GithubWorkflowRepository, "GithubWorkflowRepository", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.5")),
    (FulcioExtension::GithubWorkflowRef, "GithubWorkflowRef", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.6")),
    (FulcioExtension::OtherName, "OtherName", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.7")),
    (FulcioExtension::IssuerV2, "IssuerV2", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.8")),
    (FulcioExtension::BuildSignerUri, "BuildSignerURI", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.9")),
    (FulcioExtension::BuildSignerDigest, "BuildSignerDigest", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.10")),
    (FulcioExtension::RunnerEnvironment, "RunnerEnvironment", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.11")),
    (FulcioExtension::SourceRepositoryUri, "SourceRepositoryURI", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.12")),
    (FulcioExtension::SourceRepositoryDigest, "SourceRepositoryDigest", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.13")),
    (FulcioExtension::SourceRepositoryRef, "SourceRepositoryRef", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.14")),
    (FulcioExtension::SourceRepositoryIdentifier, "SourceRepositoryIdentifier", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.15")),
    (FulcioExtension::SourceRepositoryOwnerUri, "SourceRepositoryOwnerURI", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.16")),
    (FulcioExtension::SourceRepositoryOwnerIdentifier, "SourceRepositoryOwnerIdentifier", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.17")),
    (FulcioExtension::BuildConfigUri, "BuildConfigURI", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.18")),
    (FulcioExtension::BuildConfigDigest, "BuildConfigDigest", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.19")),
    (FulcioExtension::BuildTrigger, "BuildTrigger", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.20")),
    (FulcioExtension::RunInvocationUri, "RunInvocationURI", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.21")),
    (FulcioExtension::SourceRepositoryVisibilityAtSigning, "SourceRepositoryVisibilityAtSigning", ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.22")),
];

impl FulcioExtension {
    pub fn oid(&self) -> ObjectIdentifier {
        self.entry().2
    }

    /// The name Fulcio documents for this extension
    pub fn name(&self) -> &'static str {
        self.entry().1
    }

    /// Look up by documented name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(_, n, _)| n.eq_ignore_ascii_case(name))
            .map(|(ext, _, _)| *ext)
    }

    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(_, _, o)| o == oid)
            .map(|(ext, _, _)| *ext)
    }

    /// Whether the value is stored as a raw string instead of DER
    pub fn is_legacy(&self) -> bool {
        matches!(
            self,
            FulcioExtension::Issuer
                | FulcioExtension::GithubWorkflowTrigger
                | FulcioExtension::GithubWorkflowSha
                | FulcioExtension::GithubWorkflowName
                | FulcioExtension::GithubWorkflowRepository
                | FulcioExtension::GithubWorkflowRef
        )
    }

    fn entry(&self) -> &'static (FulcioExtension, &'static str, ObjectIdentifier) {
        // Every variant has exactly one row.
        EXTENSIONS
            .iter()
            .find(|(ext, _, _)| ext == self)
            .unwrap_or(&EXTENSIONS[0])
    }
}

/// Whether `oid` lies directly under the Fulcio arc
pub fn is_fulcio_oid(oid: &ObjectIdentifier) -> bool {
    oid.parent() == Some(FULCIO_ARC)
}

/// Resolve a policy extension key: a Fulcio name or a dotted OID under the
/// Fulcio arc
pub fn parse_extension_key(key: &str) -> Result<ObjectIdentifier> {
    if let Some(ext) = FulcioExtension::from_name(key) {
        return Ok(ext.oid());
    }
    let oid = ObjectIdentifier::new(key).map_err(|_| {
        Error::InvalidPolicyConfig(format!("unknown certificate extension {key:?}"))
    })?;
    if !is_fulcio_oid(&oid) {
        return Err(Error::InvalidPolicyConfig(format!(
            "extension {oid} is not a Fulcio extension"
        )));
    }
    Ok(oid)
}

/// Decode the value of a Fulcio extension to a string
///
/// Legacy extensions hold the raw string. Later ones must hold a DER
/// UTF8String; anything else yields `None`.
pub fn decode_extension_value(oid: &ObjectIdentifier, value: &[u8]) -> Option<String> {
    let legacy = FulcioExtension::from_oid(oid).is_some_and(|e| e.is_legacy());
    if legacy {
        return std::str::from_utf8(value).ok().map(str::to_string);
    }
    <der::asn1::Utf8StringRef<'_> as der::Decode>::from_der(value)
        .ok()
        .map(|s| s.to_string())
}
