//! Certificate identity policy

use super::extensions::{decode_extension_value, is_fulcio_oid, parse_extension_key, FulcioExtension};
use super::matcher::StringMatcher;
use crate::error::Result;
use const_oid::ObjectIdentifier;
use std::collections::BTreeMap;
use x509_cert::ext::pkix::{name::GeneralName, SubjectAltName};
use x509_cert::Certificate;

/// The identity fields of a signing certificate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateSummary {
    /// First URI or email subject alternative name
    pub subject_alternative_name: Option<String>,
    /// OIDC issuer, from IssuerV2 or the legacy Issuer extension
    pub issuer: Option<String>,
    /// Every decodable extension under the Fulcio arc
    pub extensions: BTreeMap<ObjectIdentifier, String>,
}

impl CertificateSummary {
    /// Collect the identity fields of `cert`
    ///
    /// Fields that are missing or cannot be decoded are left out.
    pub fn from_certificate(cert: &Certificate) -> Self {
        let tbs = &cert.tbs_certificate;

        let mut subject_alternative_name = None;
        if let Ok(Some((_, san))) = tbs.get::<SubjectAltName>() {
            subject_alternative_name = san.0.iter().find_map(|name| match name {
                GeneralName::UniformResourceIdentifier(uri) => Some(uri.as_str().to_string()),
                GeneralName::Rfc822Name(email) => Some(email.as_str().to_string()),
                _ => None,
            });
        }

        let mut extensions = BTreeMap::new();
        for ext in tbs.extensions.as_deref().unwrap_or(&[]) {
            if !is_fulcio_oid(&ext.extn_id) {
                continue;
            }
            if let Some(value) = decode_extension_value(&ext.extn_id, ext.extn_value.as_bytes()) {
                extensions.insert(ext.extn_id, value);
            }
        }

        let issuer = extensions
            .get(&FulcioExtension::IssuerV2.oid())
            .or_else(|| extensions.get(&FulcioExtension::Issuer.oid()))
            .cloned();

        Self {
            subject_alternative_name,
            issuer,
            extensions,
        }
    }

    /// Value of a known extension
    pub fn extension(&self, ext: FulcioExtension) -> Option<&str> {
        self.extensions.get(&ext.oid()).map(String::as_str)
    }
}

/// One acceptable signer identity
#[derive(Debug, Clone)]
pub struct CertificateIdentityPolicy {
    san: StringMatcher,
    issuer: StringMatcher,
    extensions: BTreeMap<ObjectIdentifier, String>,
}

impl CertificateIdentityPolicy {
    pub fn new(san: StringMatcher, issuer: StringMatcher) -> Self {
        Self {
            san,
            issuer,
            extensions: BTreeMap::new(),
        }
    }

    /// Require an extension, named or given as a dotted OID, to equal `value`
    pub fn with_extension(mut self, key: &str, value: impl Into<String>) -> Result<Self> {
        let oid = parse_extension_key(key)?;
        self.extensions.insert(oid, value.into());
        Ok(self)
    }

    pub fn san(&self) -> &StringMatcher {
        &self.san
    }

    pub fn issuer(&self) -> &StringMatcher {
        &self.issuer
    }

    pub fn required_extensions(&self) -> &BTreeMap<ObjectIdentifier, String> {
        &self.extensions
    }

    /// Whether the certificate satisfies every requirement
    pub fn evaluate(&self, summary: &CertificateSummary) -> bool {
        self.mismatch_reason(summary).is_none()
    }

    /// The first requirement `summary` fails, if any
    pub fn mismatch_reason(&self, summary: &CertificateSummary) -> Option<String> {
        match summary.subject_alternative_name.as_deref() {
            Some(san) if self.san.matches(san) => {}
            Some(san) => return Some(format!("SAN {san:?} does not match {}", self.san)),
            None => return Some("certificate has no SAN".to_string()),
        }

        match summary.issuer.as_deref() {
            Some(issuer) if self.issuer.matches(issuer) => {}
            Some(issuer) => {
                return Some(format!("issuer {issuer:?} does not match {}", self.issuer))
            }
            None => return Some("certificate has no issuer extension".to_string()),
        }

        for (oid, expected) in &self.extensions {
            let name = FulcioExtension::from_oid(oid)
                .map(|e| e.name().to_string())
                .unwrap_or_else(|| oid.to_string());
            match summary.extensions.get(oid) {
                Some(actual) if actual == expected => {}
                Some(actual) => {
                    return Some(format!("{name} is {actual:?}, expected {expected:?}"))
                }
                None => return Some(format!("certificate has no {name} extension")),
            }
        }

        None
    }
}

/// A set of acceptable identities; any one suffices
#[derive(Debug, Clone)]
pub struct IdentityPolicy {
    identities: Vec<CertificateIdentityPolicy>,
}

impl IdentityPolicy {
    pub fn new(identities: Vec<CertificateIdentityPolicy>) -> Self {
        Self { identities }
    }

    pub fn identities(&self) -> &[CertificateIdentityPolicy] {
        &self.identities
    }

    pub fn evaluate(&self, summary: &CertificateSummary) -> bool {
        self.identities.iter().any(|i| i.evaluate(summary))
    }

    /// Why no identity matched; `None` if one did
    pub fn mismatch_reason(&self, summary: &CertificateSummary) -> Option<String> {
        let mut reasons = Vec::with_capacity(self.identities.len());
        for identity in &self.identities {
            match identity.mismatch_reason(summary) {
                None => return None,
                Some(reason) => reasons.push(reason),
            }
        }
        if reasons.is_empty() {
            return Some("no identities are configured".to_string());
        }
        Some(reasons.join("; "))
    }
}

impl From<CertificateIdentityPolicy> for IdentityPolicy {
    fn from(identity: CertificateIdentityPolicy) -> Self {
        Self::new(vec![identity])
    }
}
