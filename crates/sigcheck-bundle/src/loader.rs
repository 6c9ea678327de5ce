//! Bundle loading
//!
//! Turns a bundle file into a [`SignedBundle`]: the leaf certificate parsed,
//! the signed content selected, SCTs extracted, and the media-type rules
//! checked. No signature or proof is verified here.

use crate::error::{Error, Result};
use crate::sct::embedded_scts;
use crate::signed::{LeafCertificate, SignedBundle, SignedContent};
use crate::validation::{validate_bundle_with_options, ValidationOptions};
use sigcheck_types::{Bundle, BundleContent, DerCertificate, VerificationMaterialContent};
use std::path::Path;

/// Load and parse a bundle file
pub fn load(path: impl AsRef<Path>) -> Result<SignedBundle> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("read bundle {} ({} bytes)", path.display(), bytes.len());
    from_slice(&bytes)
}

/// Parse a bundle from JSON text
pub fn from_json(json: &str) -> Result<SignedBundle> {
    from_slice(json.as_bytes())
}

/// Parse a bundle from JSON bytes
pub fn from_slice(bytes: &[u8]) -> Result<SignedBundle> {
    let bundle = Bundle::from_slice(bytes)?;
    from_bundle(&bundle)
}

/// Extract the verifiable parts of an already decoded bundle
pub fn from_bundle(bundle: &Bundle) -> Result<SignedBundle> {
    from_bundle_with_options(bundle, &ValidationOptions::default())
}

/// Like [`from_bundle`], with stricter structural requirements
pub fn from_bundle_with_options(
    bundle: &Bundle,
    options: &ValidationOptions,
) -> Result<SignedBundle> {
    let media_type = validate_bundle_with_options(bundle, options)?;

    let (leaf_der, chain) = match bundle.verification_material.content()? {
        VerificationMaterialContent::Certificate(cert) => (cert.raw_bytes.clone(), Vec::new()),
        VerificationMaterialContent::X509CertificateChain(chain) => {
            let mut certs = chain.certificates.iter().map(|c| c.raw_bytes.clone());
            let leaf = certs
                .next()
                .ok_or_else(|| Error::parse("certificate chain is empty"))?;
            (leaf, certs.collect::<Vec<DerCertificate>>())
        }
        VerificationMaterialContent::PublicKey(_) => {
            return Err(Error::parse(
                "bundle has no signing certificate (public-key bundles are not supported)",
            ))
        }
    };

    let certificate = sigcheck_crypto::parse_certificate(leaf_der.as_bytes())
        .map_err(|e| Error::parse(format!("signing certificate: {e}")))?;
    let scts = embedded_scts(&certificate)?;

    let content = match bundle.content()? {
        BundleContent::MessageSignature(sig) => {
            if sig.signature.is_empty() {
                return Err(Error::parse("message signature is empty"));
            }
            SignedContent::MessageSignature(sig.clone())
        }
        BundleContent::DsseEnvelope(env) => {
            if env.signatures.is_empty() || env.signatures.iter().any(|s| s.sig.is_empty()) {
                return Err(Error::parse("DSSE envelope has no signature"));
            }
            SignedContent::DsseEnvelope(env.clone())
        }
    };

    Ok(SignedBundle {
        media_type,
        leaf: LeafCertificate {
            der: leaf_der,
            certificate,
        },
        chain,
        content,
        scts,
        tlog_entries: bundle.verification_material.tlog_entries.clone(),
        rfc3161_timestamps: bundle
            .rfc3161_timestamps()
            .iter()
            .map(|t| t.signed_timestamp.clone())
            .collect(),
    })
}
