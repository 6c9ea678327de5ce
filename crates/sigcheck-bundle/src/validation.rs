//! Bundle validation
//!
//! Validates bundles according to version-specific rules. These checks are
//! structural only; proofs and signatures are left to the verifier.

use crate::error::{Error, Result};
use sigcheck_types::{Bundle, MediaType, VerificationMaterialContent};

/// Validation options
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// Require at least one transparency log entry
    pub require_tlog_entry: bool,
    /// Require an inclusion proof (not just a promise) on some entry
    pub require_inclusion_proof: bool,
    /// Require timestamp verification data
    pub require_timestamp: bool,
}

/// Validate a bundle with the default options
pub fn validate_bundle(bundle: &Bundle) -> Result<MediaType> {
    validate_bundle_with_options(bundle, &ValidationOptions::default())
}

/// Validate a bundle with custom options, returning its version
pub fn validate_bundle_with_options(
    bundle: &Bundle,
    options: &ValidationOptions,
) -> Result<MediaType> {
    let version = bundle
        .version()
        .map_err(|e| Error::Validation(format!("invalid media type: {}", e)))?;

    match version {
        MediaType::Bundle0_1 => validate_v0_1(bundle)?,
        MediaType::Bundle0_2 => {}
        MediaType::Bundle0_3 => validate_v0_3(bundle)?,
    }

    validate_common(bundle, options)?;
    Ok(version)
}

/// v0.1 bundles predate inclusion proofs, so every entry needs a promise
fn validate_v0_1(bundle: &Bundle) -> Result<()> {
    let entries = &bundle.verification_material.tlog_entries;
    if entries.iter().any(|e| e.inclusion_promise.is_none()) {
        return Err(Error::Validation(
            "v0.1 bundle must have inclusion promise".to_string(),
        ));
    }
    Ok(())
}

/// v0.3 bundles carry a single certificate, never a chain
fn validate_v0_3(bundle: &Bundle) -> Result<()> {
    if let Ok(VerificationMaterialContent::X509CertificateChain(_)) =
        bundle.verification_material.content()
    {
        return Err(Error::Validation(
            "v0.3 bundle must use single certificate, not chain".to_string(),
        ));
    }
    Ok(())
}

fn validate_common(bundle: &Bundle, options: &ValidationOptions) -> Result<()> {
    let vm = &bundle.verification_material;

    if options.require_tlog_entry && vm.tlog_entries.is_empty() {
        return Err(Error::Validation(
            "bundle must have at least one tlog entry".to_string(),
        ));
    }

    if options.require_inclusion_proof && !bundle.has_inclusion_proof() {
        return Err(Error::Validation(
            "bundle must have inclusion proof".to_string(),
        ));
    }

    if options.require_timestamp && bundle.rfc3161_timestamps().is_empty() {
        return Err(Error::Validation(
            "bundle must have timestamp verification data".to_string(),
        ));
    }

    for entry in &vm.tlog_entries {
        if entry.canonicalized_body.is_empty() {
            return Err(Error::Validation(format!(
                "tlog entry {} has an empty body",
                entry.log_index
            )));
        }
        if let Some(proof) = &entry.inclusion_proof {
            if proof.log_index < 0 || proof.tree_size <= proof.log_index {
                return Err(Error::Validation(format!(
                    "inclusion proof index {} is outside tree size {}",
                    proof.log_index, proof.tree_size
                )));
            }
        }
    }

    Ok(())
}
