//! Bundle loading for sigcheck
//!
//! This crate turns a Sigstore bundle file into a [`SignedBundle`]: the
//! JSON decoded, the version-specific structure checked, the signing
//! certificate parsed and its embedded SCTs extracted. Nothing is verified
//! cryptographically here; that is the job of `sigcheck-verify`.
//!
//! # Example
//!
//! ```no_run
//! let bundle = sigcheck_bundle::load("artifact.sigstore.json")?;
//! println!("{} SCTs", bundle.scts().len());
//! # Ok::<(), sigcheck_bundle::Error>(())
//! ```

pub mod error;
pub mod loader;
pub mod sct;
pub mod signed;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_data;

pub use error::{Error, Result};
pub use loader::{from_bundle, from_bundle_with_options, from_json, from_slice, load};
pub use sct::{embedded_scts, EmbeddedSct};
pub use signed::{LeafCertificate, SignedBundle, SignedContent};
pub use validation::{validate_bundle, validate_bundle_with_options, ValidationOptions};
