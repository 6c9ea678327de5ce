//! Verification policy: which artifact, signed by whom

pub mod artifact;
pub mod extensions;
pub mod identity;
pub mod matcher;

pub use artifact::{ArtifactPolicy, Policy};
pub use extensions::{decode_extension_value, parse_extension_key, FulcioExtension, FULCIO_ARC};
pub use identity::{CertificateIdentityPolicy, CertificateSummary, IdentityPolicy};
pub use matcher::StringMatcher;
