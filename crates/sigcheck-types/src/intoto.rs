//! in-toto statements carried in DSSE payloads

use crate::error::Result;
use crate::hash::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Subject digests keyed by algorithm name ("sha256") with hex values
pub type Digest = BTreeMap<String, String>;

/// An in-toto statement (v0.1 or v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    #[serde(rename = "_type")]
    pub type_: String,
    pub subject: Vec<Subject>,
    pub predicate_type: String,
    #[serde(default)]
    pub predicate: serde_json::Value,
}

/// A statement subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default)]
    pub name: String,
    pub digest: Digest,
}

impl Statement {
    /// Parse a statement from a DSSE payload
    pub fn from_slice(payload: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Hex digests of every subject for the given algorithm
    pub fn subject_digests(&self, algorithm: HashAlgorithm) -> impl Iterator<Item = &str> {
        self.subject
            .iter()
            .filter_map(move |s| s.digest.get(algorithm.as_str()).map(String::as_str))
    }
}
