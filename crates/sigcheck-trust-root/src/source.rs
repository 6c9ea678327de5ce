//! Where trust material comes from
//!
//! Fetching and refreshing trust metadata is someone else's job. This module
//! only defines the boundary and the two local sources used by the adapters.

use crate::{Result, TrustedRootMaterial};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Produces trust material snapshots
pub trait TrustMaterialSource: Send + Sync {
    /// Load a fresh, validated snapshot
    fn load(&self) -> Result<TrustedRootMaterial>;
}

/// A trusted root JSON file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrustMaterialSource for FileSource {
    fn load(&self) -> Result<TrustedRootMaterial> {
        tracing::debug!("loading trusted root from {}", self.path.display());
        TrustedRootMaterial::from_file(&self.path)
    }
}

/// An already built snapshot
#[derive(Debug, Clone)]
pub struct StaticSource {
    material: TrustedRootMaterial,
}

impl StaticSource {
    pub fn new(material: TrustedRootMaterial) -> Self {
        Self { material }
    }
}

impl TrustMaterialSource for StaticSource {
    fn load(&self) -> Result<TrustedRootMaterial> {
        Ok(self.material.clone())
    }
}

/// The current snapshot, shared between verifications
///
/// Readers take an `Arc` to the snapshot and keep using it even if a refresh
/// swaps in a newer one meanwhile.
#[derive(Debug)]
pub struct SharedTrustMaterial {
    current: RwLock<Arc<TrustedRootMaterial>>,
}

impl SharedTrustMaterial {
    pub fn new(material: TrustedRootMaterial) -> Self {
        Self {
            current: RwLock::new(Arc::new(material)),
        }
    }

    /// Build from the first load of `source`
    pub fn load(source: &dyn TrustMaterialSource) -> Result<Self> {
        Ok(Self::new(source.load()?))
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<TrustedRootMaterial> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Load a new snapshot from `source` and swap it in
    ///
    /// On error the current snapshot is kept.
    pub fn refresh(&self, source: &dyn TrustMaterialSource) -> Result<()> {
        let fresh = Arc::new(source.load()?);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = fresh;
        Ok(())
    }
}
