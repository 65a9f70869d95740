//! Persistent stores backing the pipeline: a write-once per-title metadata
//! cache and a last-good snapshot store, both thin typed wrappers over a
//! shared `cacache` root.

use std::fmt;
use std::path::{Path, PathBuf};

pub mod metadata_store;
pub mod snapshot_store;

pub use metadata_store::MetadataStore;
pub use snapshot_store::SnapshotStore;

/// Root directory for the on-disk stores.
///
/// A dedicated directory that `cacache` manages internally (index +
/// content-addressed blobs).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StoreRoot(PathBuf);

impl StoreRoot {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Debug for StoreRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StoreRoot").field(&self.0).finish()
    }
}
