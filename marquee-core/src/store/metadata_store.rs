use marquee_model::{Fingerprint, MetadataResult};

use super::StoreRoot;
use crate::error::Result;

/// Persistent fingerprint → metadata mapping.
///
/// Entries never expire: once a lookup resolved, it is treated as stable
/// ground truth and a hit skips the network entirely. The write-once rule
/// is enforced by the enricher (it only writes after a miss); the store
/// itself is a plain key-value surface with no network awareness.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    root: StoreRoot,
}

impl MetadataStore {
    pub fn new(root: StoreRoot) -> Self {
        Self { root }
    }

    fn key_for(fingerprint: &Fingerprint) -> String {
        format!("metadata/v1/{}", fingerprint.storage_key())
    }

    /// Read a cached result. Any storage or decode failure degrades to
    /// `None` (a cold lookup), it never fails the caller.
    pub async fn get(&self, fingerprint: &Fingerprint) -> Option<MetadataResult> {
        let key = Self::key_for(fingerprint);
        let bytes = match cacache::read(self.root.as_path(), &key).await {
            Ok(bytes) => bytes,
            Err(cacache::Error::EntryNotFound(_, _)) => return None,
            Err(err) => {
                tracing::warn!("metadata cache read failed: key={}, err={}", key, err);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(result) => Some(result),
            Err(err) => {
                tracing::warn!("metadata cache entry undecodable: key={}, err={}", key, err);
                None
            }
        }
    }

    pub async fn put(&self, fingerprint: &Fingerprint, result: &MetadataResult) -> Result<()> {
        let key = Self::key_for(fingerprint);
        let bytes = serde_json::to_vec(result)
            .map_err(|e| crate::error::PipelineError::Parse(e.to_string()))?;
        cacache::write(self.root.as_path(), &key, bytes).await?;
        Ok(())
    }
}
