use marquee_model::{ContentKind, ResultSnapshot};

use super::StoreRoot;
use crate::error::Result;

/// Persistent last-good snapshot per content kind, read on cold start so
/// the screen has something to render before any network call completes.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: StoreRoot,
}

impl SnapshotStore {
    pub fn new(root: StoreRoot) -> Self {
        Self { root }
    }

    fn key_for(kind: ContentKind) -> String {
        format!("recents/v1/{}", kind.as_str())
    }

    /// Load the persisted snapshot. Failures degrade to `None` (cold
    /// start).
    pub async fn load(&self, kind: ContentKind) -> Option<ResultSnapshot> {
        let key = Self::key_for(kind);
        let bytes = match cacache::read(self.root.as_path(), &key).await {
            Ok(bytes) => bytes,
            Err(cacache::Error::EntryNotFound(_, _)) => return None,
            Err(err) => {
                tracing::warn!("snapshot cache read failed: key={}, err={}", key, err);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!("snapshot cache entry undecodable: key={}, err={}", key, err);
                None
            }
        }
    }

    /// Replace the prior snapshot wholesale.
    pub async fn save(&self, snapshot: &ResultSnapshot) -> Result<()> {
        let key = Self::key_for(snapshot.kind);
        let bytes = serde_json::to_vec(snapshot)
            .map_err(|e| crate::error::PipelineError::Parse(e.to_string()))?;
        cacache::write(self.root.as_path(), &key, bytes).await?;
        Ok(())
    }
}
