use std::path::{Path, PathBuf};

use serde::Deserialize;

use marquee_model::ContentKind;

use crate::error::{PipelineError, Result};

/// Tuning knobs for the aggregation pipeline.
///
/// All fields have working defaults so a config file only needs to spell
/// out what it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Kinds covered by `refresh_all`.
    pub include_kinds: Vec<ContentKind>,
    /// Emit the persisted snapshot before any network activity.
    pub cache_first: bool,
    /// Entries with a year below this are dropped; 0 disables the floor.
    pub min_year: u32,
    /// Snapshot length cap.
    pub max_results: usize,
    /// Maximum concurrent outstanding metadata lookups.
    pub lookup_concurrency: usize,
    /// Keep only catalog records whose container extension contains this
    /// substring. `None` keeps everything.
    pub container_filter: Option<String>,
    /// Root directory for the persistent metadata and snapshot stores.
    pub store_root: PathBuf,
    pub catalog: CatalogConfig,
    pub metadata: MetadataConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            include_kinds: vec![ContentKind::Movie],
            cache_first: true,
            min_year: 0,
            max_results: 20,
            lookup_concurrency: 4,
            container_filter: None,
            store_root: PathBuf::from("marquee-cache"),
            catalog: CatalogConfig::default(),
            metadata: MetadataConfig::default(),
        }
    }
}

/// Listing-service endpoint and credentials.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

// Credentials stay out of logs.
impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Metadata-service credentials.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub api_key: String,
}

impl std::fmt::Debug for MetadataConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataConfig").finish_non_exhaustive()
    }
}

impl PipelineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| PipelineError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&raw)?)
    }
}
