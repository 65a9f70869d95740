use serde::{Deserialize, Serialize};

use crate::kind::ContentKind;

/// Raw record from the listing service, produced fresh on every fetch.
///
/// Never persisted standalone; it only exists between the catalog fetch and
/// the enrichment merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub external_id: u32,
    pub kind: ContentKind,
    pub display_name: String,
    /// Icon/cover URL supplied by the listing service, possibly empty.
    pub fallback_icon_url: String,
    pub container_extension: String,
    /// Year as reported by the listing service, 0 when unknown.
    pub server_year: u32,
    /// Upstream "last modified"/"added" timestamp, 0 when unknown.
    pub last_modified_epoch: i64,
}

impl CatalogEntry {
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            kind: self.kind,
            external_id: self.external_id,
        }
    }
}

/// Resolved descriptive metadata for a single title.
///
/// A zero value (`resolved_year == 0`, empty poster) means "unknown", not an
/// error; the enricher falls back to the catalog-supplied fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataResult {
    pub resolved_year: u32,
    pub poster_url: String,
}

impl MetadataResult {
    /// Whether this result carries a usable year and should be cached.
    pub fn has_year(&self) -> bool {
        self.resolved_year > 0
    }
}

/// Stable identity key used for cache lookups and deduplication.
///
/// Uniqueness is structural: no two records of the same kind share an id
/// within one catalog response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub kind: ContentKind,
    pub external_id: u32,
}

impl Fingerprint {
    /// The `{kind}:{externalId}` form used as the persistent cache key.
    pub fn storage_key(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.external_id)
    }
}

/// Merged, user-facing entry. Constructed once per enrichment pass and
/// superseded wholesale by the next successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub external_id: u32,
    pub kind: ContentKind,
    pub title: String,
    pub poster_url: String,
    pub year: u32,
    pub extension: String,
}

impl RecentEntry {
    /// Merge a catalog record with its resolved metadata.
    ///
    /// The metadata year wins when known, else the server year; the metadata
    /// poster wins when non-empty, else the listing icon.
    pub fn merged(catalog: &CatalogEntry, metadata: &MetadataResult) -> Self {
        let year = if metadata.resolved_year > 0 {
            metadata.resolved_year
        } else {
            catalog.server_year
        };
        let poster_url = if metadata.poster_url.is_empty() {
            catalog.fallback_icon_url.clone()
        } else {
            metadata.poster_url.clone()
        };
        RecentEntry {
            external_id: catalog.external_id,
            kind: catalog.kind,
            title: catalog.display_name.clone(),
            poster_url,
            year,
            extension: catalog.container_extension.clone(),
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            kind: self.kind,
            external_id: self.external_id,
        }
    }
}
