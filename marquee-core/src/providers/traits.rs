use async_trait::async_trait;

use marquee_model::{CatalogEntry, ContentKind, MetadataResult};

use crate::error::Result;

/// Fetches the raw remote listing for one content kind.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the full listing. Records of a different kind are dropped by
    /// the implementation; failures propagate as a single error.
    async fn fetch(&self, kind: ContentKind) -> Result<Vec<CatalogEntry>>;
}

/// Looks up descriptive metadata (year, poster) for a single title.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search by title and return the first candidate's year and poster.
    ///
    /// An absent year or poster comes back as the zero value inside an
    /// `Ok`; transport and parse failures are errors for the caller to
    /// degrade on.
    async fn lookup(&self, kind: ContentKind, title: &str) -> Result<MetadataResult>;
}
