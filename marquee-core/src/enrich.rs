use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use marquee_model::{CatalogEntry, MetadataResult, RecentEntry};

use crate::providers::MetadataProvider;
use crate::store::MetadataStore;

/// Combines catalog records with cached or freshly looked-up metadata.
///
/// Cache hits are authoritative and resolved without touching the network
/// or consuming a concurrency slot. Misses fan out through a bounded
/// lookup pool and fan back in before the caller proceeds; a cancelled run
/// stops dispatching new lookups at the next suspension point.
pub struct Enricher {
    metadata: Arc<dyn MetadataProvider>,
    cache: Arc<MetadataStore>,
    permits: Arc<Semaphore>,
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher")
            .field("cache", &self.cache)
            .field("permits", &self.permits)
            .finish_non_exhaustive()
    }
}

impl Enricher {
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        cache: Arc<MetadataStore>,
        lookup_concurrency: usize,
    ) -> Self {
        Enricher {
            metadata,
            cache,
            permits: Arc::new(Semaphore::new(lookup_concurrency.max(1))),
        }
    }

    /// Enrich every entry, preserving input order.
    ///
    /// Lookup failures degrade per item to the catalog-supplied fields;
    /// only non-zero-year results are written back to the cache, so a
    /// transient failure can be retried on a later run.
    pub async fn enrich(
        &self,
        entries: Vec<CatalogEntry>,
        token: &CancellationToken,
    ) -> Vec<RecentEntry> {
        futures::future::join_all(
            entries
                .into_iter()
                .map(|entry| self.enrich_one(entry, token)),
        )
        .await
    }

    async fn enrich_one(&self, entry: CatalogEntry, token: &CancellationToken) -> RecentEntry {
        let fingerprint = entry.fingerprint();
        if let Some(hit) = self.cache.get(&fingerprint).await {
            return RecentEntry::merged(&entry, &hit);
        }

        if token.is_cancelled() {
            return RecentEntry::merged(&entry, &MetadataResult::default());
        }

        let _permit = tokio::select! {
            _ = token.cancelled() => {
                return RecentEntry::merged(&entry, &MetadataResult::default());
            }
            permit = self.permits.acquire() => {
                permit.expect("semaphore should not be closed")
            }
        };

        let result = match self.metadata.lookup(entry.kind, &entry.display_name).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(
                    "metadata lookup failed: fingerprint={}, err={}",
                    fingerprint.storage_key(),
                    err
                );
                MetadataResult::default()
            }
        };

        // Zero-value results are not cached so the next run retries them.
        if result.has_year() && !token.is_cancelled() {
            if let Err(err) = self.cache.put(&fingerprint, &result).await {
                tracing::warn!(
                    "metadata cache write failed: fingerprint={}, err={}",
                    fingerprint.storage_key(),
                    err
                );
            }
        }

        RecentEntry::merged(&entry, &result)
    }
}
