use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex as AsyncMutex, broadcast};
use tokio_util::sync::CancellationToken;

use marquee_model::{ContentKind, ResultSnapshot};

use crate::config::PipelineConfig;
use crate::enrich::Enricher;
use crate::providers::{CatalogProvider, MetadataProvider};
use crate::store::{MetadataStore, SnapshotStore, StoreRoot};

/// Orchestrates one refresh end to end: emit the cached snapshot, fetch
/// the listing, enrich, filter/rank/cap, persist, emit the fresh snapshot.
///
/// A refresh for a kind supersedes any in-flight refresh of the same kind:
/// the old run's token is cancelled and its persist/emit tail is gated on
/// still being the newest run, so the consumer only ever observes
/// snapshots in non-decreasing request order.
pub struct AggregationPipeline {
    config: PipelineConfig,
    catalog: Arc<dyn CatalogProvider>,
    enricher: Enricher,
    snapshots: SnapshotStore,
    events: broadcast::Sender<ResultSnapshot>,
    runs: Mutex<HashMap<ContentKind, ActiveRun>>,
    next_generation: AtomicU64,
    // Serializes the persist+emit tail of every run; the generation check
    // inside it is what makes supersession watertight.
    emit_gate: AsyncMutex<()>,
}

struct ActiveRun {
    generation: u64,
    token: CancellationToken,
}

impl std::fmt::Debug for AggregationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationPipeline")
            .field("config", &self.config)
            .field("snapshots", &self.snapshots)
            .finish_non_exhaustive()
    }
}

impl AggregationPipeline {
    pub fn new(
        config: PipelineConfig,
        catalog: Arc<dyn CatalogProvider>,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Arc<Self> {
        let root = StoreRoot::new(config.store_root.clone());
        let metadata_store = Arc::new(MetadataStore::new(root.clone()));
        let snapshots = SnapshotStore::new(root);
        let enricher = Enricher::new(metadata, metadata_store, config.lookup_concurrency);
        let (events, _) = broadcast::channel(16);
        Arc::new(AggregationPipeline {
            config,
            catalog,
            enricher,
            snapshots,
            events,
            runs: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
            emit_gate: AsyncMutex::new(()),
        })
    }

    /// Subscribe to snapshot emissions. Each refresh delivers zero, one or
    /// two snapshots: the cached one (when present and cache-first is on)
    /// and the fresh one (unless the run failed or was superseded).
    pub fn subscribe(&self) -> broadcast::Receiver<ResultSnapshot> {
        self.events.subscribe()
    }

    /// Trigger a refresh run for one kind, superseding any in-flight run
    /// of the same kind.
    pub fn refresh(self: &Arc<Self>, kind: ContentKind) {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        {
            let mut runs = self.runs.lock().expect("runs lock poisoned");
            if let Some(previous) = runs.insert(
                kind,
                ActiveRun {
                    generation,
                    token: token.clone(),
                },
            ) {
                previous.token.cancel();
            }
        }

        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.run(kind, generation, token).await;
        });
    }

    /// Refresh every configured kind.
    pub fn refresh_all(self: &Arc<Self>) {
        for kind in self.config.include_kinds.clone() {
            self.refresh(kind);
        }
    }

    /// Cancel any in-flight runs and stop emitting. Superseded tasks drain
    /// on their own; nothing is awaited.
    pub fn dispose(&self) {
        let mut runs = self.runs.lock().expect("runs lock poisoned");
        for (_, run) in runs.drain() {
            run.token.cancel();
        }
    }

    async fn run(self: Arc<Self>, kind: ContentKind, generation: u64, token: CancellationToken) {
        tracing::debug!("refresh run started: kind={}, generation={}", kind, generation);

        if self.config.cache_first
            && let Some(cached) = self.snapshots.load(kind).await
            && !cached.is_empty()
        {
            let _gate = self.emit_gate.lock().await;
            if self.is_live(kind, generation, &token) {
                let _ = self.events.send(cached);
            }
        }

        if token.is_cancelled() {
            return;
        }

        let fetched = tokio::select! {
            _ = token.cancelled() => return,
            fetched = self.catalog.fetch(kind) => fetched,
        };
        let mut entries = match fetched {
            Ok(entries) => entries,
            Err(err) => {
                // Silent toward the consumer; the cache emit stays the
                // latest view.
                tracing::warn!("catalog fetch failed: kind={}, err={}", kind, err);
                return;
            }
        };

        if let Some(filter) = &self.config.container_filter {
            entries.retain(|e| e.container_extension.contains(filter.as_str()));
        }

        let enriched = self.enricher.enrich(entries, &token).await;
        if token.is_cancelled() {
            return;
        }

        let snapshot = ResultSnapshot::assemble(
            kind,
            enriched,
            self.config.min_year,
            self.config.max_results,
        );

        let _gate = self.emit_gate.lock().await;
        if !self.is_live(kind, generation, &token) {
            tracing::debug!(
                "refresh run superseded: kind={}, generation={}",
                kind,
                generation
            );
            return;
        }
        if let Err(err) = self.snapshots.save(&snapshot).await {
            // An unpersisted snapshot is still valid to show once, just
            // not on the next cold start.
            tracing::warn!("snapshot persist failed: kind={}, err={}", kind, err);
        }
        tracing::info!(
            "refresh run complete: kind={}, generation={}, entries={}",
            kind,
            generation,
            snapshot.len()
        );
        let _ = self.events.send(snapshot);
    }

    fn is_live(&self, kind: ContentKind, generation: u64, token: &CancellationToken) -> bool {
        if token.is_cancelled() {
            return false;
        }
        let runs = self.runs.lock().expect("runs lock poisoned");
        runs.get(&kind)
            .map(|run| run.generation == generation)
            .unwrap_or(false)
    }
}
