use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use marquee_core::providers::{TmdbLookup, XtreamCatalog};
use marquee_core::{AggregationPipeline, PipelineConfig};

/// Minimal driver: load a TOML config, run one refresh pass for every
/// configured kind, and print snapshots as they arrive.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "marquee.toml".to_string());
    let config = PipelineConfig::load(Path::new(&path))
        .with_context(|| format!("loading config from {path}"))?;

    let client = Arc::new(reqwest::Client::new());
    let catalog = Arc::new(XtreamCatalog::new(&config.catalog, Arc::clone(&client)));
    let metadata = Arc::new(TmdbLookup::new(&config.metadata, client));
    let pipeline = AggregationPipeline::new(config, catalog, metadata);

    let mut events = pipeline.subscribe();
    pipeline.refresh_all();

    // One snapshot per kind from cache plus one fresh each; stop once the
    // stream goes quiet.
    loop {
        match tokio::time::timeout(Duration::from_secs(30), events.recv()).await {
            Ok(Ok(snapshot)) => {
                println!("{} ({} entries)", snapshot.kind, snapshot.len());
                for entry in &snapshot.entries {
                    println!("  {:>4}  {}", entry.year, entry.title);
                }
            }
            Ok(Err(_)) | Err(_) => break,
        }
    }

    pipeline.dispose();
    Ok(())
}
