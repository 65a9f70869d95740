//! Core library for the Marquee recent-content pipeline.
//!
//! Turns a raw remote catalog listing into a ranked, enriched, cached list
//! suitable for instant display: fetch the listing, enrich each title with
//! metadata through a write-once per-title cache, filter/rank/cap, persist
//! the merged snapshot, and emit it to the consumer. A newer refresh
//! supersedes and cancels any in-flight one.

pub mod config;
pub mod enrich;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod store;

pub use config::PipelineConfig;
pub use enrich::Enricher;
pub use error::{PipelineError, Result};
pub use pipeline::AggregationPipeline;
