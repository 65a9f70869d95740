//! Hand-rolled provider fakes shared by the behaviour tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use marquee_core::error::{PipelineError, Result};
use marquee_core::providers::{CatalogProvider, MetadataProvider};
use marquee_model::{CatalogEntry, ContentKind, MetadataResult};

pub fn movie(id: u32, name: &str, server_year: u32) -> CatalogEntry {
    CatalogEntry {
        external_id: id,
        kind: ContentKind::Movie,
        display_name: name.to_string(),
        fallback_icon_url: format!("http://icons/{id}.png"),
        container_extension: "mp4".to_string(),
        server_year,
        last_modified_epoch: 0,
    }
}

/// One scripted reply per expected `fetch` call, consumed in order.
pub enum CatalogCall {
    Reply(Vec<CatalogEntry>),
    Fail,
    /// Block on the gate before replying, so a test can hold a run
    /// in-flight while triggering a newer one.
    WaitThenReply(Arc<Notify>, Vec<CatalogEntry>),
}

pub struct ScriptedCatalog {
    script: Mutex<VecDeque<CatalogCall>>,
    pub calls: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn new(script: Vec<CatalogCall>) -> Arc<Self> {
        Arc::new(ScriptedCatalog {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CatalogProvider for ScriptedCatalog {
    async fn fetch(&self, _kind: ContentKind) -> Result<Vec<CatalogEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let call = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected catalog fetch");
        match call {
            CatalogCall::Reply(entries) => Ok(entries),
            CatalogCall::Fail => Err(PipelineError::Status(reqwest::StatusCode::BAD_GATEWAY)),
            CatalogCall::WaitThenReply(gate, entries) => {
                gate.notified().await;
                Ok(entries)
            }
        }
    }
}

/// Title → result metadata fake with call recording and an in-flight
/// high-water mark for concurrency assertions.
#[derive(Default)]
pub struct ScriptedMetadata {
    by_title: HashMap<String, MetadataResult>,
    fail_titles: HashSet<String>,
    pub delay: Option<Duration>,
    pub calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, title: &str, year: u32, poster: &str) -> Self {
        self.by_title.insert(
            title.to_string(),
            MetadataResult {
                resolved_year: year,
                poster_url: poster.to_string(),
            },
        );
        self
    }

    pub fn with_failure(mut self, title: &str) -> Self {
        self.fail_titles.insert(title.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls_for(&self, title: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.as_str() == title)
            .count()
    }
}

#[async_trait]
impl MetadataProvider for ScriptedMetadata {
    async fn lookup(&self, _kind: ContentKind, title: &str) -> Result<MetadataResult> {
        self.calls.lock().unwrap().push(title.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_titles.contains(title) {
            return Err(PipelineError::Status(reqwest::StatusCode::BAD_GATEWAY));
        }
        Ok(self.by_title.get(title).cloned().unwrap_or_default())
    }
}
