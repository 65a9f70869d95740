use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use marquee_model::{CatalogEntry, ContentKind};

use super::traits::CatalogProvider;
use crate::config::CatalogConfig;
use crate::error::{PipelineError, Result};

/// Catalog client for an Xtream-codes style `player_api.php` listing
/// service.
///
/// The upstream is loosely typed: ids and years arrive as numbers or
/// strings depending on the panel, titles may live under `title` or
/// `name`, and one response can mix record types. Everything lenient
/// happens in [`entry_from_record`]; the HTTP layer itself is strict.
pub struct XtreamCatalog {
    base_url: String,
    username: String,
    password: String,
    client: Arc<Client>,
}

impl std::fmt::Debug for XtreamCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XtreamCatalog")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl XtreamCatalog {
    pub fn new(config: &CatalogConfig, client: Arc<Client>) -> Self {
        XtreamCatalog {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            client,
        }
    }

    fn listing_action(kind: ContentKind) -> &'static str {
        match kind {
            ContentKind::Movie => "get_vod_streams",
            ContentKind::Series => "get_series",
        }
    }
}

#[async_trait]
impl CatalogProvider for XtreamCatalog {
    async fn fetch(&self, kind: ContentKind) -> Result<Vec<CatalogEntry>> {
        let url = format!("{}/player_api.php", self.base_url);
        tracing::debug!("catalog request: url={}, kind={}", url, kind);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
                ("action", Self::listing_action(kind)),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PipelineError::Status(response.status()));
        }

        let records: Vec<RawListing> = response
            .json()
            .await
            .map_err(|e| PipelineError::Parse(e.to_string()))?;

        let total = records.len();
        let entries: Vec<CatalogEntry> = records
            .into_iter()
            .filter_map(|record| entry_from_record(record, kind))
            .collect();
        tracing::info!(
            "catalog fetch: kind={}, records={}, kept={}",
            kind,
            total,
            entries.len()
        );
        Ok(entries)
    }
}

#[derive(Debug, Deserialize)]
struct RawListing {
    #[serde(default, deserialize_with = "flex_u32")]
    stream_id: Option<u32>,
    #[serde(default, deserialize_with = "flex_u32")]
    series_id: Option<u32>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    stream_type: Option<String>,
    #[serde(default)]
    stream_icon: Option<String>,
    #[serde(default)]
    cover: Option<String>,
    #[serde(default)]
    container_extension: Option<String>,
    #[serde(default, deserialize_with = "flex_u32")]
    year: Option<u32>,
    #[serde(default, deserialize_with = "flex_i64")]
    last_modified: Option<i64>,
}

/// Map one raw record to a catalog entry.
///
/// Returns `None` for records of another kind and for records without a
/// usable id. Title resolution order: `title`, then `name`, then empty.
fn entry_from_record(record: RawListing, requested: ContentKind) -> Option<CatalogEntry> {
    let record_kind = match record.stream_type.as_deref() {
        None | Some("") => requested,
        Some(raw) => raw.parse::<ContentKind>().ok()?,
    };
    if record_kind != requested {
        return None;
    }

    let external_id = match requested {
        ContentKind::Movie => record.stream_id.or(record.series_id),
        ContentKind::Series => record.series_id.or(record.stream_id),
    }?;

    let display_name = record
        .title
        .filter(|t| !t.is_empty())
        .or(record.name)
        .unwrap_or_default();

    let fallback_icon_url = record
        .stream_icon
        .filter(|u| !u.is_empty())
        .or(record.cover)
        .unwrap_or_default();

    let container_extension = record
        .container_extension
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "mp4".to_string());

    Some(CatalogEntry {
        external_id,
        kind: requested,
        display_name,
        fallback_icon_url,
        container_extension,
        server_year: record.year.unwrap_or(0),
        last_modified_epoch: record.last_modified.unwrap_or(0),
    })
}

// The panel emits numeric fields as either JSON numbers or strings;
// anything unparseable is treated as absent rather than a parse failure.
fn flex_u32<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn flex_i64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}
