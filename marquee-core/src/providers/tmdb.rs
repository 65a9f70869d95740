use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use marquee_model::{ContentKind, MetadataResult};

use super::traits::MetadataProvider;
use crate::config::MetadataConfig;
use crate::error::{PipelineError, Result};

const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Metadata client backed by the TMDB search API.
///
/// One search per title, first candidate only. Absent dates or posters
/// degrade to the zero value; transport and non-2xx responses are errors
/// that the enricher swallows per item.
pub struct TmdbLookup {
    api_key: String,
    client: Arc<Client>,
}

impl std::fmt::Debug for TmdbLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbLookup").finish_non_exhaustive()
    }
}

impl TmdbLookup {
    pub fn new(config: &MetadataConfig, client: Arc<Client>) -> Self {
        TmdbLookup {
            api_key: config.api_key.clone(),
            client,
        }
    }

    fn search_endpoint(kind: ContentKind) -> &'static str {
        match kind {
            ContentKind::Movie => "search/movie",
            ContentKind::Series => "search/tv",
        }
    }
}

#[async_trait]
impl MetadataProvider for TmdbLookup {
    async fn lookup(&self, kind: ContentKind, title: &str) -> Result<MetadataResult> {
        let url = format!("{}/{}", TMDB_API_BASE, Self::search_endpoint(kind));
        tracing::debug!("metadata search: kind={}, title={}", kind, title);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", title)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PipelineError::Status(response.status()));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Parse(e.to_string()))?;

        Ok(result_from_candidates(search.results))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchCandidate>,
}

#[derive(Debug, Deserialize)]
struct SearchCandidate {
    // Movies carry `release_date`, TV carries `first_air_date`.
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
}

/// Reduce the candidate list to a single result: first candidate only.
fn result_from_candidates(candidates: Vec<SearchCandidate>) -> MetadataResult {
    let Some(first) = candidates.into_iter().next() else {
        return MetadataResult::default();
    };
    let date = first.release_date.or(first.first_air_date).unwrap_or_default();
    let poster_url = first
        .poster_path
        .filter(|p| !p.is_empty())
        .map(|p| format!("{TMDB_IMAGE_BASE}{p}"))
        .unwrap_or_default();
    MetadataResult {
        resolved_year: year_from_date(&date),
        poster_url,
    }
}

/// First four characters of the date string, or 0 when short or
/// non-numeric. Unknown, not an error.
fn year_from_date(date: &str) -> u32 {
    date.get(..4)
        .and_then(|y| y.parse::<u32>().ok())
        .unwrap_or(0)
}
