//! News API ingestion: structured headlines normalized into candidates.
//!
//! Each API-rule source issues one top-headlines request through the
//! shared rate-limited fetcher, then reshapes the returned items into the
//! same [`ArticleCandidate`] form the scraper produces. The response
//! field named by the source's [`ExtractionRule::ApiField`] fills
//! `content`, with the title standing in when that field is null or
//! blank. Without an API key the whole phase is skipped with a warning
//! and the pass continues on scraped sources alone.

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};
use url::Url;

use crate::fetch::FetchText;
use crate::models::{ArticleCandidate, ExtractionRule, SourceDescriptor};

/// Top-headlines endpoint of the news API.
pub const DEFAULT_API_ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";

/// Response field that carries article content for API sources.
pub const DEFAULT_CONTENT_FIELD: &str = "description";

/// Headlines requested per source.
const PAGE_SIZE: u32 = 10;

const LANGUAGE: &str = "en";

#[derive(Debug, Deserialize)]
struct HeadlineResponse {
    #[serde(default)]
    articles: Vec<Value>,
}

pub struct ApiIngestor<F> {
    fetcher: F,
    api_key: Option<String>,
}

impl<F: FetchText> ApiIngestor<F> {
    pub fn new(fetcher: F, api_key: Option<String>) -> Self {
        Self { fetcher, api_key }
    }

    /// Ingest every API-rule source, in configuration order. A failed or
    /// malformed response skips only its own source id.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&self, sources: &[SourceDescriptor]) -> Vec<ArticleCandidate> {
        let mut collected = Vec::new();
        if !sources
            .iter()
            .any(|source| matches!(source.rule, ExtractionRule::ApiField(_)))
        {
            return collected;
        }
        let Some(key) = self.api_key.as_deref() else {
            warn!("API sources configured but no API key provided, skipping API phase");
            return collected;
        };
        for source in sources {
            let ExtractionRule::ApiField(field) = &source.rule else {
                continue;
            };
            match self.fetch_headlines(source, field, key).await {
                Some(mut candidates) => collected.append(&mut candidates),
                None => warn!(source = %source.name, "headline request failed, skipping source"),
            }
        }
        info!(count = collected.len(), "collected API candidates");
        collected
    }

    async fn fetch_headlines(
        &self,
        source: &SourceDescriptor,
        field: &str,
        key: &str,
    ) -> Option<Vec<ArticleCandidate>> {
        let url = match request_url(source, key) {
            Ok(url) => url,
            Err(e) => {
                warn!(source = %source.name, endpoint = %source.endpoint, error = %e, "endpoint does not parse");
                return None;
            }
        };
        let body = self.fetcher.fetch_text(url.as_str()).await?;
        let response: HeadlineResponse = match serde_json::from_str(&body) {
            Ok(response) => response,
            Err(e) => {
                warn!(source = %source.name, error = %e, "malformed headline response");
                return None;
            }
        };
        let candidates: Vec<ArticleCandidate> = response
            .articles
            .iter()
            .filter_map(|item| normalize_item(item, field, &source.name))
            .collect();
        info!(source = %source.name, count = candidates.len(), "ingested headlines");
        Some(candidates)
    }
}

fn request_url(source: &SourceDescriptor, key: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&source.endpoint)?;
    url.query_pairs_mut()
        .append_pair("sources", &source.name)
        .append_pair("apiKey", key)
        .append_pair("pageSize", &PAGE_SIZE.to_string())
        .append_pair("language", LANGUAGE);
    Ok(url)
}

/// One API item becomes one candidate. Items without a usable title or
/// URL are dropped; a missing or blank content field falls back to the
/// title so every admitted candidate has something to deduplicate on.
fn normalize_item(item: &Value, field: &str, source: &str) -> Option<ArticleCandidate> {
    let title = text_field(item, "title")?;
    let link = text_field(item, "url")?;
    let content = text_field(item, field).unwrap_or_else(|| title.clone());
    Some(ArticleCandidate {
        title,
        link,
        content,
        source: source.to_string(),
    })
}

fn text_field(item: &Value, field: &str) -> Option<String> {
    item.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
