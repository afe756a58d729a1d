//! Rate-limited HTTP fetching with user-agent rotation.
//!
//! Every HTTP request the pipeline makes goes through
//! [`RateLimitedFetcher`]: listing pages, article bodies, extraction
//! retries, and news API calls all draw on one shared [`RateLimiter`]
//! budget. Network failures are logged here and surface to callers as
//! `None`; a dead endpoint costs the pass one source's candidates, never
//! the whole batch.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::IndexedRandom;
use reqwest::header::USER_AGENT;
use tracing::{debug, instrument, warn};

use crate::error::FetchError;
use crate::limiter::RateLimiter;

/// Browser user agents, one chosen at random per request.
static USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
];

/// The seam all network traffic passes through. The scraper, extractor,
/// and API ingestor are generic over it so tests can substitute canned
/// pages for live sites.
pub trait FetchText {
    /// Fetch `url` and return the response body, or `None` on any failure.
    async fn fetch_text(&self, url: &str) -> Option<String>;
}

/// HTTP client wrapper enforcing the shared request budget.
///
/// Clones share the underlying client and limiter, so handing a clone to
/// each pipeline component keeps every component on the same budget.
#[derive(Clone)]
pub struct RateLimitedFetcher {
    client: reqwest::Client,
    limiter: Arc<RateLimiter>,
}

impl RateLimitedFetcher {
    pub fn new(limiter: Arc<RateLimiter>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, limiter })
    }

    async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.limiter.acquire().await;
        let agent = random_agent();
        debug!(%url, agent, "GET");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, agent)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;
        let response = response.error_for_status().map_err(|source| match source.status() {
            Some(status) => FetchError::Status {
                url: url.to_string(),
                status,
            },
            None => FetchError::Request {
                url: url.to_string(),
                source,
            },
        })?;
        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

impl FetchText for RateLimitedFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch_text(&self, url: &str) -> Option<String> {
        match self.get(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(error = %e, "fetch failed");
                None
            }
        }
    }
}

fn random_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_agent_stays_in_the_pool() {
        for _ in 0..32 {
            assert!(USER_AGENTS.contains(&random_agent()));
        }
    }

    #[test]
    fn test_agents_look_like_browsers() {
        for agent in USER_AGENTS {
            assert!(agent.starts_with("Mozilla/5.0"));
        }
    }
}
