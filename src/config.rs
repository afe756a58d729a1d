//! Runtime configuration: a YAML file layered over built-in defaults.
//!
//! Every field is optional. The built-in defaults describe the reference
//! deployment: three scraped sources, three news API source ids, ten
//! requests per minute, hourly passes. Validation runs at load time so a
//! bad selector or URL fails startup instead of failing quietly inside a
//! scheduled pass.

use serde::Deserialize;

use crate::api::{DEFAULT_API_ENDPOINT, DEFAULT_CONTENT_FIELD};
use crate::error::ConfigError;
use crate::models::{ExtractionRule, SourceDescriptor};

/// One scraped source: a listing page plus the selector that finds its
/// headlines.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapedSource {
    pub name: String,
    pub url: String,
    pub selector: String,
}

/// Aggregator configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// SQLite database path.
    pub database: String,
    /// Minutes between scheduled passes.
    pub interval_minutes: u64,
    /// Shared HTTP request budget per rolling minute.
    pub requests_per_minute: usize,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Cosine similarity above which the later of two articles is
    /// dropped.
    pub dedup_threshold: f64,
    /// Scraped sources, processed in order.
    pub sources: Vec<ScrapedSource>,
    /// News API source ids, processed after the scraped sources.
    pub api_sources: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: "news.db".to_string(),
            interval_minutes: 60,
            requests_per_minute: 10,
            request_timeout_secs: 10,
            dedup_threshold: 0.8,
            sources: vec![
                ScrapedSource {
                    name: "Kenyans".to_string(),
                    url: "https://www.kenyans.co.ke/".to_string(),
                    selector: "h2".to_string(),
                },
                ScrapedSource {
                    name: "BBC".to_string(),
                    url: "https://www.bbc.com/news".to_string(),
                    selector: "h3".to_string(),
                },
                ScrapedSource {
                    name: "CNN".to_string(),
                    url: "https://edition.cnn.com/world".to_string(),
                    selector: "h3".to_string(),
                },
            ],
            api_sources: vec![
                "bbc-news".to_string(),
                "cnn".to_string(),
                "al-jazeera-english".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load from `path`, or fall back to the built-in defaults when no
    /// path is given. Either way the result is validated.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match path {
            None => Self::default(),
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_string(),
                    source,
                })?;
                serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_string(),
                    source,
                })?
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dedup_threshold > 0.0 && self.dedup_threshold < 1.0) {
            return Err(ConfigError::ThresholdOutOfRange(self.dedup_threshold));
        }
        if self.requests_per_minute == 0 {
            return Err(ConfigError::ZeroRequestBudget);
        }
        if self.interval_minutes == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        for source in &self.sources {
            url::Url::parse(&source.url).map_err(|e| ConfigError::InvalidUrl {
                name: source.name.clone(),
                url: source.url.clone(),
                source: e,
            })?;
            if scraper::Selector::parse(&source.selector).is_err() {
                return Err(ConfigError::InvalidSelector {
                    name: source.name.clone(),
                    selector: source.selector.clone(),
                });
            }
        }
        Ok(())
    }

    /// Descriptor list for the pipeline: scraped sources first, then API
    /// source ids, both preserving configured order.
    pub fn descriptors(&self) -> Vec<SourceDescriptor> {
        let scraped = self.sources.iter().map(|source| SourceDescriptor {
            name: source.name.clone(),
            endpoint: source.url.clone(),
            rule: ExtractionRule::CssSelector(source.selector.clone()),
        });
        let api = self.api_sources.iter().map(|id| SourceDescriptor {
            name: id.clone(),
            endpoint: DEFAULT_API_ENDPOINT.to_string(),
            rule: ExtractionRule::ApiField(DEFAULT_CONTENT_FIELD.to_string()),
        });
        scraped.chain(api).collect()
    }
}
