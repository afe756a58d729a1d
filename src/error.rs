//! Error taxonomy for the aggregator.
//!
//! Per-source network and extraction failures are absorbed where they
//! happen and only logged, so they never carry a type. What remains typed
//! is the startup-fatal surface (configuration, opening the database) and
//! the one mid-pass failure that changes a pass's status: writing a batch.

use reqwest::StatusCode;
use thiserror::Error;

/// Configuration loading and validation failures. All of these abort
/// startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("source {name}: invalid url {url}: {source}")]
    InvalidUrl {
        name: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("source {name}: selector {selector:?} does not parse")]
    InvalidSelector { name: String, selector: String },

    #[error("dedup-threshold must be strictly between 0 and 1, got {0}")]
    ThresholdOutOfRange(f64),

    #[error("requests-per-minute must be at least 1")]
    ZeroRequestBudget,

    #[error("interval-minutes must be at least 1")]
    ZeroInterval,
}

/// A single failed HTTP fetch. Logged by the fetcher, then dropped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Article store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database operation failed: {0}")]
    Sql(#[from] rusqlite::Error),
}
