//! # newshound
//!
//! A scheduled news aggregation pipeline that scrapes headlines from
//! configured listing pages, pulls top headlines from a news API, folds
//! the two streams together, drops near-duplicate stories, labels what
//! survives, and keeps it in SQLite.
//!
//! ## Features
//!
//! - Selector-driven scraping of any listing page (headline + link + body)
//! - News API ingestion normalized into the same candidate shape
//! - Batch-local TF-IDF cosine deduplication across all sources
//! - Category, summary, and sentiment enrichment before persistence
//! - One shared sliding-window request budget across all HTTP traffic
//! - Idempotent SQLite persistence: reruns never duplicate rows
//!
//! ## Usage
//!
//! ```sh
//! # Hourly passes with the built-in sources
//! newshound
//!
//! # Single pass, custom sources, API enabled
//! NEWS_API_KEY=... newshound --config sources.yaml --once
//!
//! # Inspect the store without running a pass
//! newshound --list --category Politics
//! ```
//!
//! ## Architecture
//!
//! Each pass is a fixed pipeline:
//! 1. **Scraping**: discover (headline, link) pairs per source, extract bodies
//! 2. **API fetching**: top headlines per configured source id
//! 3. **Merging**: scraped candidates first, API candidates after
//! 4. **Deduplicating**: TF-IDF + cosine, the earlier article wins
//! 5. **Enriching**: category, summary, sentiment
//! 6. **Persisting**: transactional `INSERT OR IGNORE` batch
//!
//! Passes repeat on a fixed interval and never overlap; a pass that
//! outlives the interval just skips the missed tick.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::time::MissedTickBehavior;
use tracing::{info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod dedup;
mod enrich;
mod error;
mod extract;
mod fetch;
mod limiter;
mod models;
mod runner;
mod scrape;
mod store;
mod utils;

use api::ApiIngestor;
use cli::Cli;
use config::Config;
use dedup::SimilarityDeduplicator;
use enrich::KeywordAnalyzer;
use fetch::RateLimitedFetcher;
use limiter::RateLimiter;
use runner::{AggregationRunner, PassReport};
use scrape::SourceScraper;
use store::ArticleStore;

#[tokio::main]
#[instrument]
async fn main() -> anyhow::Result<()> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    // Parse CLI and load configuration
    let args = Cli::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(database) = &args.database {
        config.database = database.clone();
    }
    // Maintenance flags work against the store directly and never start
    // the pipeline.
    if args.list || args.relabel.is_some() || args.delete.is_some() {
        let store = ArticleStore::open(&config.database)?;
        return run_maintenance(&store, &args);
    }

    info!(
        database = %config.database,
        scraped_sources = config.sources.len(),
        api_sources = config.api_sources.len(),
        interval_minutes = config.interval_minutes,
        requests_per_minute = config.requests_per_minute,
        "newshound starting up"
    );
    if args.news_api_key.is_none() && !config.api_sources.is_empty() {
        info!("no news API key configured, API sources will be skipped");
    }

    // --- Wire the pipeline ---
    let limiter = Arc::new(RateLimiter::per_minute(config.requests_per_minute));
    let fetcher = RateLimitedFetcher::new(
        limiter,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let store = ArticleStore::open(&config.database)?;
    let mut runner = AggregationRunner::new(
        config.descriptors(),
        SourceScraper::new(fetcher.clone()),
        ApiIngestor::new(fetcher, args.news_api_key),
        SimilarityDeduplicator::new(config.dedup_threshold),
        KeywordAnalyzer,
        store,
    );

    // --- Scheduled passes ---
    let mut ticker = tokio::time::interval(Duration::from_secs(config.interval_minutes * 60));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // The first tick fires immediately, so startup runs a pass right
        // away and then settles into the interval.
        ticker.tick().await;
        let report = runner.run_pass().await;
        log_report(&report);
        if args.once {
            break;
        }
    }

    Ok(())
}

fn log_report(report: &PassReport) {
    info!(
        status = ?report.status,
        scraped = report.scraped,
        api_fetched = report.api_fetched,
        merged = report.merged,
        unique = report.unique,
        inserted = report.inserted,
        skipped = report.skipped,
        elapsed_ms = report.duration().num_milliseconds(),
        "aggregation pass complete"
    );
}

/// Services `--relabel`, `--delete`, and `--list` against the store.
///
/// Mutations run before the listing so a combined invocation prints the
/// state it just produced.
fn run_maintenance(store: &ArticleStore, args: &Cli) -> anyhow::Result<()> {
    if let Some([title, category]) = args.relabel.as_deref() {
        store.update_category(title, category)?;
        info!(%title, %category, "article relabeled");
    }
    if let Some(title) = &args.delete {
        store.delete_article(title)?;
        info!(%title, "article deleted");
    }
    if args.list {
        let rows = match &args.category {
            Some(category) => store.fetch_by_category(category),
            None => store.fetch_all(),
        };
        for row in &rows {
            println!("[{}] {} | {} | {}", row.id, row.category, row.source, row.title);
            println!("    {}", row.link);
            if !row.content.is_empty() {
                println!("    {}", utils::truncate_for_log(&row.content, 160));
            }
        }
        info!(count = rows.len(), "listed stored articles");
    }
    Ok(())
}
