//! One aggregation pass, stage by stage.
//!
//! [`AggregationRunner::run_pass`] drives the fixed sequence scrape, API
//! ingest, merge, deduplicate, enrich, persist, and reports per-stage
//! counts. Source-level failures degrade counts and nothing else; only a
//! persistence failure changes the pass status. Passes cannot overlap:
//! `run_pass` takes `&mut self`, so a caller has to finish one pass
//! before starting the next.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument};

use crate::api::ApiIngestor;
use crate::dedup::SimilarityDeduplicator;
use crate::enrich::Analyzer;
use crate::fetch::FetchText;
use crate::models::{ArticleCandidate, EnrichedArticle, SourceDescriptor};
use crate::scrape::SourceScraper;
use crate::store::ArticleStore;

/// How a pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    /// Every stage ran and the batch was persisted.
    Complete,
    /// Every stage ran but the batch could not be persisted.
    DegradedComplete,
}

/// Stage counters and timing for one pass.
#[derive(Debug, Clone)]
pub struct PassReport {
    pub status: PassStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub scraped: usize,
    pub api_fetched: usize,
    pub merged: usize,
    pub unique: usize,
    pub inserted: usize,
    pub skipped: usize,
}

impl PassReport {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassState {
    Idle,
    Scraping,
    ApiFetching,
    Merging,
    Deduplicating,
    Enriching,
    Persisting,
}

pub struct AggregationRunner<F, A> {
    sources: Vec<SourceDescriptor>,
    scraper: SourceScraper<F>,
    ingestor: ApiIngestor<F>,
    deduplicator: SimilarityDeduplicator,
    analyzer: A,
    store: ArticleStore,
    state: PassState,
}

impl<F, A> AggregationRunner<F, A>
where
    F: FetchText + Clone,
    A: Analyzer,
{
    pub fn new(
        sources: Vec<SourceDescriptor>,
        scraper: SourceScraper<F>,
        ingestor: ApiIngestor<F>,
        deduplicator: SimilarityDeduplicator,
        analyzer: A,
        store: ArticleStore,
    ) -> Self {
        Self {
            sources,
            scraper,
            ingestor,
            deduplicator,
            analyzer,
            store,
            state: PassState::Idle,
        }
    }

    /// Run one full pass and report what happened. Never errors: the
    /// worst network day produces an empty batch, and a failed write
    /// produces a degraded report.
    #[instrument(level = "info", skip_all)]
    pub async fn run_pass(&mut self) -> PassReport {
        let started_at = Utc::now();

        self.advance(PassState::Scraping);
        let scraped = self.scraper.run(&self.sources).await;
        let scraped_count = scraped.len();

        self.advance(PassState::ApiFetching);
        let api_fetched = self.ingestor.run(&self.sources).await;
        let api_count = api_fetched.len();

        self.advance(PassState::Merging);
        let merged: Vec<ArticleCandidate> = scraped.into_iter().chain(api_fetched).collect();
        let merged_count = merged.len();

        self.advance(PassState::Deduplicating);
        let unique = self.deduplicator.remove_duplicates(merged);
        let unique_count = unique.len();

        self.advance(PassState::Enriching);
        let enriched: Vec<EnrichedArticle> =
            unique.into_iter().map(|article| self.enrich(article)).collect();

        self.advance(PassState::Persisting);
        let (status, inserted, skipped) = match self.store.save_articles(&enriched) {
            Ok(report) => (PassStatus::Complete, report.inserted(), report.skipped()),
            Err(e) => {
                error!(error = %e, "persisting batch failed, pass degraded");
                (PassStatus::DegradedComplete, 0, 0)
            }
        };

        self.advance(PassState::Idle);
        let report = PassReport {
            status,
            started_at,
            finished_at: Utc::now(),
            scraped: scraped_count,
            api_fetched: api_count,
            merged: merged_count,
            unique: unique_count,
            inserted,
            skipped,
        };
        info!(
            status = ?report.status,
            scraped = report.scraped,
            api_fetched = report.api_fetched,
            merged = report.merged,
            unique = report.unique,
            inserted = report.inserted,
            skipped = report.skipped,
            "pass finished"
        );
        report
    }

    fn enrich(&self, article: ArticleCandidate) -> EnrichedArticle {
        let enriched = EnrichedArticle {
            category: self.analyzer.classify(&article.content),
            summary: self.analyzer.summarize(&article.content),
            sentiment: self.analyzer.sentiment(&article.content),
            article,
        };
        debug!(
            title = %enriched.article.title,
            category = %enriched.category,
            sentiment = %enriched.sentiment,
            "enriched article"
        );
        enriched
    }

    fn advance(&mut self, next: PassState) {
        debug!(from = ?self.state, to = ?next, "pass state");
        self.state = next;
    }
}
