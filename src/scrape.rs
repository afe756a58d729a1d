//! Selector-driven headline discovery across the configured sources.
//!
//! For each CSS-selector source the scraper fetches the listing page,
//! pulls (headline, link) pairs out of the elements the selector matches,
//! and runs every discovered link through the content extractor. Sources
//! fail independently: a dead listing or an unparsable selector skips
//! that source and the rest of the pass carries on.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::extract::ContentExtractor;
use crate::fetch::FetchText;
use crate::models::{ArticleCandidate, ExtractionRule, SourceDescriptor};
use crate::utils::{collapse_whitespace, truncate_for_log};

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

pub struct SourceScraper<F> {
    fetcher: F,
    extractor: ContentExtractor<F>,
}

impl<F: FetchText + Clone> SourceScraper<F> {
    pub fn new(fetcher: F) -> Self {
        let extractor = ContentExtractor::new(fetcher.clone());
        Self { fetcher, extractor }
    }

    /// Collect article candidates from every CSS-selector source, in
    /// configuration order. API-rule descriptors are ignored here; the
    /// ingestor owns those.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&self, sources: &[SourceDescriptor]) -> Vec<ArticleCandidate> {
        let mut collected = Vec::new();
        for source in sources {
            let ExtractionRule::CssSelector(selector) = &source.rule else {
                continue;
            };
            match self.scrape_source(source, selector).await {
                Some(mut candidates) => collected.append(&mut candidates),
                None => warn!(source = %source.name, "listing unavailable, skipping source"),
            }
        }
        info!(count = collected.len(), "collected scraped candidates");
        collected
    }

    async fn scrape_source(
        &self,
        source: &SourceDescriptor,
        selector: &str,
    ) -> Option<Vec<ArticleCandidate>> {
        let base = match Url::parse(&source.endpoint) {
            Ok(base) => base,
            Err(e) => {
                warn!(source = %source.name, endpoint = %source.endpoint, error = %e, "endpoint does not parse");
                return None;
            }
        };
        let selector = match Selector::parse(selector) {
            Ok(selector) => selector,
            Err(e) => {
                warn!(source = %source.name, error = %e, "selector does not parse");
                return None;
            }
        };
        let listing = self.fetcher.fetch_text(&source.endpoint).await?;
        let headlines = headline_links(&listing, &selector, &base);
        info!(source = %source.name, count = headlines.len(), "indexed headlines");

        let mut candidates = Vec::with_capacity(headlines.len());
        for (title, link) in headlines {
            let content = self
                .extractor
                .full_text(link.as_str())
                .await
                .unwrap_or_default();
            if content.is_empty() {
                debug!(
                    title = %truncate_for_log(&title, 80),
                    "no extractable body, keeping candidate with empty content"
                );
            }
            candidates.push(ArticleCandidate {
                title,
                link: link.into(),
                content,
                source: source.name.clone(),
            });
        }
        Some(candidates)
    }
}

/// Pull (headline, resolved link) pairs out of a listing page.
///
/// The matched element's text, whitespace-collapsed, is the headline. The
/// link is the element's own `href` when the element is an anchor,
/// otherwise the first descendant anchor's. Matches missing either half
/// are dropped; relative hrefs resolve against the listing URL.
fn headline_links(html: &str, selector: &Selector, base: &Url) -> Vec<(String, Url)> {
    let document = Html::parse_document(html);
    let mut pairs = Vec::new();
    for element in document.select(selector) {
        let title = collapse_whitespace(&element.text().collect::<String>());
        if title.is_empty() {
            continue;
        }
        let Some(href) = element_href(&element) else {
            debug!(title = %truncate_for_log(&title, 80), "match has no anchor, dropped");
            continue;
        };
        match base.join(href) {
            Ok(link) => pairs.push((title, link)),
            Err(e) => debug!(href, error = %e, "href does not resolve, dropped"),
        }
    }
    pairs
}

fn element_href<'a>(element: &ElementRef<'a>) -> Option<&'a str> {
    if element.value().name() == "a" {
        if let Some(href) = element.value().attr("href") {
            return Some(href);
        }
    }
    element
        .select(&ANCHOR)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
}
