//! Article body extraction with a readability-first strategy.
//!
//! The primary strategy runs the fetched page through a readability pass
//! to isolate the main story body. Pages whose layout defeats it, or
//! whose fetch fails outright, get exactly one fallback: refetch and
//! concatenate every `<p>` block in document order. Neither strategy is
//! retried beyond that, so an article costs at most two requests.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use crate::fetch::FetchText;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Extracts readable article text through a [`FetchText`] implementation.
pub struct ContentExtractor<F> {
    fetcher: F,
}

impl<F: FetchText> ContentExtractor<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Full text of the article at `url`.
    ///
    /// Returns `None` only when the fallback fetch itself fails; a page
    /// that fetches but yields no text comes back as an empty string, and
    /// the caller decides whether that candidate is worth keeping.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn full_text(&self, url: &str) -> Option<String> {
        if let Some(text) = self.readable_text(url).await {
            return Some(text);
        }
        debug!("main-body extraction failed, falling back to paragraph concatenation");
        self.paragraph_text(url).await
    }

    async fn readable_text(&self, url: &str) -> Option<String> {
        let html = self.fetcher.fetch_text(url).await?;
        let base = Url::parse(url).ok()?;
        match readability::extractor::extract(&mut html.as_bytes(), &base) {
            Ok(product) if !product.text.trim().is_empty() => Some(product.text),
            Ok(_) => {
                debug!("readability pass produced no text");
                None
            }
            Err(e) => {
                debug!(error = ?e, "readability pass failed");
                None
            }
        }
    }

    async fn paragraph_text(&self, url: &str) -> Option<String> {
        let html = self.fetcher.fetch_text(url).await?;
        let document = Html::parse_document(&html);
        let text = document
            .select(&PARAGRAPH)
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Plays back scripted responses in order, one per fetch call.
    struct ScriptedFetcher {
        responses: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedFetcher {
        fn new(responses: Vec<Option<String>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }

        fn remaining(&self) -> usize {
            self.responses.lock().unwrap().len()
        }
    }

    impl FetchText for ScriptedFetcher {
        async fn fetch_text(&self, _url: &str) -> Option<String> {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                None
            } else {
                responses.remove(0)
            }
        }
    }

    #[tokio::test]
    async fn test_fallback_concatenates_paragraphs() {
        let fetcher = ScriptedFetcher::new(vec![
            None,
            Some(
                "<html><body><p>First paragraph.</p><p>Second paragraph.</p></body></html>"
                    .to_string(),
            ),
        ]);
        let extractor = ContentExtractor::new(fetcher);

        let text = extractor.full_text("https://news.example/story").await;

        assert_eq!(text.as_deref(), Some("First paragraph.\nSecond paragraph."));
    }

    #[tokio::test]
    async fn test_gives_up_after_one_fallback_attempt() {
        let fetcher = ScriptedFetcher::new(vec![
            None,
            None,
            Some("<p>never reached</p>".to_string()),
        ]);
        let extractor = ContentExtractor::new(fetcher);

        assert_eq!(extractor.full_text("https://news.example/story").await, None);
        // Two fetches spent: primary and fallback. The third response was
        // never consumed.
        assert_eq!(extractor.fetcher.remaining(), 1);
    }

    #[tokio::test]
    async fn test_text_free_page_yields_empty_string_not_none() {
        let page = "<html><body><img src=\"chart.png\"></body></html>";
        let fetcher = ScriptedFetcher::new(vec![Some(page.to_string()), Some(page.to_string())]);
        let extractor = ContentExtractor::new(fetcher);

        let text = extractor.full_text("https://news.example/story").await;

        assert_eq!(text.as_deref(), Some(""));
    }
}
