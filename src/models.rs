//! Core data types flowing through the aggregation pipeline.
//!
//! This module defines the shapes each stage hands to the next:
//! - [`SourceDescriptor`]: one configured feed, fixed at startup
//! - [`ArticleCandidate`]: an article discovered during a pass
//! - [`EnrichedArticle`]: a candidate plus analyzer output, ready to store
//! - [`StoredArticle`]: a persisted row read back from the database
//! - Label types: [`Category`] and [`Sentiment`]
//!
//! Candidates and enriched articles are transient within a single pass;
//! only stored rows outlive it.

use std::fmt;

/// How article content is located at a source.
///
/// The rule decides which pipeline component claims a descriptor: the
/// scraper handles CSS-selector sources, the API ingestor handles field
/// sources. Neither touches the other's descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionRule {
    /// CSS selector matching headline elements on the source's listing page.
    CssSelector(String),
    /// Name of the API response field that carries article content.
    ApiField(String),
}

/// A configured news source. Built once from configuration at startup and
/// never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDescriptor {
    /// Display name for scraped sources, remote source id for API sources.
    pub name: String,
    /// Listing page URL or API endpoint.
    pub endpoint: String,
    /// How to pull content out of this source.
    pub rule: ExtractionRule,
}

/// An article discovered during a pass, before enrichment.
///
/// `title` and `link` are expected to be globally unique, but the same
/// story legitimately shows up under different titles and links across
/// outlets; deduplication catches that through `content`, not the keys.
/// An empty `content` is valid: a headline whose body resisted extraction
/// is still worth keeping.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleCandidate {
    /// Headline text, whitespace-normalized.
    pub title: String,
    /// Absolute URL of the article.
    pub link: String,
    /// Extracted body text, possibly empty.
    pub content: String,
    /// Name of the source that produced this candidate.
    pub source: String,
}

/// A candidate plus analyzer output. The summary, not the raw body, is
/// what gets persisted as the stored row's content.
#[derive(Debug, Clone)]
pub struct EnrichedArticle {
    pub article: ArticleCandidate,
    pub category: Category,
    pub summary: String,
    pub sentiment: Sentiment,
}

/// A persisted article row.
///
/// `category` stays a plain string on the way out of the database: the
/// column default and external writers are not bound to the label set in
/// [`Category`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArticle {
    pub id: i64,
    pub title: String,
    pub link: String,
    pub content: String,
    pub source: String,
    pub category: String,
}

/// Article classification labels.
///
/// The six labeled categories mirror the upstream classification model's
/// label space; `Uncategorized` is the no-signal fallback and matches the
/// database column default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Technology,
    Sports,
    Politics,
    Business,
    Health,
    Entertainment,
    Uncategorized,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Sports => "Sports",
            Category::Politics => "Politics",
            Category::Business => "Business",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary polarity label, rendered with the upstream sentiment model's
/// label strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_fields() {
        let article = ArticleCandidate {
            title: "Test headline".to_string(),
            link: "https://example.com/story".to_string(),
            content: String::new(),
            source: "Example".to_string(),
        };
        assert_eq!(article.title, "Test headline");
        assert_eq!(article.link, "https://example.com/story");
        assert!(article.content.is_empty());
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Technology.as_str(), "Technology");
        assert_eq!(Category::Uncategorized.as_str(), "Uncategorized");
        assert_eq!(Category::Health.to_string(), "Health");
    }

    #[test]
    fn test_sentiment_labels() {
        assert_eq!(Sentiment::Positive.as_str(), "POSITIVE");
        assert_eq!(Sentiment::Negative.as_str(), "NEGATIVE");
        assert_eq!(Sentiment::Positive.to_string(), "POSITIVE");
    }

    #[test]
    fn test_extraction_rule_variants() {
        let scraped = SourceDescriptor {
            name: "BBC".to_string(),
            endpoint: "https://www.bbc.com/news".to_string(),
            rule: ExtractionRule::CssSelector("h3".to_string()),
        };
        let api = SourceDescriptor {
            name: "bbc-news".to_string(),
            endpoint: "https://newsapi.org/v2/top-headlines".to_string(),
            rule: ExtractionRule::ApiField("description".to_string()),
        };

        assert!(matches!(scraped.rule, ExtractionRule::CssSelector(ref s) if s == "h3"));
        assert!(matches!(api.rule, ExtractionRule::ApiField(ref f) if f == "description"));
        assert_ne!(scraped.rule, api.rule);
    }
}
