//! Category, summary, and sentiment assignment.
//!
//! Analysis sits behind the [`Analyzer`] trait so the pipeline never
//! cares how labels are produced. The shipped [`KeywordAnalyzer`] is a
//! deterministic lexicon scorer speaking the label spaces of the
//! upstream classification and sentiment models.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::models::{Category, Sentiment};
use crate::utils::tokenize;

/// Maximum words carried into a stored summary.
const SUMMARY_WORD_BUDGET: usize = 30;

/// Article analysis boundary. Implementations are synchronous, free of
/// side effects, and total: any text maps to some label.
pub trait Analyzer {
    fn classify(&self, text: &str) -> Category;
    fn summarize(&self, text: &str) -> String;
    fn sentiment(&self, text: &str) -> Sentiment;
}

static CATEGORY_KEYWORDS: Lazy<Vec<(Category, HashSet<&'static str>)>> = Lazy::new(|| {
    vec![
        (
            Category::Technology,
            keyword_set(&[
                "ai", "software", "app", "startup", "tech", "technology", "robot", "chip",
                "computer", "cyber", "internet", "digital", "quantum", "smartphone", "data",
            ]),
        ),
        (
            Category::Sports,
            keyword_set(&[
                "match", "league", "goal", "tournament", "championship", "coach", "player",
                "football", "cricket", "tennis", "olympic", "stadium", "season", "team", "win",
            ]),
        ),
        (
            Category::Politics,
            keyword_set(&[
                "election", "government", "president", "parliament", "senate", "minister",
                "policy", "vote", "campaign", "law", "diplomatic", "congress", "governor",
                "party", "bill",
            ]),
        ),
        (
            Category::Business,
            keyword_set(&[
                "market", "markets", "stocks", "economy", "investor", "profit", "revenue",
                "trade", "company", "bank", "inflation", "earnings", "shares", "economic",
                "billion",
            ]),
        ),
        (
            Category::Health,
            keyword_set(&[
                "health", "hospital", "vaccine", "virus", "disease", "doctor", "patient",
                "medical", "drug", "outbreak", "mental", "cancer", "treatment", "clinic",
                "pandemic",
            ]),
        ),
        (
            Category::Entertainment,
            keyword_set(&[
                "film", "movie", "music", "album", "celebrity", "actor", "actress", "concert",
                "festival", "award", "streaming", "television", "drama", "singer", "hollywood",
            ]),
        ),
    ]
});

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    keyword_set(&[
        "win", "wins", "won", "growth", "success", "breakthrough", "record", "surge", "gain",
        "gains", "improve", "improved", "hope", "recovery", "rally", "boost", "strong",
        "celebrate", "agreement", "peace", "achieve", "achieved",
    ])
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    keyword_set(&[
        "crisis", "death", "deaths", "crash", "loss", "losses", "decline", "fear", "war",
        "attack", "fail", "failure", "drop", "recession", "fraud", "scandal", "outbreak",
        "collapse", "threat", "violence", "weak", "setback",
    ])
});

fn keyword_set(words: &[&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

/// Keyword-lexicon stand-in for the pretrained models: whichever category
/// lexicon scores the most token hits wins, ties go to the earlier
/// category, and no hits at all leaves the article uncategorized.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordAnalyzer;

impl Analyzer for KeywordAnalyzer {
    fn classify(&self, text: &str) -> Category {
        let tokens = tokenize(text);
        let mut best = Category::Uncategorized;
        let mut best_hits = 0usize;
        for (category, keywords) in CATEGORY_KEYWORDS.iter() {
            let hits = tokens
                .iter()
                .filter(|token| keywords.contains(token.as_str()))
                .count();
            if hits > best_hits {
                best = *category;
                best_hits = hits;
            }
        }
        best
    }

    /// First sentence of the text, capped at [`SUMMARY_WORD_BUDGET`]
    /// words.
    fn summarize(&self, text: &str) -> String {
        let lead = text
            .split_terminator(['.', '!', '?'])
            .next()
            .unwrap_or("");
        lead.split_whitespace()
            .take(SUMMARY_WORD_BUDGET)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Positive unless negative cues strictly outnumber positive ones, so
    /// neutral text reads as positive.
    fn sentiment(&self, text: &str) -> Sentiment {
        let tokens = tokenize(text);
        let positive = tokens
            .iter()
            .filter(|token| POSITIVE_WORDS.contains(token.as_str()))
            .count();
        let negative = tokens
            .iter()
            .filter(|token| NEGATIVE_WORDS.contains(token.as_str()))
            .count();
        if positive >= negative {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }
}
