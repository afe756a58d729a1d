//! Near-duplicate removal over batch-local TF-IDF vectors.
//!
//! Article contents are vectorized per batch; vocabulary and document
//! frequencies never survive a pass, so what counts as "the same story"
//! depends only on the rest of the current batch. Pairs are compared by
//! cosine similarity, and a pair over the threshold keeps its earlier
//! member and drops the later one, so discovery order decides survivors.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use once_cell::sync::Lazy;
use tracing::{debug, info, instrument};

use crate::models::ArticleCandidate;
use crate::utils::tokenize;

/// English stop words excluded from the similarity vocabulary.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
        "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
        "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
        "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
        "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
        "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
        "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
        "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
        "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
        "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
        "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
        "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
        "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
        "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
        "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its",
        "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd", "made",
        "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most",
        "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
        "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor",
        "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only",
        "onto", "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out",
        "over", "own", "part", "per", "perhaps", "please", "put", "rather", "re", "same",
        "see", "seem", "seemed", "seeming", "seems", "serious", "several", "she", "should",
        "show", "side", "since", "sincere", "six", "sixty", "so", "some", "somehow",
        "someone", "something", "sometime", "sometimes", "somewhere", "still", "such",
        "system", "take", "ten", "than", "that", "the", "their", "them", "themselves",
        "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
        "thereupon", "these", "they", "thick", "thin", "third", "this", "those", "though",
        "three", "through", "throughout", "thru", "thus", "to", "together", "too", "top",
        "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
        "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
        "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein",
        "whereupon", "wherever", "whether", "which", "while", "whither", "who", "whoever",
        "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet",
        "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

pub struct SimilarityDeduplicator {
    threshold: f64,
}

impl SimilarityDeduplicator {
    /// `threshold` is an exclusive bound: a pair is a duplicate only when
    /// its similarity is strictly greater.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Drop later near-duplicates of earlier articles, preserving the
    /// input order of the survivors.
    #[instrument(level = "info", skip_all, fields(count = articles.len()))]
    pub fn remove_duplicates(&self, articles: Vec<ArticleCandidate>) -> Vec<ArticleCandidate> {
        if articles.is_empty() {
            return articles;
        }
        let vectors = tfidf_vectors(&articles);
        let mut duplicate = vec![false; articles.len()];
        for (i, j) in (0..articles.len()).tuple_combinations() {
            let similarity = cosine(&vectors[i], &vectors[j]);
            if similarity > self.threshold {
                debug!(kept = i, dropped = j, similarity, "near-duplicate pair");
                duplicate[j] = true;
            }
        }
        let before = articles.len();
        let kept: Vec<ArticleCandidate> = articles
            .into_iter()
            .zip(duplicate)
            .filter_map(|(article, dup)| (!dup).then_some(article))
            .collect();
        info!(before, after = kept.len(), "removed near-duplicates");
        kept
    }
}

/// One L2-normalized TF-IDF vector per article content.
///
/// Raw term counts are weighted by smoothed inverse document frequency,
/// `ln((1 + n) / (1 + df)) + 1`, then normalized. Contents that tokenize
/// to nothing (or to stop words only) produce an empty vector, which is
/// similar to nothing.
fn tfidf_vectors(articles: &[ArticleCandidate]) -> Vec<HashMap<String, f64>> {
    let token_docs: Vec<Vec<String>> = articles
        .iter()
        .map(|article| {
            tokenize(&article.content)
                .into_iter()
                .filter(|token| !STOP_WORDS.contains(token.as_str()))
                .collect()
        })
        .collect();

    let n = token_docs.len() as f64;
    let mut document_frequency: HashMap<&str, f64> = HashMap::new();
    for tokens in &token_docs {
        let distinct: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for token in distinct {
            *document_frequency.entry(token).or_insert(0.0) += 1.0;
        }
    }

    token_docs
        .iter()
        .map(|tokens| {
            let mut weights: HashMap<String, f64> = HashMap::new();
            for token in tokens {
                *weights.entry(token.clone()).or_insert(0.0) += 1.0;
            }
            for (token, weight) in weights.iter_mut() {
                let df = document_frequency.get(token.as_str()).copied().unwrap_or(0.0);
                *weight *= ((1.0 + n) / (1.0 + df)).ln() + 1.0;
            }
            let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for weight in weights.values_mut() {
                    *weight /= norm;
                }
            }
            weights
        })
        .collect()
}

/// Cosine similarity of two L2-normalized sparse vectors: their dot
/// product, clamped into [0, 1]. Iterates the smaller map.
fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(token, weight)| large.get(token).map(|other| weight * other))
        .sum();
    dot.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, content: &str) -> ArticleCandidate {
        ArticleCandidate {
            title: title.to_string(),
            link: format!("https://dedup.example/{title}"),
            content: content.to_string(),
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_identical_contents_keep_the_earlier_copy() {
        let text = "AI has achieved a major breakthrough in 2024.";
        let articles = vec![candidate("first", text), candidate("second", text)];

        let kept = SimilarityDeduplicator::new(0.8).remove_duplicates(articles);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "first");
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Identical contents score 1.0, which is never strictly greater
        // than a threshold of 1.0, so both copies survive.
        let text = "AI has achieved a major breakthrough in 2024.";
        let articles = vec![candidate("first", text), candidate("second", text)];

        let kept = SimilarityDeduplicator::new(1.0).remove_duplicates(articles);

        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_threshold_tunes_strictness() {
        let a = "quantum computer prototype unveiled researchers laboratory milestone";
        let b = "quantum computer prototype unveiled researchers laboratory setback";

        let lenient = SimilarityDeduplicator::new(0.999)
            .remove_duplicates(vec![candidate("a", a), candidate("b", b)]);
        assert_eq!(lenient.len(), 2);

        let strict = SimilarityDeduplicator::new(0.3)
            .remove_duplicates(vec![candidate("a", a), candidate("b", b)]);
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].title, "a");
    }

    #[test]
    fn test_unrelated_batch_passes_through_in_order() {
        let articles = vec![
            candidate("a", "football season opener draws stadium crowds"),
            candidate("b", "parliament budget vote delayed amid debate"),
            candidate("c", "virus vaccine trial results published early"),
        ];

        let kept = SimilarityDeduplicator::new(0.8).remove_duplicates(articles.clone());

        assert_eq!(kept, articles);
    }

    #[test]
    fn test_empty_batch_is_a_no_op() {
        let kept = SimilarityDeduplicator::new(0.8).remove_duplicates(Vec::new());
        assert!(kept.is_empty());
    }

    #[test]
    fn test_blank_contents_never_match_anything() {
        // Empty and stop-word-only contents vectorize to nothing; even at
        // a near-zero threshold they must not collapse into one another.
        let articles = vec![
            candidate("a", ""),
            candidate("b", ""),
            candidate("c", "the and of could would"),
        ];

        let kept = SimilarityDeduplicator::new(0.1).remove_duplicates(articles.clone());

        assert_eq!(kept, articles);
    }

    #[test]
    fn test_condemned_article_still_condemns_later_copies() {
        let text = "AI has achieved a major breakthrough in 2024.";
        let articles = vec![
            candidate("a", text),
            candidate("b", text),
            candidate("c", text),
        ];

        let kept = SimilarityDeduplicator::new(0.8).remove_duplicates(articles);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "a");
    }
}
