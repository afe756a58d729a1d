//! Small text helpers shared across the pipeline.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// Headline elements scraped out of listing pages carry the page's
/// indentation and newlines; titles get normalized here before they are
/// used as natural keys.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(collapse_whitespace("  Breaking:\n  markets   rally "), "Breaking: markets rally");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Split text into lowercased alphanumeric tokens of at least two
/// characters.
///
/// Single-character fragments are noise for both similarity scoring and
/// keyword matching, so they are dropped at the source. Both the
/// deduplicator and the keyword analyzer tokenize through this one
/// function, keeping their vocabularies consistent.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(|token| token.to_lowercase())
        .collect()
}

/// Truncate a string for logging, noting how much was cut. Never splits a
/// multi-byte character.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}... (+{} bytes)", &s[..cut], s.len() - cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  Breaking:\n\t markets   rally "),
            "Breaking: markets rally"
        );
        assert_eq!(collapse_whitespace("already clean"), "already clean");
        assert_eq!(collapse_whitespace("   \n  "), "");
    }

    #[test]
    fn test_tokenize_lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("AI has achieved a major breakthrough in 2024."),
            vec!["ai", "has", "achieved", "major", "breakthrough", "in", "2024"]
        );
    }

    #[test]
    fn test_tokenize_drops_single_characters() {
        assert_eq!(tokenize("a b c word"), vec!["word"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("! ? ...").is_empty());
    }

    #[test]
    fn test_truncate_for_log_short_input_untouched() {
        assert_eq!(truncate_for_log("short", 10), "short");
    }

    #[test]
    fn test_truncate_for_log_cuts_long_input() {
        let truncated = truncate_for_log("abcdefghij", 4);
        assert!(truncated.starts_with("abcd"));
        assert!(truncated.contains("+6 bytes"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        // 'é' is two bytes; cutting at byte 1 would split it
        let truncated = truncate_for_log("némesis", 2);
        assert!(truncated.starts_with("n"));
        assert!(!truncated.starts_with("né"));
    }
}
