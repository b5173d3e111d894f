//! Tokenization and preprocessing shared by the extractor and the lexical
//! similarity tiers.

use std::collections::HashSet;
use std::sync::LazyLock;

/// English stop words. Small closed-class list; enough to keep function
/// words out of phrase candidates and word sets.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
        "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during",
        "each", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
        "here", "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its",
        "itself", "just", "me", "more", "most", "my", "no", "nor", "not", "now", "of", "off",
        "on", "once", "only", "or", "other", "our", "ours", "out", "over", "own", "per", "said",
        "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
        "them", "then", "there", "these", "they", "this", "those", "through", "to", "too",
        "under", "until", "up", "upon", "very", "was", "we", "were", "what", "when", "where",
        "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
    ]
    .into_iter()
    .collect()
});

/// Tokens longer than this are almost always URLs, IDs, or formatting
/// garbage and are dropped before extraction.
const MAX_TOKEN_LEN: usize = 25;

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Clean raw text before extraction: drop oversized tokens and characters
/// that interfere with phrase splitting.
pub fn preprocess(text: &str) -> String {
    text.split_whitespace()
        .filter(|w| w.len() <= MAX_TOKEN_LEN)
        .collect::<Vec<_>>()
        .join(" ")
        .replace(['\\', '+'], "")
}

/// Lowercased word tokens in document order. Splits on anything that is
/// not alphanumeric, so punctuation never leaks into tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Case-folded word set with stop words removed, for the lexical
/// similarity tiers. Falls back to the unfiltered token set when every
/// token is a stop word, so a text always matches itself.
pub fn word_set(text: &str) -> HashSet<String> {
    let tokens = tokenize(text);
    let content: HashSet<String> = tokens
        .iter()
        .filter(|t| !is_stop_word(t))
        .cloned()
        .collect();
    if content.is_empty() {
        tokens.into_iter().collect()
    } else {
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_punctuation_and_folds_case() {
        assert_eq!(
            tokenize("Delhi's weather: Rain, dust-storms!"),
            vec!["delhi", "s", "weather", "rain", "dust", "storms"]
        );
    }

    #[test]
    fn preprocess_drops_oversized_tokens() {
        let noisy = format!("short {} word", "x".repeat(40));
        assert_eq!(preprocess(&noisy), "short word");
    }

    #[test]
    fn word_set_removes_stop_words() {
        let set = word_set("the rain in the capital");
        assert!(set.contains("rain"));
        assert!(set.contains("capital"));
        assert!(!set.contains("the"));
    }

    #[test]
    fn word_set_of_all_stop_words_is_not_empty() {
        let set = word_set("the of and");
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn word_set_of_blank_text_is_empty() {
        assert!(word_set("   ").is_empty());
        assert!(word_set("!!!").is_empty());
    }
}
