//! Word tokenizer
//!
//! Lowercases, drops URLs and anything that is not an ASCII letter, and keeps
//! words longer than a minimum length.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"http\S+").unwrap());
static NON_LETTER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z\s]").unwrap());

/// Function words and archive noise excluded from word statistics
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "of", "to", "in", "is", "it", "this", "that", "for", "on", "with",
    "be", "as", "by", "are", "was", "were", "will", "from", "at", "have", "has", "but", "not",
    "or", "if", "so", "you", "your", "my", "our", "their", "they", "we", "i", "he", "she", "his",
    "her", "him", "them", "rt", "s", "all", "t", "just", "now", "amp", "more", "very", "about",
    "do", "what", "who", "people", "word", "should", "m", "realdonaldtrump", "u", "https", "http",
    "co", "www", "com", "today", "tomorrow", "yesterday", "going", "get", "got", "much", "many",
    "new", "been", "would", "could", "can", "than", "being", "make", "made", "way", "know", "see",
    "look", "well", "back", "over", "only", "other", "some", "such", "into", "then", "out", "up",
    "said", "also", "even", "after", "most", "through", "first", "last", "still", "take",
    "where", "when",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Check whether a lowercase word is a stop word
pub fn is_stopword(word: &str) -> bool {
    STOPWORD_SET.contains(word)
}

/// Word tokenizer
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Words must be longer than this many characters
    min_word_length: usize,
    /// Drop stop words
    remove_stopwords: bool,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            min_word_length: 2,
            remove_stopwords: false,
        }
    }

    /// Drop stop words from the output
    pub fn with_stopwords_removed(mut self, remove: bool) -> Self {
        self.remove_stopwords = remove;
        self
    }

    /// Split text into lowercase letter-only words
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let no_urls = URL_REGEX.replace_all(&lower, "");
        let letters = NON_LETTER_REGEX.replace_all(&no_urls, " ");

        letters
            .split_whitespace()
            .filter(|w| w.len() > self.min_word_length)
            .filter(|w| !self.remove_stopwords || !is_stopword(w))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenization() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.tokenize("Hello World! https://t.co/abc"),
            vec!["hello", "world"]
        );
    }

    #[test]
    fn test_short_words_dropped() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("We are so big");
        assert_eq!(tokens, vec!["are", "big"]);
    }

    #[test]
    fn test_stopword_removal() {
        let tokenizer = Tokenizer::new().with_stopwords_removed(true);
        let tokens = tokenizer.tokenize("The economy is doing great, thank you!");
        assert_eq!(tokens, vec!["economy", "doing", "great", "thank"]);
    }

    #[test]
    fn test_is_stopword() {
        assert!(is_stopword("the"));
        assert!(is_stopword("amp"));
        assert!(!is_stopword("economy"));
    }
}
