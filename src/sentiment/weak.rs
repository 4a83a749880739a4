//! Weak labels from word lists
//!
//! A tweet is positive when it has more hits in [`POSITIVE_WORDS`] than in
//! [`NEGATIVE_WORDS`] and vice versa. Ties, including no hits at all, leave
//! the tweet unlabeled. Used only to bootstrap the word classifier.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::models::SentimentLabel;
use crate::nlp::Tokenizer;

pub const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "amazing", "fantastic", "tremendous", "strong", "win", "winning",
    "beautiful", "success", "successful", "happy", "proud", "respect", "love", "best",
    "positive", "incredible", "honored", "grateful", "huge", "strongest", "wonderful",
    "excellent", "terrific", "congratulations", "winner", "winners", "achievement", "thank",
    "thanks", "blessed", "blessing", "honor", "magnificent", "superb", "outstanding",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "horrible", "weak", "fail", "failure", "disaster", "sad", "angry",
    "corrupt", "worst", "negative", "unfair", "hate", "disgrace", "stupid", "dishonest",
    "illegal", "failing", "failed", "witch", "hunt", "hoax", "fake", "news", "enemy", "crooked",
    "liar", "lies", "lying", "pathetic", "loser", "disgraceful", "shameful", "radical",
    "dangerous", "crime", "criminal", "criminals", "border", "crisis",
];

static POSITIVE_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| POSITIVE_WORDS.iter().copied().collect());
static NEGATIVE_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| NEGATIVE_WORDS.iter().copied().collect());

/// Positive or negative by word-list hits, `None` on a tie
pub fn weak_label(text: &str) -> Option<SentimentLabel> {
    let tokens = Tokenizer::new().tokenize(text);

    let positive = tokens.iter().filter(|t| POSITIVE_SET.contains(t.as_str())).count();
    let negative = tokens.iter().filter(|t| NEGATIVE_SET.contains(t.as_str())).count();

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Some(SentimentLabel::Positive),
        std::cmp::Ordering::Less => Some(SentimentLabel::Negative),
        std::cmp::Ordering::Equal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_labels() {
        assert_eq!(weak_label("This is great and amazing!"), Some(SentimentLabel::Positive));
        assert_eq!(weak_label("This is terrible and horrible"), Some(SentimentLabel::Negative));
    }

    #[test]
    fn test_ties_are_unlabeled() {
        assert_eq!(weak_label("great job on a terrible day"), None);
        assert_eq!(weak_label("meeting at noon"), None);
        assert_eq!(weak_label(""), None);
    }

    #[test]
    fn test_case_and_urls_ignored() {
        assert_eq!(
            weak_label("WINNING big https://t.co/great"),
            Some(SentimentLabel::Positive)
        );
    }
}
