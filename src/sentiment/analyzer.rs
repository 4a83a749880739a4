//! Lexicon-based polarity scorer
//!
//! Sums token valences with rule-based adjustments and squashes the sum into
//! [-1, 1]:
//! - intensifiers/dampeners up to three words back, with decay
//! - negation up to three words back flips and damps the valence
//! - ALL-CAPS words are emphasized when the rest of the text is not shouting
//! - "but" halves what comes before it and amplifies what follows
//! - exclamation and question marks push the sum away from zero

use crate::error::LexiconError;
use crate::models::ScoredWord;
use crate::sentiment::labeler::PolarityScorer;
use crate::sentiment::lexicon::{SentimentLexicon, TweetLexicon};

/// Extra valence for an ALL-CAPS word in mixed-case text
const CAPS_INCREMENT: f64 = 0.733;
/// Multiplier applied to a negated valence
const NEGATION_SCALAR: f64 = -0.74;
/// Weight of each exclamation mark, at most four counted
const EXCLAMATION_WEIGHT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
/// Weight of each question mark when there are two or three
const QUESTION_WEIGHT: f64 = 0.18;
const MAX_QUESTION_EMPHASIS: f64 = 0.96;
/// Normalization constant in `s / sqrt(s^2 + alpha)`
const NORMALIZATION_ALPHA: f64 = 15.0;
/// How many preceding words can boost or negate
const LOOKBACK: usize = 3;

/// Polarity of a text with the words that drove it
#[derive(Debug, Clone, PartialEq)]
pub struct PolarityScore {
    /// Normalized score in [-1, 1]
    pub compound: f64,
    /// Sum of adjusted valences before normalization
    pub raw_sum: f64,
    pub key_words: Vec<ScoredWord>,
}

/// Lexicon scorer
#[derive(Debug, Clone)]
pub struct LexiconScorer<L = TweetLexicon> {
    lexicon: L,
}

impl LexiconScorer<TweetLexicon> {
    /// Scorer backed by the embedded lexicon
    pub fn embedded() -> Result<Self, LexiconError> {
        Ok(Self::new(TweetLexicon::embedded()?))
    }
}

impl<L: SentimentLexicon> LexiconScorer<L> {
    pub fn new(lexicon: L) -> Self {
        Self { lexicon }
    }

    /// Score a text
    pub fn score(&self, text: &str) -> PolarityScore {
        let words = split_words(text);
        let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let cap_differential = has_cap_differential(&words);

        let mut valences = vec![0.0; words.len()];

        for (i, word) in words.iter().enumerate() {
            let lower = &lowered[i];
            if self.lexicon.booster(lower).is_some() {
                continue;
            }
            let Some(base) = self.lexicon.valence(lower) else {
                continue;
            };

            let mut valence = base;
            if cap_differential && is_all_caps(word) {
                valence += CAPS_INCREMENT.copysign(valence);
            }

            for distance in 1..=LOOKBACK.min(i) {
                let j = i - distance;
                if let Some(scalar) = self.booster_scalar(words[j], &lowered[j], valence, cap_differential)
                {
                    let decay = match distance {
                        1 => 1.0,
                        2 => 0.95,
                        _ => 0.9,
                    };
                    valence += scalar * decay;
                }
                if self.lexicon.is_negation(&lowered[j]) {
                    valence *= NEGATION_SCALAR;
                }
            }

            valences[i] = valence;
        }

        if let Some(but_idx) = lowered.iter().position(|w| w == "but") {
            for (i, valence) in valences.iter_mut().enumerate() {
                if i < but_idx {
                    *valence *= 0.5;
                } else if i > but_idx {
                    *valence *= 1.5;
                }
            }
        }

        let mut sum: f64 = valences.iter().sum();
        let emphasis = punctuation_emphasis(text);
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }

        let compound = if sum == 0.0 {
            0.0
        } else {
            (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
        };

        let key_words = words
            .iter()
            .zip(valences.iter())
            .filter(|(_, v)| **v != 0.0)
            .map(|(w, v)| ScoredWord {
                word: w.to_string(),
                score: *v,
            })
            .collect();

        PolarityScore {
            compound,
            raw_sum: sum,
            key_words,
        }
    }

    fn booster_scalar(&self, word: &str, lower: &str, valence: f64, cap_differential: bool) -> Option<f64> {
        let mut scalar = self.lexicon.booster(lower)?;
        if valence < 0.0 {
            scalar = -scalar;
        }
        if cap_differential && is_all_caps(word) {
            scalar += CAPS_INCREMENT.copysign(valence);
        }
        Some(scalar)
    }
}

impl<L: SentimentLexicon> PolarityScorer for LexiconScorer<L> {
    fn polarity(&self, text: &str) -> f64 {
        self.score(text).compound
    }

    fn version(&self) -> String {
        self.lexicon.version().to_string()
    }
}

/// Split on whitespace and strip surrounding punctuation; single characters are dropped
fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() > 1)
        .collect()
}

fn is_all_caps(word: &str) -> bool {
    word.chars().any(|c| c.is_alphabetic()) && !word.chars().any(|c| c.is_lowercase())
}

/// True when some but not all words are ALL-CAPS
fn has_cap_differential(words: &[&str]) -> bool {
    let caps = words.iter().filter(|w| is_all_caps(w)).count();
    caps > 0 && caps < words.len()
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();

    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_WEIGHT,
        _ => MAX_QUESTION_EMPHASIS,
    };

    exclamations as f64 * EXCLAMATION_WEIGHT + question_emphasis
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> LexiconScorer {
        LexiconScorer::embedded().unwrap()
    }

    #[test]
    fn test_positive_sentence() {
        let result = scorer().score("Great job everybody!");

        assert!(result.compound > 0.05);
        assert_eq!(result.key_words.len(), 1);
        assert_eq!(result.key_words[0].word, "Great");
    }

    #[test]
    fn test_negative_sentence() {
        let result = scorer().score("This is a total disaster and a disgrace");
        assert!(result.compound < -0.05);
    }

    #[test]
    fn test_no_lexicon_words_is_zero() {
        let result = scorer().score("The meeting is at noon");
        assert_eq!(result.compound, 0.0);
        assert!(result.key_words.is_empty());
    }

    #[test]
    fn test_negation_flips_sign() {
        let s = scorer();
        assert!(s.score("good").compound > 0.0);
        assert!(s.score("not good").compound < 0.0);
        assert!(s.score("I don't like it").compound < 0.0);
        assert!(s.score("it is not really good").compound < 0.0);
    }

    #[test]
    fn test_intensifier_increases_magnitude() {
        let s = scorer();
        assert!(s.score("very good").compound > s.score("good").compound);
        assert!(s.score("slightly good").compound < s.score("good").compound);
    }

    #[test]
    fn test_caps_emphasis() {
        let s = scorer();
        assert!(s.score("this is GREAT news").compound > s.score("this is great news").compound);
    }

    #[test]
    fn test_exclamation_emphasis() {
        let s = scorer();
        assert!(s.score("great!!!").compound > s.score("great").compound);
    }

    #[test]
    fn test_but_shifts_weight() {
        let s = scorer();
        // the clause after "but" dominates
        assert!(s.score("the food was good but the service was terrible").compound < 0.0);
    }

    #[test]
    fn test_score_is_bounded_and_deterministic() {
        let s = scorer();
        let text = "GREAT GREAT great amazing wonderful best best best!!!!";
        let first = s.polarity(text);
        assert!((-1.0..=1.0).contains(&first));
        for _ in 0..5 {
            assert_eq!(s.polarity(text), first);
        }
    }

    #[test]
    fn test_version_reported() {
        assert_eq!(scorer().version(), crate::sentiment::LEXICON_VERSION);
    }
}
