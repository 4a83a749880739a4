//! Sentiment labeling
//!
//! - `lexicon` - versioned valence lexicon
//! - `analyzer` - rule-based polarity scorer over the lexicon
//! - `labeler` - score thresholds and the labeling strategy trait
//! - `weak` - word-list weak labels
//! - `classifier` - logistic regression word classifier trained from weak labels

mod analyzer;
mod classifier;
mod labeler;
mod lexicon;
mod logistic;
mod weak;

pub use analyzer::{LexiconScorer, PolarityScore};
pub use classifier::{
    ClassifierError, ClassifierLabeler, TopWords, TrainedClassifier, TrainingOptions, WordClassifier,
};
pub use labeler::{
    Assessment, LexiconLabeler, PolarityScorer, SentimentLabeler, Thresholds, NEGATIVE_THRESHOLD,
    POSITIVE_THRESHOLD,
};
pub use lexicon::{SentimentLexicon, TweetLexicon, LEXICON_VERSION};
pub use logistic::LogisticRegression;
pub use weak::{weak_label, NEGATIVE_WORDS, POSITIVE_WORDS};
