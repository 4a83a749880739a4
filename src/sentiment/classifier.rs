//! Word classifier trained from weak labels
//!
//! Tweets get a weak label from word lists, labeled tweets are turned into
//! bag-of-words counts, and a logistic regression learns which words push a
//! tweet towards positive. The fitted model can then label any text, and its
//! coefficients rank the most sentiment-bearing words.

use std::collections::HashSet;

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{ScoredWord, SentimentLabel};
use crate::nlp::{BagOfWords, SparseVector, Tokenizer, STOPWORDS};
use crate::sentiment::labeler::{Assessment, SentimentLabeler};
use crate::sentiment::logistic::LogisticRegression;
use crate::sentiment::weak::weak_label;

/// Errors for the word classifier
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Model has not been fitted yet")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Not enough labeled tweets: {labeled}, need at least {required}")]
    InsufficientData { labeled: usize, required: usize },

    #[error("Weak labels contain only {0} tweets")]
    SingleClass(SentimentLabel),

    #[error("No term passes the document frequency filters")]
    EmptyVocabulary,

    #[error("Invalid training option: {0}")]
    InvalidOption(String),
}

/// Training parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingOptions {
    /// Vocabulary size limit
    pub max_features: usize,
    /// Minimum number of tweets a term must occur in
    pub min_df: usize,
    /// Maximum share of tweets a term may occur in
    pub max_df: f64,
    /// Share of labeled tweets held out for the accuracy estimate
    pub test_size: f64,
    pub seed: u64,
    /// Inverse regularization strength
    pub c: f64,
    pub learning_rate: f64,
    pub max_iter: usize,
    pub tolerance: f64,
    /// Probabilities within this distance of 0.5 are neutral
    pub neutral_margin: f64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            max_features: 5000,
            min_df: 5,
            max_df: 0.95,
            test_size: 0.2,
            seed: 42,
            c: 1.0,
            learning_rate: 0.1,
            max_iter: 500,
            tolerance: 1e-6,
            neutral_margin: 0.1,
        }
    }
}

impl TrainingOptions {
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if !(0.0..1.0).contains(&self.test_size) {
            return Err(ClassifierError::InvalidOption(format!(
                "test_size must be in [0, 1), got {}",
                self.test_size
            )));
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(ClassifierError::InvalidOption(format!(
                "max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        if self.c <= 0.0 || self.learning_rate <= 0.0 {
            return Err(ClassifierError::InvalidOption(
                "c and learning_rate must be positive".to_string(),
            ));
        }
        if !(0.0..0.5).contains(&self.neutral_margin) {
            return Err(ClassifierError::InvalidOption(format!(
                "neutral_margin must be in [0, 0.5), got {}",
                self.neutral_margin
            )));
        }
        Ok(())
    }
}

/// Highest-ranked words of a fitted classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopWords {
    /// Largest coefficients first
    pub positive: Vec<ScoredWord>,
    /// Most negative coefficients first, as magnitudes
    pub negative: Vec<ScoredWord>,
    /// Words present in both lists
    pub overlap: Vec<String>,
}

/// Trainer
#[derive(Debug, Clone, Default)]
pub struct WordClassifier {
    options: TrainingOptions,
}

impl WordClassifier {
    pub fn new(options: TrainingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TrainingOptions {
        &self.options
    }

    /// Weak-label the texts and fit a model on the labeled ones
    pub fn train<S: AsRef<str>>(&self, texts: &[S]) -> Result<TrainedClassifier, ClassifierError> {
        self.options.validate()?;

        let tokenizer = Tokenizer::new();
        let mut documents = Vec::new();
        let mut targets = Vec::new();

        for text in texts {
            if let Some(label) = weak_label(text.as_ref()) {
                documents.push(tokenizer.tokenize(text.as_ref()));
                targets.push(if label == SentimentLabel::Positive { 1.0 } else { 0.0 });
            }
        }

        let n_positive = targets.iter().filter(|t| **t == 1.0).count();
        let n_negative = targets.len() - n_positive;
        info!(
            "Labeled tweets: {} out of {} ({} positive, {} negative)",
            targets.len(),
            texts.len(),
            n_positive,
            n_negative
        );

        if targets.len() < 2 {
            return Err(ClassifierError::InsufficientData {
                labeled: targets.len(),
                required: 2,
            });
        }
        if n_negative == 0 {
            return Err(ClassifierError::SingleClass(SentimentLabel::Positive));
        }
        if n_positive == 0 {
            return Err(ClassifierError::SingleClass(SentimentLabel::Negative));
        }

        let mut vectorizer = BagOfWords::new()
            .with_stop_words(STOPWORDS.iter().copied())
            .with_min_df(self.options.min_df)
            .with_max_df(self.options.max_df)
            .with_max_features(self.options.max_features);
        vectorizer.fit(&documents);

        if vectorizer.n_terms() == 0 {
            return Err(ClassifierError::EmptyVocabulary);
        }

        let rows: Vec<SparseVector> = documents.iter().map(|d| vectorizer.transform_sparse(d)).collect();
        let (train_idx, test_idx) = stratified_split(&targets, self.options.test_size, self.options.seed);

        let x_train: Vec<SparseVector> = train_idx.iter().map(|&i| rows[i].clone()).collect();
        let y_train = Array1::from_iter(train_idx.iter().map(|&i| targets[i]));

        let mut model = LogisticRegression::new(
            self.options.learning_rate,
            self.options.max_iter,
            self.options.tolerance,
            self.options.c,
        );
        model.fit(&x_train, &y_train, vectorizer.n_terms())?;

        let accuracy = if test_idx.is_empty() {
            None
        } else {
            let x_test: Vec<SparseVector> = test_idx.iter().map(|&i| rows[i].clone()).collect();
            let y_test = Array1::from_iter(test_idx.iter().map(|&i| targets[i]));
            Some(model.score(&x_test, &y_test)?)
        };

        match accuracy {
            Some(acc) => info!("Model accuracy: {:.4}", acc),
            None => info!("No held-out tweets, accuracy not estimated"),
        }

        Ok(TrainedClassifier {
            tokenizer,
            vectorizer,
            model,
            accuracy,
            n_labeled: targets.len(),
            n_positive,
            n_negative,
            seed: self.options.seed,
        })
    }
}

/// Split indices into train and test sets, preserving the class ratio
///
/// Each class is shuffled with the seeded generator and contributes
/// `round(test_size * class_size)` rows to the test set, always leaving at
/// least one row of the class for training.
fn stratified_split(targets: &[f64], test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [0.0, 1.0] {
        let mut members: Vec<usize> = targets
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == class)
            .map(|(i, _)| i)
            .collect();
        members.shuffle(&mut rng);

        let n_test = ((members.len() as f64 * test_size).round() as usize).min(members.len().saturating_sub(1));
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

/// A fitted word classifier
#[derive(Debug, Clone)]
pub struct TrainedClassifier {
    tokenizer: Tokenizer,
    vectorizer: BagOfWords,
    model: LogisticRegression,
    accuracy: Option<f64>,
    n_labeled: usize,
    n_positive: usize,
    n_negative: usize,
    seed: u64,
}

impl TrainedClassifier {
    /// Held-out accuracy, `None` when nothing was held out
    pub fn accuracy(&self) -> Option<f64> {
        self.accuracy
    }

    pub fn n_labeled(&self) -> usize {
        self.n_labeled
    }

    pub fn class_counts(&self) -> (usize, usize) {
        (self.n_positive, self.n_negative)
    }

    /// Probability that a text is positive, `None` when no term is in the vocabulary
    pub fn probability(&self, text: &str) -> Result<Option<f64>, ClassifierError> {
        let row = self.vectorizer.transform_sparse(&self.tokenizer.tokenize(text));
        if row.is_empty() {
            return Ok(None);
        }
        self.model.predict_proba(&row).map(Some)
    }

    /// Top `n` words per direction by coefficient
    pub fn top_words(&self, n: usize) -> Result<TopWords, ClassifierError> {
        let coefs = self.model.coefficients.as_ref().ok_or(ClassifierError::NotFitted)?;
        let terms = self.vectorizer.terms();

        let mut order: Vec<usize> = (0..coefs.len()).collect();
        order.sort_by(|&a, &b| coefs[a].total_cmp(&coefs[b]).then_with(|| terms[a].cmp(&terms[b])));

        let positive: Vec<ScoredWord> = order
            .iter()
            .rev()
            .take(n)
            .map(|&i| ScoredWord {
                word: terms[i].clone(),
                score: coefs[i],
            })
            .collect();

        let negative: Vec<ScoredWord> = order
            .iter()
            .take(n)
            .map(|&i| ScoredWord {
                word: terms[i].clone(),
                score: coefs[i].abs(),
            })
            .collect();

        let positive_set: HashSet<&str> = positive.iter().map(|w| w.word.as_str()).collect();
        let mut overlap: Vec<String> = negative
            .iter()
            .filter(|w| positive_set.contains(w.word.as_str()))
            .map(|w| w.word.clone())
            .collect();
        overlap.sort();

        Ok(TopWords {
            positive,
            negative,
            overlap,
        })
    }

    pub fn version(&self) -> String {
        format!(
            "word-logreg:terms={}:labeled={}:seed={}",
            self.vectorizer.n_terms(),
            self.n_labeled,
            self.seed
        )
    }
}

/// Labeler backed by a trained classifier
///
/// The score is `2p - 1` for the positive-class probability `p`. Texts with
/// no known vocabulary score 0 and are neutral.
#[derive(Debug, Clone)]
pub struct ClassifierLabeler {
    classifier: TrainedClassifier,
    neutral_margin: f64,
}

impl ClassifierLabeler {
    pub fn new(classifier: TrainedClassifier, neutral_margin: f64) -> Self {
        Self {
            classifier,
            neutral_margin,
        }
    }
}

impl SentimentLabeler for ClassifierLabeler {
    fn name(&self) -> &str {
        "classifier"
    }

    fn version(&self) -> String {
        self.classifier.version()
    }

    fn assess(&self, text: &str) -> Assessment {
        let probability = match self.classifier.probability(text) {
            Ok(probability) => probability,
            Err(err) => {
                debug_assert!(false, "trained classifier failed to score: {}", err);
                warn!(error = %err, "Classifier could not score text, labeling neutral");
                None
            }
        };

        let Some(p) = probability else {
            return Assessment {
                score: 0.0,
                label: SentimentLabel::Neutral,
            };
        };

        let label = if p >= 0.5 + self.neutral_margin {
            SentimentLabel::Positive
        } else if p <= 0.5 - self.neutral_margin {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };

        Assessment {
            score: (2.0 * p - 1.0).clamp(-1.0, 1.0),
            label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        let mut texts = Vec::new();
        for i in 0..12 {
            texts.push(format!("Great economy and tremendous jobs numbers {}", i));
            texts.push(format!("Terrible border crisis and fake witch hunt {}", i));
        }
        texts.push("Meeting with the governor at noon".to_string());
        texts
    }

    fn options() -> TrainingOptions {
        TrainingOptions {
            min_df: 1,
            ..TrainingOptions::default()
        }
    }

    #[test]
    fn test_train_and_label() {
        let trained = WordClassifier::new(options()).train(&corpus()).unwrap();

        assert_eq!(trained.n_labeled(), 24);
        assert_eq!(trained.class_counts(), (12, 12));
        assert_eq!(trained.accuracy(), Some(1.0));

        let labeler = ClassifierLabeler::new(trained, 0.1);
        assert_eq!(labeler.label("the economy is great"), SentimentLabel::Positive);
        assert_eq!(labeler.label("border crisis"), SentimentLabel::Negative);
    }

    #[test]
    fn test_unknown_vocabulary_is_neutral() {
        let trained = WordClassifier::new(options()).train(&corpus()).unwrap();
        let labeler = ClassifierLabeler::new(trained, 0.1);

        let assessment = labeler.assess("zzz qqq");
        assert_eq!(assessment.label, SentimentLabel::Neutral);
        assert_eq!(assessment.score, 0.0);
    }

    #[test]
    fn test_top_words() {
        let trained = WordClassifier::new(options()).train(&corpus()).unwrap();
        let top = trained.top_words(3).unwrap();

        assert_eq!(top.positive.len(), 3);
        assert_eq!(top.negative.len(), 3);
        assert!(top.overlap.is_empty());

        let negative: Vec<&str> = top.negative.iter().map(|w| w.word.as_str()).collect();
        assert!(negative.iter().all(|w| ["terrible", "border", "crisis", "fake", "witch", "hunt"].contains(w)));
        assert!(top.negative.iter().all(|w| w.score >= 0.0));
    }

    #[test]
    fn test_training_is_reproducible() {
        let first = WordClassifier::new(options()).train(&corpus()).unwrap();
        let second = WordClassifier::new(options()).train(&corpus()).unwrap();

        assert_eq!(first.version(), second.version());
        assert_eq!(
            first.probability("great jobs").unwrap(),
            second.probability("great jobs").unwrap()
        );
    }

    #[test]
    fn test_single_class_rejected() {
        let texts = vec!["great win", "amazing success"];
        let err = WordClassifier::new(options()).train(&texts).unwrap_err();
        assert!(matches!(err, ClassifierError::SingleClass(SentimentLabel::Positive)));
    }

    #[test]
    fn test_insufficient_data() {
        let texts = vec!["meeting at noon", "great day"];
        let err = WordClassifier::new(options()).train(&texts).unwrap_err();
        assert!(matches!(err, ClassifierError::InsufficientData { labeled: 1, .. }));
    }

    #[test]
    fn test_stratified_split_is_seeded() {
        let targets = vec![1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let (train_a, test_a) = stratified_split(&targets, 0.2, 42);
        let (train_b, test_b) = stratified_split(&targets, 0.2, 42);

        assert_eq!(test_a, test_b);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a.len(), 2);
        assert_eq!(test_a.iter().filter(|&&i| targets[i] == 1.0).count(), 1);
    }

    #[test]
    fn test_invalid_options() {
        let bad = TrainingOptions {
            test_size: 1.0,
            ..TrainingOptions::default()
        };
        assert!(matches!(bad.validate(), Err(ClassifierError::InvalidOption(_))));
    }
}
