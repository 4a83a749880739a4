//! Labeling strategies
//!
//! A [`SentimentLabeler`] turns normalized text into a score and a discrete
//! label. The aggregator only ever sees the label, so strategies are
//! interchangeable.

use serde::{Deserialize, Serialize};

use crate::models::SentimentLabel;

/// Scores at or above this are positive
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Scores at or below this are negative
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Text → polarity score in [-1, 1]
pub trait PolarityScorer {
    fn polarity(&self, text: &str) -> f64;

    /// Identifier of the scoring resources, reported with every run
    fn version(&self) -> String;
}

/// Cut points between the three labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub positive: f64,
    pub negative: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            positive: POSITIVE_THRESHOLD,
            negative: NEGATIVE_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Map a score to a label
    pub fn label(&self, score: f64) -> SentimentLabel {
        if score >= self.positive {
            SentimentLabel::Positive
        } else if score <= self.negative {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Both cut points inside [-1, 1] and negative strictly below positive
    pub fn is_valid(&self) -> bool {
        (-1.0..=1.0).contains(&self.negative)
            && (-1.0..=1.0).contains(&self.positive)
            && self.negative < self.positive
    }
}

/// Score and label of one text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub score: f64,
    pub label: SentimentLabel,
}

/// A labeling strategy
pub trait SentimentLabeler {
    /// Short strategy name
    fn name(&self) -> &str;

    /// Versioned identifier of the model or lexicon behind the labels
    fn version(&self) -> String;

    fn assess(&self, text: &str) -> Assessment;

    fn label(&self, text: &str) -> SentimentLabel {
        self.assess(text).label
    }
}

impl<T: SentimentLabeler + ?Sized> SentimentLabeler for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn version(&self) -> String {
        (**self).version()
    }

    fn assess(&self, text: &str) -> Assessment {
        (**self).assess(text)
    }
}

/// Thresholded polarity scorer
#[derive(Debug, Clone)]
pub struct LexiconLabeler<S> {
    scorer: S,
    thresholds: Thresholds,
}

impl<S: PolarityScorer> LexiconLabeler<S> {
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            thresholds: Thresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }
}

impl<S: PolarityScorer> SentimentLabeler for LexiconLabeler<S> {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn version(&self) -> String {
        self.scorer.version()
    }

    fn assess(&self, text: &str) -> Assessment {
        let score = self.scorer.polarity(text).clamp(-1.0, 1.0);
        Assessment {
            score,
            label: self.thresholds.label(score),
        }
    }
}
