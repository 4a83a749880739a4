//! Data types shared by the pipeline stages

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A row exactly as it was read from the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 1-based physical line of the row in the source file
    pub line: u64,
    pub id: String,
    pub timestamp: String,
    pub url: String,
    pub text: String,
}

/// A record that passed validation and text normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    /// Unique tweet identifier
    pub id: String,
    /// Parsed publication time
    pub timestamp: NaiveDateTime,
    /// Normalized text used for scoring
    pub text: String,
    /// Text as it appeared in the source
    pub original_text: String,
}

/// Fixed enumeration of buckets, iterated in report order
pub trait Bucket: Copy + Eq + Ord + fmt::Debug + 'static {
    /// All variants in report order
    const ALL: &'static [Self];

    /// Lowercase name used in tables
    fn name(&self) -> &'static str;
}

/// Time-of-day category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// 00:00:00 up to (excluding) 08:00:00
    Overnight,
    /// 08:00:00 through 16:00:00 inclusive
    Daytime,
    /// After 16:00:00 until midnight
    Nighttime,
}

impl Bucket for Category {
    const ALL: &'static [Self] = &[Category::Overnight, Category::Daytime, Category::Nighttime];

    fn name(&self) -> &'static str {
        match self {
            Category::Overnight => "overnight",
            Category::Daytime => "daytime",
            Category::Nighttime => "nighttime",
        }
    }
}

/// Meteorological season grouped by calendar quarter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Bucket for Season {
    const ALL: &'static [Self] = &[Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    fn name(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

/// Discrete sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Labels in report order
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// One cell of a bucket × label cross tabulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateRow<B> {
    pub category: B,
    pub label: SentimentLabel,
    pub count: usize,
}

/// Simple surface statistics of a tweet text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextFeatures {
    /// Character count
    pub length: usize,
    /// Whitespace separated words
    pub word_count: usize,
    /// Mean word length rounded to one decimal
    pub avg_word_length: f64,
    /// Characters that are neither alphanumeric nor whitespace
    pub punctuation_count: usize,
}

/// Word with its contribution to a polarity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredWord {
    pub word: String,
    pub score: f64,
}

/// A clean record with every derived field attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledRecord {
    pub record: CleanRecord,
    pub category: Category,
    pub season: Season,
    /// Polarity score in [-1, 1]
    pub score: f64,
    pub label: SentimentLabel,
    pub features: TextFeatures,
}
