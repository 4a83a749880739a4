//! Text features and outlier detection
//!
//! Surface statistics of each tweet and an IQR check over tweet length.

use serde::Serialize;

use crate::models::TextFeatures;

/// Compute surface statistics of a text
pub fn text_features(text: &str) -> TextFeatures {
    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();

    let avg_word_length = if word_count == 0 {
        0.0
    } else {
        let total: usize = words.iter().map(|w| w.chars().count()).sum();
        ((total as f64 / word_count as f64) * 10.0).round() / 10.0
    };

    let punctuation_count = text
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .count();

    TextFeatures {
        length: text.chars().count(),
        word_count,
        avg_word_length,
        punctuation_count,
    }
}

/// Result of an interquartile-range outlier check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierSummary {
    pub q1: f64,
    pub q3: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub outlier_count: usize,
    /// Per-value flag, aligned with the input
    #[serde(skip)]
    pub mask: Vec<bool>,
}

/// Quantile with linear interpolation between closest ranks
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Flag values outside `[Q1 - k*IQR, Q3 + k*IQR]`
pub fn detect_outliers_iqr(values: &[f64], multiplier: f64) -> OutlierSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower_bound = q1 - multiplier * iqr;
    let upper_bound = q3 + multiplier * iqr;

    let mask: Vec<bool> = values
        .iter()
        .map(|&v| v < lower_bound || v > upper_bound)
        .collect();
    let outlier_count = mask.iter().filter(|&&m| m).count();

    OutlierSummary {
        q1,
        q3,
        lower_bound,
        upper_bound,
        outlier_count,
        mask,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_features() {
        let features = text_features(
            "Donald Trump first presidency began in January 2017, and ended in January 2021.",
        );

        assert_eq!(features.word_count, 13);
        assert_eq!(features.punctuation_count, 2);
        assert!((features.avg_word_length - 5.2).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_features() {
        let features = text_features("");
        assert_eq!(features.word_count, 0);
        assert_eq!(features.avg_word_length, 0.0);
    }

    #[test]
    fn test_iqr_outliers() {
        let values = vec![10.0, 11.0, 12.0, 12.0, 13.0, 14.0, 100.0];
        let summary = detect_outliers_iqr(&values, 1.5);

        assert_eq!(summary.outlier_count, 1);
        assert!(summary.mask[6]);
        assert!(!summary.mask[0]);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&sorted, 0.25) - 1.75).abs() < 1e-9);
        assert!((quantile(&sorted, 0.75) - 3.25).abs() < 1e-9);
    }
}
