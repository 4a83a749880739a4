//! Bag-of-words vectorizer
//!
//! Builds a vocabulary from tokenized documents and turns documents into
//! term-count vectors, dense or sparse.

use std::collections::{HashMap, HashSet};

/// Non-zero entries of a count vector as `(column, count)`, ascending by column
pub type SparseVector = Vec<(usize, f64)>;

/// Bag of Words vectorizer
#[derive(Debug, Clone)]
pub struct BagOfWords {
    /// term -> column
    vocabulary: HashMap<String, usize>,
    /// column -> term
    terms: Vec<String>,
    /// Minimum number of documents a term must occur in
    min_df: usize,
    /// Maximum share of documents a term may occur in
    max_df: f64,
    /// Keep only the most frequent terms
    max_features: Option<usize>,
    /// Terms that never enter the vocabulary
    stop_words: HashSet<String>,
}

impl BagOfWords {
    pub fn new() -> Self {
        Self {
            vocabulary: HashMap::new(),
            terms: Vec::new(),
            min_df: 1,
            max_df: 1.0,
            max_features: None,
            stop_words: HashSet::new(),
        }
    }

    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    pub fn with_max_df(mut self, max_df: f64) -> Self {
        self.max_df = max_df;
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Learn the vocabulary
    pub fn fit(&mut self, documents: &[Vec<String>]) {
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        let mut term_freq: HashMap<&str, usize> = HashMap::new();

        for doc in documents {
            let mut seen = HashSet::new();
            for term in doc {
                if self.stop_words.contains(term) {
                    continue;
                }
                *term_freq.entry(term.as_str()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }

        let n_docs = documents.len();
        let max_count = (self.max_df * n_docs as f64).floor() as usize;

        let mut kept: Vec<(&str, usize)> = doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= self.min_df && *df <= max_count)
            .map(|(term, _)| (term, term_freq[term]))
            .collect();

        if let Some(limit) = self.max_features {
            // most frequent first, alphabetical among ties
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            kept.truncate(limit);
        }

        // deterministic column order
        kept.sort_by(|a, b| a.0.cmp(b.0));

        self.vocabulary.clear();
        self.terms.clear();
        for (idx, (term, _)) in kept.into_iter().enumerate() {
            self.vocabulary.insert(term.to_string(), idx);
            self.terms.push(term.to_string());
        }
    }

    /// Non-zero counts of one document
    pub fn transform_sparse(&self, document: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in document {
            if let Some(&idx) = self.vocabulary.get(term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        let mut sparse: SparseVector = counts.into_iter().collect();
        sparse.sort_by_key(|(idx, _)| *idx);
        sparse
    }
}

impl Default for BagOfWords {
    fn default() -> Self {
        Self::new()
    }
}
