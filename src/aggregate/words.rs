//! Word frequency tables per sentiment label

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{LabeledRecord, SentimentLabel};
use crate::nlp::Tokenizer;

/// A token and how often it occurs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Most frequent words of each label
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WordTables {
    pub positive: Vec<WordCount>,
    pub neutral: Vec<WordCount>,
    pub negative: Vec<WordCount>,
}

impl WordTables {
    pub fn for_label(&self, label: SentimentLabel) -> &[WordCount] {
        match label {
            SentimentLabel::Positive => &self.positive,
            SentimentLabel::Neutral => &self.neutral,
            SentimentLabel::Negative => &self.negative,
        }
    }
}

/// Top `n` tokens across texts, stop words removed
///
/// Ties are broken alphabetically so the table is stable between runs.
pub fn word_frequencies<'a, I>(texts: I, n: usize) -> Vec<WordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let tokenizer = Tokenizer::new().with_stopwords_removed(true);
    let mut counts: HashMap<String, usize> = HashMap::new();

    for text in texts {
        for token in tokenizer.tokenize(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut table: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    table.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    table.truncate(n);
    table
}

/// Word tables for each label
pub fn word_tables(records: &[LabeledRecord], n: usize) -> WordTables {
    let for_label = |label: SentimentLabel| {
        word_frequencies(
            records
                .iter()
                .filter(|r| r.label == label)
                .map(|r| r.record.text.as_str()),
            n,
        )
    };

    WordTables {
        positive: for_label(SentimentLabel::Positive),
        neutral: for_label(SentimentLabel::Neutral),
        negative: for_label(SentimentLabel::Negative),
    }
}
