//! Aggregation of labeled records into report tables

mod crosstab;
mod words;

pub use crosstab::{cross_tab, label_distribution, total, LabelCount};
pub use words::{word_frequencies, word_tables, WordCount, WordTables};
