//! # Tweet sentiment by time of day
//!
//! Reads a tweet archive, cleans it, buckets every tweet by time of day and
//! season, labels its sentiment and produces complete count tables for
//! reporting.
//!
//! ## Modules
//!
//! - `data` - CSV loading, normalization and text statistics
//! - `bucket` - time-of-day and season buckets
//! - `nlp` - tokenizer and bag-of-words vectorizer
//! - `sentiment` - lexicon scorer, labelers and the word classifier
//! - `aggregate` - cross tabulations and word frequency tables
//! - `pipeline` - the stage driver
//! - `report` - CSV and JSON report files
//! - `utils` - configuration and logging
//!
//! ## Example
//!
//! ```no_run
//! use tweet_sentiment::{Pipeline, PipelineConfig, ReportWriter};
//!
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let output = pipeline.run("data/tweets.csv")?;
//! println!("{} tweets, {} rejected", output.records.len(), output.rejection_count());
//! ReportWriter::new("results").write(&output)?;
//! # Ok::<(), tweet_sentiment::PipelineError>(())
//! ```

pub mod aggregate;
pub mod bucket;
pub mod data;
pub mod error;
pub mod models;
pub mod nlp;
pub mod pipeline;
pub mod report;
pub mod sentiment;
pub mod utils;

pub use aggregate::{cross_tab, label_distribution, word_tables, LabelCount, WordCount, WordTables};
pub use bucket::{classify, classify_datetime, season};
pub use data::{FieldNormalizer, FieldOverflow, LoadStats, LoadedRow, LoaderOptions, TweetLoader};
pub use error::{LexiconError, LoadError, PipelineError, RejectReason, Rejection, Result};
pub use models::{
    AggregateRow, Bucket, Category, CleanRecord, LabeledRecord, RawRecord, Season, SentimentLabel,
};
pub use pipeline::{LoadedArchive, Pipeline, PipelineOutput};
pub use report::ReportWriter;
pub use sentiment::{
    ClassifierLabeler, LexiconLabeler, LexiconScorer, PolarityScorer, SentimentLabeler,
    Thresholds, TweetLexicon, WordClassifier, LEXICON_VERSION,
};
pub use utils::{load_config, PipelineConfig};
