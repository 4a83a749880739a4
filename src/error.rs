//! Error types for the tweet sentiment pipeline

use std::path::PathBuf;
use thiserror::Error;

use crate::sentiment::ClassifierError;
use crate::utils::ConfigError;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Fatal failures of the record loader
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("header of {} does not match id,timestamp,url,text (missing {missing:?}, found {found:?})", path.display())]
    HeaderMismatch {
        path: PathBuf,
        missing: Vec<&'static str>,
        found: Vec<String>,
    },

    #[error("CSV error in {} near line {line}: {source}", path.display())]
    Csv {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },
}

/// The sentiment lexicon could not be provided as pinned
#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("lexicon file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read lexicon {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed lexicon entry at line {line}: {entry:?}")]
    Malformed { line: usize, entry: String },

    #[error("lexicon has no '# version:' header")]
    MissingVersion,

    #[error("lexicon version mismatch: pinned {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },
}

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("sentiment lexicon unavailable: {0}")]
    LexiconUnavailable(#[from] LexiconError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a row was excluded from further processing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("field '{field}' is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("empty id")]
    EmptyId,

    #[error("unparsable timestamp {value:?}")]
    InvalidTimestamp { value: String },

    #[error("text is empty after normalization")]
    EmptyText,

    #[error("duplicate id")]
    DuplicateId,

    #[error("duplicate text")]
    DuplicateText,
}

impl RejectReason {
    /// Stable short key used in summaries
    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::FieldCount { .. } => "field_count",
            RejectReason::InvalidUtf8 { .. } => "invalid_utf8",
            RejectReason::EmptyId => "empty_id",
            RejectReason::InvalidTimestamp { .. } => "invalid_timestamp",
            RejectReason::EmptyText => "empty_text",
            RejectReason::DuplicateId => "duplicate_id",
            RejectReason::DuplicateText => "duplicate_text",
        }
    }
}

/// A row excluded from the clean set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Physical line of the row in the source file
    pub line: u64,
    /// Raw id when the row got far enough to have one
    pub id: Option<String>,
    pub reason: RejectReason,
}

impl Rejection {
    pub fn new(line: u64, id: Option<String>, reason: RejectReason) -> Self {
        Self { line, id, reason }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.id {
            Some(id) => write!(f, "line {} (id {}): {}", self.line, id, self.reason),
            None => write!(f, "line {}: {}", self.line, self.reason),
        }
    }
}
