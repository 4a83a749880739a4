//! Data loading and cleaning
//!
//! - `loader` - CSV archive reader with explicit row rejection
//! - `normalizer` - timestamp parsing and text normalization
//! - `features` - text statistics and outlier checks

pub mod features;
pub mod loader;
pub mod normalizer;

pub use features::{detect_outliers_iqr, text_features, OutlierSummary};
pub use loader::{FieldOverflow, LoadStats, LoadedRow, LoaderOptions, RecordStream, TweetLoader};
pub use normalizer::{FieldNormalizer, DEFAULT_TIMESTAMP_FORMAT};
