//! Configuration utilities

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::{FieldOverflow, LoaderOptions, DEFAULT_TIMESTAMP_FORMAT};
use crate::sentiment::{Thresholds, TrainingOptions, LEXICON_VERSION};

/// Pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Reading the archive
    pub input: InputSettings,
    /// Record validation and text normalization
    pub cleaning: CleaningSettings,
    /// Scoring and labeling
    pub sentiment: SentimentSettings,
    /// Supervised word classifier
    pub classifier: TrainingOptions,
    /// Report tables
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// Archive reading settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// chrono format of the timestamp column
    pub timestamp_format: String,
    /// Handling of rows with surplus fields
    pub overflow: FieldOverflow,
    /// Stop after this many data rows
    pub row_limit: Option<usize>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            overflow: FieldOverflow::default(),
            row_limit: None,
        }
    }
}

impl InputSettings {
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            overflow: self.overflow,
            row_limit: self.row_limit,
        }
    }
}

/// Cleaning settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningSettings {
    /// Remove @handles from the text
    pub strip_mentions: bool,
    /// Decode `&amp;` and friends
    pub decode_entities: bool,
    /// Reject records whose normalized text was already seen
    pub drop_duplicate_text: bool,
}

impl Default for CleaningSettings {
    fn default() -> Self {
        Self {
            strip_mentions: true,
            decode_entities: true,
            drop_duplicate_text: false,
        }
    }
}

/// Which labeling strategy a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelerKind {
    /// Lexicon scorer with score thresholds
    #[default]
    Lexicon,
    /// Word classifier trained from weak labels on the same archive
    Classifier,
}

/// Sentiment settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentSettings {
    pub labeler: LabelerKind,
    /// External lexicon file; the embedded lexicon is used when unset
    pub lexicon_path: Option<PathBuf>,
    /// Version an external lexicon must declare
    pub lexicon_version: Option<String>,
    pub thresholds: Thresholds,
}

impl Default for SentimentSettings {
    fn default() -> Self {
        Self {
            labeler: LabelerKind::default(),
            lexicon_path: None,
            lexicon_version: Some(LEXICON_VERSION.to_string()),
            thresholds: Thresholds::default(),
        }
    }
}

/// Report settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Rows per word frequency table
    pub top_words: usize,
    /// IQR multiplier for tweet length outliers
    pub outlier_multiplier: f64,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            top_words: 50,
            outlier_multiplier: 1.5,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Check values that deserialize fine but make no sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.timestamp_format.trim().is_empty() {
            return Err(ConfigError::Invalid("input.timestamp_format is empty".to_string()));
        }
        if self.input.row_limit == Some(0) {
            return Err(ConfigError::Invalid("input.row_limit must be positive".to_string()));
        }
        if !self.sentiment.thresholds.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "sentiment.thresholds must satisfy -1 <= negative < positive <= 1, got {:?}",
                self.sentiment.thresholds
            )));
        }
        if !(self.output.outlier_multiplier.is_finite() && self.output.outlier_multiplier >= 0.0) {
            return Err(ConfigError::Invalid(
                "output.outlier_multiplier must be a non-negative number".to_string(),
            ));
        }
        if crate::utils::parse_level(&self.logging.level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "logging.level '{}' is not a log level",
                self.logging.level
            )));
        }
        self.classifier
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("classifier: {}", e)))
    }
}

/// Load configuration from file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let content = std::fs::read_to_string(path.as_ref())
        .map_err(|e| ConfigError::FileError(format!("{}: {}", path.as_ref().display(), e)))?;

    let config: PipelineConfig = match extension(path.as_ref()) {
        "json" => serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?,
        "toml" => toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?,
        "yaml" | "yml" => {
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?
        }
        ext => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
    };

    config.validate()?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config<P: AsRef<Path>>(config: &PipelineConfig, path: P) -> Result<(), ConfigError> {
    let content = match extension(path.as_ref()) {
        "json" => serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?,
        "toml" => toml::to_string_pretty(config)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?,
        "yaml" | "yml" => serde_yaml::to_string(config)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?,
        ext => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
    };

    std::fs::write(path, content).map_err(|e| ConfigError::FileError(e.to_string()))
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),
    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Serialization error
    #[error("Serialize error: {0}")]
    SerializeError(String),
    /// Unsupported format
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
    /// Value out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();

        assert_eq!(config.input.timestamp_format, "%Y-%m-%dT%H:%M:%S");
        assert_eq!(config.input.overflow, FieldOverflow::JoinText);
        assert_eq!(config.sentiment.labeler, LabelerKind::Lexicon);
        assert_eq!(config.sentiment.thresholds.positive, 0.05);
        assert_eq!(config.classifier.seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[input]\nrow_limit = 100\n\n[cleaning]\ndrop_duplicate_text = true").unwrap();

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.input.row_limit, Some(100));
        assert!(config.cleaning.drop_duplicate_text);
        assert!(config.cleaning.strip_mentions);
        assert_eq!(config.output.top_words, 50);
    }

    #[test]
    fn test_yaml_and_json() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml, "sentiment:\n  labeler: classifier\n  thresholds:\n    positive: 0.1\n    negative: -0.1").unwrap();
        let config = load_config(yaml.path()).unwrap();
        assert_eq!(config.sentiment.labeler, LabelerKind::Classifier);
        assert_eq!(config.sentiment.thresholds.negative, -0.1);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(json, r#"{{"input": {{"overflow": "reject"}}}}"#).unwrap();
        let config = load_config(json.path()).unwrap();
        assert_eq!(config.input.overflow, FieldOverflow::Reject);
    }

    #[test]
    fn test_partial_thresholds_table() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[sentiment.thresholds]\npositive = 0.2").unwrap();

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.sentiment.thresholds.positive, 0.2);
        assert_eq!(config.sentiment.thresholds.negative, -0.05);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = PipelineConfig::default();
        config.sentiment.thresholds = Thresholds {
            positive: -0.2,
            negative: 0.2,
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unsupported_format() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "ini"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");

        let mut config = PipelineConfig::default();
        config.output.top_words = 20;
        save_config(&config, &path).unwrap();

        assert_eq!(load_config(&path).unwrap(), config);
    }
}
