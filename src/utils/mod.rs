//! Utility modules for common functionality

pub mod config;
pub mod logging;

pub use config::{
    load_config, save_config, CleaningSettings, ConfigError, InputSettings, LabelerKind,
    LoggingSettings, OutputSettings, PipelineConfig, SentimentSettings,
};
pub use logging::{init_logging, parse_level};
