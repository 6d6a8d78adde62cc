//! Configuration module for wavintake

mod settings;

pub use settings::{
    ConfigError, IngestConfig, IngestConfigBuilder, PipelineConfig, DEFAULT_ALLOWED_RATES,
    DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_TARGET_RATE,
};
