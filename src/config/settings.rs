// src/config/settings.rs
//
// Service configuration and the immutable per-call pipeline configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::policy::DurationBounds;

/// Sample rates accepted by a default installation
pub const DEFAULT_ALLOWED_RATES: [u32; 8] = [1000, 2000, 4000, 8000, 16000, 22050, 44100, 48000];
/// Default intended output rate
pub const DEFAULT_TARGET_RATE: u32 = 8000;
/// Default upload size limit (32 MiB)
pub const DEFAULT_MAX_CONTENT_LENGTH: u64 = 32 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration passed explicitly into every `characterize` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Intended output sample rate
    pub target_rate: u32,
    /// Exact sample rates accepted by validation
    pub allowed_rates: BTreeSet<u32>,
    /// Inclusive duration window
    pub duration_bounds: DurationBounds,
}

impl PipelineConfig {
    pub fn new(target_rate: u32, allowed_rates: impl IntoIterator<Item = u32>) -> Self {
        Self {
            target_rate,
            allowed_rates: allowed_rates.into_iter().collect(),
            duration_bounds: DurationBounds::default(),
        }
    }

    pub fn with_duration_bounds(mut self, min_secs: f64, max_secs: f64) -> Self {
        self.duration_bounds = DurationBounds { min_secs, max_secs };
        self
    }
}

/// Settings for the upload service around the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub allowed_sample_rates: BTreeSet<u32>,
    pub target_sample_rate: u32,
    /// Largest accepted upload, in bytes
    pub max_content_length: u64,
    /// Lowercase file extensions accepted at intake
    pub allowed_extensions: BTreeSet<String>,
    /// Where placed uploads are stored
    pub upload_folder: PathBuf,
    /// JSON-lines record store
    pub store_path: PathBuf,
    pub min_duration_secs: f64,
    pub max_duration_secs: f64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        let bounds = DurationBounds::default();
        Self {
            allowed_sample_rates: DEFAULT_ALLOWED_RATES.into_iter().collect(),
            target_sample_rate: DEFAULT_TARGET_RATE,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            allowed_extensions: ["wav".to_string()].into_iter().collect(),
            upload_folder: PathBuf::from("uploads"),
            store_path: PathBuf::from("app.jsonl"),
            min_duration_secs: bounds.min_secs,
            max_duration_secs: bounds.max_secs,
        }
    }
}

impl IngestConfig {
    /// Load from a JSON file; missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.check()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// `<config dir>/wavintake/config.json`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wavintake").join("config.json"))
    }

    /// Load the file at `default_path()` if it exists, otherwise defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if self.target_sample_rate == 0 {
            return Err(ConfigError::Invalid("target sample rate must be positive".into()));
        }
        if self.allowed_sample_rates.contains(&0) {
            return Err(ConfigError::Invalid("allowed sample rates must be positive".into()));
        }
        if !(self.min_duration_secs <= self.max_duration_secs) {
            return Err(ConfigError::Invalid(format!(
                "duration window is empty: {} > {}",
                self.min_duration_secs, self.max_duration_secs
            )));
        }
        Ok(())
    }

    /// Snapshot of the values the pipeline needs
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig::new(self.target_sample_rate, self.allowed_sample_rates.iter().copied())
            .with_duration_bounds(self.min_duration_secs, self.max_duration_secs)
    }

    pub fn is_extension_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions.contains(&extension.to_lowercase())
    }
}

/// Builder for overriding individual settings
#[derive(Debug, Clone, Default)]
pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn target_rate(mut self, rate: u32) -> Self {
        self.config.target_sample_rate = rate;
        self
    }

    pub fn allowed_rates(mut self, rates: impl IntoIterator<Item = u32>) -> Self {
        self.config.allowed_sample_rates = rates.into_iter().collect();
        self
    }

    pub fn max_content_length(mut self, bytes: u64) -> Self {
        self.config.max_content_length = bytes;
        self
    }

    pub fn allow_extension(mut self, extension: &str) -> Self {
        self.config.allowed_extensions.insert(extension.to_lowercase());
        self
    }

    pub fn upload_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.config.upload_folder = folder.into();
        self
    }

    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store_path = path.into();
        self
    }

    pub fn duration_bounds(mut self, min_secs: f64, max_secs: f64) -> Self {
        self.config.min_duration_secs = min_secs;
        self.config.max_duration_secs = max_secs;
        self
    }

    pub fn build(self) -> Result<IngestConfig, ConfigError> {
        self.config.check()?;
        Ok(self.config)
    }
}
