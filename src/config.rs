//! YAML configuration for the severity service.
//!
//! Every section is optional and falls back to its defaults, so an empty
//! file is a valid config. [`SeverityConfig::load`] additionally layers
//! `TICKET_SEVERITY__*` environment variables on top of the file, with `__`
//! separating nested keys.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! model_dir: "models"
//!
//! language:
//!   min_chars: 3
//!
//! cleaner:
//!   lowercase: true
//!   remove_stopwords: true
//!   max_input_chars: 5000
//!   hindi_stopwords:
//!     file: "lexicons/hindi.txt"
//!
//! embedding:
//!   backend: "http"
//!   api_url: "http://localhost:8080/embed"
//!   api_timeout_secs: 30
//!   retry:
//!     max_retries: 2
//!     base_delay: 200
//!
//! scoring:
//!   scheme: "three_band"
//!   default_confidence: 0.8
//!   variance_ceiling: 50.0
//!
//! batch:
//!   max_concurrency: 4
//!   progress_every: 10
//!
//! logging:
//!   level: "info"
//!   json: false
//!
//! metrics:
//!   stats: true
//!   recent_capacity: 100
//!   recorder: false
//! ```
//!
//! The same batch setting from the environment:
//! `TICKET_SEVERITY__BATCH__MAX_CONCURRENCY=8`.

use std::fs;
use std::path::{Path, PathBuf};

use embedding::EmbeddingConfig;
use preprocess::{CleanerConfig, DetectorConfig};
use scoring::ScoringConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_PREFIX: &str = "TICKET_SEVERITY";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("failed to assemble layered config: {0}")]
    Layered(#[from] config::ConfigError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for the whole prediction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityConfig {
    /// Configuration format version.
    pub version: String,
    /// Directory holding `severity_model.json`, `severity_scaler.json` and
    /// `embeddings_info.json`.
    pub model_dir: PathBuf,
    pub language: DetectorConfig,
    pub cleaner: CleanerConfig,
    pub embedding: EmbeddingConfig,
    pub scoring: ScoringConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            model_dir: PathBuf::from("models"),
            language: DetectorConfig::default(),
            cleaner: CleanerConfig::default(),
            embedding: EmbeddingConfig::default(),
            scoring: ScoringConfig::default(),
            batch: BatchConfig::default(),
            logging: LoggingConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Tickets in flight at once. 1 runs the batch sequentially.
    pub max_concurrency: usize,
    /// Log progress after every this many tickets; 0 disables progress logs.
    pub progress_every: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 1,
            progress_every: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"ticket_severity=debug"`.
    /// `RUST_LOG` wins when set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Keep in-process prediction statistics.
    pub stats: bool,
    /// Recent predictions retained by the statistics sink.
    pub recent_capacity: usize,
    /// Forward to the `metrics` facade (needs the `metrics` feature).
    pub recorder: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            stats: true,
            recent_capacity: 100,
            recorder: false,
        }
    }
}

impl SeverityConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: SeverityConfig = if yaml.trim().is_empty() {
            SeverityConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the optional YAML file, then `TICKET_SEVERITY__*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        Self::layered(path, env_source())
    }

    pub(crate) fn layered(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, ConfigLoadError> {
        let defaults = config::Config::try_from(&SeverityConfig::default())?;
        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(true),
            );
        }
        let config: SeverityConfig = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => {}
            v => return Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }
        if self.model_dir.as_os_str().is_empty() {
            return Err(ConfigLoadError::Validation("model_dir must not be empty".into()));
        }
        if self.language.min_chars == 0 {
            return Err(ConfigLoadError::Validation(
                "language.min_chars must be >= 1".into(),
            ));
        }
        if self.cleaner.max_input_chars == 0 {
            return Err(ConfigLoadError::Validation(
                "cleaner.max_input_chars must be >= 1".into(),
            ));
        }
        self.embedding
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        self.scoring
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        if self.batch.max_concurrency == 0 {
            return Err(ConfigLoadError::Validation(
                "batch.max_concurrency must be >= 1".into(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigLoadError::Validation("logging.level must not be empty".into()));
        }
        Ok(())
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
