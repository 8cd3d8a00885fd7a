use serde::{Deserialize, Serialize};

use crate::error::EmbeddingError;
use crate::retry::RetryConfig;

pub const DEFAULT_MODEL_NAME: &str = "paraphrase-multilingual-MiniLM-L12-v2";
pub const DEFAULT_DIMENSION: usize = 384;

/// Which [`EmbeddingBackend`](crate::EmbeddingBackend) to build.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Deterministic hash-seeded vectors. No network, no model files.
    #[default]
    Stub,
    /// Remote feature-extraction endpoint (`api` feature).
    Http,
}

/// Runtime configuration for the encoder and its backend.
///
/// # Example
/// ```
/// use embedding::{BackendKind, EmbeddingConfig};
///
/// let cfg = EmbeddingConfig {
///     backend: BackendKind::Http,
///     api_url: Some("http://localhost:8080/embed".into()),
///     ..Default::default()
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: BackendKind,
    /// Label stamped on every [`Embedding`](crate::Embedding).
    pub model_name: String,
    /// Length every vector must have.
    pub dimension: usize,
    /// L2-normalize vectors after the backend returns them.
    pub normalize: bool,
    /// Texts per backend call in `encode_batch`.
    pub batch_size: usize,
    /// Endpoint for the http backend.
    pub api_url: Option<String>,
    /// Sent verbatim as the `Authorization` header (e.g. `"Bearer hf_xxx"`).
    pub api_auth_header: Option<String>,
    pub api_timeout_secs: u64,
    pub retry: RetryConfig,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Stub,
            model_name: DEFAULT_MODEL_NAME.into(),
            dimension: DEFAULT_DIMENSION,
            normalize: false,
            batch_size: 32,
            api_url: None,
            api_auth_header: None,
            api_timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

impl EmbeddingConfig {
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.model_name.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig("model_name must not be empty".into()));
        }
        if self.dimension == 0 {
            return Err(EmbeddingError::InvalidConfig("dimension must be >= 1".into()));
        }
        if self.batch_size == 0 {
            return Err(EmbeddingError::InvalidConfig("batch_size must be >= 1".into()));
        }
        if self.backend == BackendKind::Http {
            if self.api_url.as_deref().is_none_or(|u| u.trim().is_empty()) {
                return Err(EmbeddingError::InvalidConfig(
                    "api_url is required for the http backend".into(),
                ));
            }
            if self.api_timeout_secs == 0 {
                return Err(EmbeddingError::InvalidConfig(
                    "api_timeout_secs must be >= 1".into(),
                ));
            }
        }
        Ok(())
    }
}
