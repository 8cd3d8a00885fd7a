use std::path::PathBuf;

use embedding::EmbeddingError;
use scoring::ScoringError;
use thiserror::Error;

use crate::config::ConfigLoadError;

/// Failures while loading the model bundle from disk.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("required model file missing: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model file {}: {source}", .path.display())]
    Model {
        path: PathBuf,
        #[source]
        source: ScoringError,
    },

    #[error("regressor expects {model}-dim features but embeddings are {embedding}-dim")]
    DimensionMismatch { model: usize, embedding: usize },
}

/// Startup failures. Per-request problems never surface as this type; they
/// become degraded results instead.
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("embedding setup failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("scoring setup failed: {0}")]
    Scoring(#[from] ScoringError),

    #[error("text cleaner setup failed: {0}")]
    Cleaner(#[from] preprocess::CleanError),
}
