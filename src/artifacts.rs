//! The trained model bundle: regressor, fitted scaler and embedding metadata.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use embedding::{DEFAULT_DIMENSION, DEFAULT_MODEL_NAME};
use scoring::{Regressor, RegressorModel, ScoringError, SeverityScaler};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ArtifactError;

pub const MODEL_FILE: &str = "severity_model.json";
pub const SCALER_FILE: &str = "severity_scaler.json";
pub const EMBEDDINGS_INFO_FILE: &str = "embeddings_info.json";

/// Which sentence-embedding model the regressor was trained on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingsInfo {
    pub model_name: String,
    pub embedding_dim: usize,
}

impl Default for EmbeddingsInfo {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            embedding_dim: DEFAULT_DIMENSION,
        }
    }
}

/// Everything loaded once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct ModelArtifacts {
    regressor: Arc<dyn Regressor>,
    scaler: SeverityScaler,
    embeddings: EmbeddingsInfo,
    source_dir: Option<PathBuf>,
}

impl std::fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("regressor", &self.regressor.info())
            .field("scaler", &self.scaler)
            .field("embeddings", &self.embeddings)
            .field("source_dir", &self.source_dir)
            .finish()
    }
}

impl ModelArtifacts {
    /// Bundles in-memory parts, checking that the regressor accepts vectors of
    /// the embedding dimension.
    pub fn new(
        regressor: Arc<dyn Regressor>,
        scaler: SeverityScaler,
        embeddings: EmbeddingsInfo,
    ) -> Result<Self, ArtifactError> {
        scaler.validate().map_err(|source| ArtifactError::Model {
            path: PathBuf::from(SCALER_FILE),
            source,
        })?;
        if regressor.expected_dim() != embeddings.embedding_dim {
            return Err(ArtifactError::DimensionMismatch {
                model: regressor.expected_dim(),
                embedding: embeddings.embedding_dim,
            });
        }
        Ok(Self {
            regressor,
            scaler,
            embeddings,
            source_dir: None,
        })
    }

    /// Reads the bundle from `dir`.
    ///
    /// The model and scaler files are required. A missing
    /// `embeddings_info.json` falls back to the default multilingual model
    /// with a warning; a present but unreadable one is an error.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let model_path = dir.join(MODEL_FILE);
        let regressor = RegressorModel::load(&model_path)
            .map_err(|e| scoring_error(&model_path, e))?;

        let scaler_path = dir.join(SCALER_FILE);
        let scaler =
            SeverityScaler::load(&scaler_path).map_err(|e| scoring_error(&scaler_path, e))?;

        let info_path = dir.join(EMBEDDINGS_INFO_FILE);
        let embeddings = match fs::read(&info_path) {
            Ok(bytes) => serde_json::from_slice::<EmbeddingsInfo>(&bytes).map_err(|source| {
                ArtifactError::Parse {
                    path: info_path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let fallback = EmbeddingsInfo::default();
                warn!(
                    path = %info_path.display(),
                    model = %fallback.model_name,
                    dim = fallback.embedding_dim,
                    "embeddings info missing, using default model"
                );
                fallback
            }
            Err(source) => {
                return Err(ArtifactError::Io {
                    path: info_path,
                    source,
                });
            }
        };

        let mut artifacts = Self::new(Arc::new(regressor), scaler, embeddings)?;
        artifacts.source_dir = Some(dir.to_path_buf());
        info!(
            dir = %dir.display(),
            regressor = %artifacts.regressor.info().kind,
            embedding_model = %artifacts.embeddings.model_name,
            embedding_dim = artifacts.embeddings.embedding_dim,
            "model artifacts loaded"
        );
        Ok(artifacts)
    }

    pub fn regressor(&self) -> &dyn Regressor {
        self.regressor.as_ref()
    }

    pub fn scaler(&self) -> &SeverityScaler {
        &self.scaler
    }

    pub fn embeddings(&self) -> &EmbeddingsInfo {
        &self.embeddings
    }

    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }
}

fn scoring_error(path: &Path, err: ScoringError) -> ArtifactError {
    match err {
        ScoringError::Io(source) if source.kind() == ErrorKind::NotFound => {
            ArtifactError::Missing(path.to_path_buf())
        }
        ScoringError::Io(source) => ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        },
        ScoringError::Serde(source) => ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        },
        source => ArtifactError::Model {
            path: path.to_path_buf(),
            source,
        },
    }
}
