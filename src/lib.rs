//! Severity scoring for English and Hindi IT support tickets.
//!
//! This crate stitches the stage crates together behind one entry point,
//! [`SeverityPredictor`]:
//!
//! 1. language detection and text cleaning (`preprocess`)
//! 2. sentence embedding (`embedding`)
//! 3. regression, score calibration and categorization (`scoring`)
//!
//! The trained bundle (regressor, fitted scaler, embedding metadata) is read
//! once from a model directory by [`ModelArtifacts::load`] and shared
//! read-only afterwards.
//!
//! ```no_run
//! use ticket_severity::{SeverityConfig, SeverityPredictor};
//!
//! # async fn run() -> Result<(), ticket_severity::PredictorError> {
//! let predictor = SeverityPredictor::new(SeverityConfig::default())?;
//! let result = predictor.predict_single("Payroll server is down for everyone").await;
//! println!("{} ({})", result.severity_score, result.severity_category);
//! # Ok(())
//! # }
//! ```

mod artifacts;
pub mod config;
mod error;
mod metrics;
mod predictor;
mod result;

pub use crate::artifacts::{
    EMBEDDINGS_INFO_FILE, EmbeddingsInfo, MODEL_FILE, ModelArtifacts, SCALER_FILE,
};
pub use crate::config::{
    BatchConfig, ConfigLoadError, LoggingConfig, MetricsConfig, SeverityConfig,
};
pub use crate::error::{ArtifactError, PredictorError};
#[cfg(feature = "metrics")]
pub use crate::metrics::RecorderMetrics;
pub use crate::metrics::{
    MetricsFanout, MetricsSink, NoopMetrics, PredictionStats, RecentPrediction, StatsSnapshot,
};
pub use crate::predictor::{ModelInfo, SeverityPredictor};
pub use crate::result::{
    BatchPrediction, BatchReport, DEGRADED_SCORE, EMPTY_INPUT_SCORE, PredictionResult,
    PredictionStatus,
};

pub use embedding::{
    BackendKind, Embedding, EmbeddingBackend, EmbeddingConfig, EmbeddingEncoder, EmbeddingError,
    StubBackend,
};
pub use preprocess::{CleanerConfig, DetectorConfig, Language, LanguageDetector, TextCleaner};
pub use scoring::{
    CategoryScheme, Regressor, RegressorModel, ScoringConfig, ScoringError, SeverityCategory,
    SeverityScaler,
};
