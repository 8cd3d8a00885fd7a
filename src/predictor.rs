use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use embedding::EmbeddingEncoder;
use futures::stream::{self, StreamExt};
use preprocess::{LanguageDetector, TextCleaner};
use scoring::{CategoryScheme, RegressorInfo, ScalerInfo};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::artifacts::ModelArtifacts;
use crate::config::SeverityConfig;
use crate::error::{ArtifactError, PredictorError};
use crate::metrics::{MetricsFanout, MetricsSink, NoopMetrics, PredictionStats};
use crate::result::{BatchPrediction, BatchReport, PredictionResult, PredictionStatus};

/// What the predictor is running with, for status endpoints and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub regressor: RegressorInfo,
    pub scaler: ScalerInfo,
    pub embedding_model: String,
    pub embedding_dim: usize,
    pub embedding_backend: String,
    pub category_scheme: CategoryScheme,
    pub model_dir: Option<PathBuf>,
}

/// End-to-end severity prediction for English and Hindi tickets.
///
/// Holds only read-only state after construction, so one instance can be
/// shared behind an `Arc` across tasks. Per-request failures never escape:
/// empty tickets get the empty-input sentinel, and embedding or regression
/// failures get a degraded result carrying the error message.
pub struct SeverityPredictor {
    cfg: SeverityConfig,
    detector: LanguageDetector,
    cleaner: TextCleaner,
    encoder: EmbeddingEncoder,
    artifacts: ModelArtifacts,
    metrics: Arc<dyn MetricsSink>,
    stats: Option<Arc<PredictionStats>>,
}

impl std::fmt::Debug for SeverityPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeverityPredictor")
            .field("cfg", &self.cfg)
            .field("encoder", &self.encoder)
            .field("artifacts", &self.artifacts)
            .finish_non_exhaustive()
    }
}

impl SeverityPredictor {
    /// Loads the model bundle from `cfg.model_dir` and builds the encoder it
    /// was trained with. The bundle's embedding model and dimension take
    /// precedence over the `embedding` section.
    pub fn new(cfg: SeverityConfig) -> Result<Self, PredictorError> {
        cfg.validate()?;
        let artifacts = ModelArtifacts::load(&cfg.model_dir)?;

        let mut embedding_cfg = cfg.embedding.clone();
        let trained = artifacts.embeddings();
        if embedding_cfg.model_name != trained.model_name
            || embedding_cfg.dimension != trained.embedding_dim
        {
            info!(
                configured_model = %embedding_cfg.model_name,
                configured_dim = embedding_cfg.dimension,
                model = %trained.model_name,
                dim = trained.embedding_dim,
                "using embedding model recorded with the artifacts"
            );
            embedding_cfg.model_name = trained.model_name.clone();
            embedding_cfg.dimension = trained.embedding_dim;
        }
        let encoder = EmbeddingEncoder::new(embedding_cfg)?;
        Self::from_parts(cfg, artifacts, encoder)
    }

    /// Assembles a predictor from already-built parts. The encoder's
    /// dimension must match what the regressor expects.
    pub fn from_parts(
        cfg: SeverityConfig,
        artifacts: ModelArtifacts,
        encoder: EmbeddingEncoder,
    ) -> Result<Self, PredictorError> {
        cfg.validate()?;
        let expected = artifacts.regressor().expected_dim();
        if encoder.dimension() != expected {
            return Err(ArtifactError::DimensionMismatch {
                model: expected,
                embedding: encoder.dimension(),
            }
            .into());
        }

        let cleaner = TextCleaner::new(cfg.cleaner.clone())?;
        let detector = LanguageDetector::new(cfg.language.clone());
        let (metrics, stats) = configured_metrics(&cfg);

        info!(
            regressor = %artifacts.regressor().info().kind,
            backend = encoder.backend_name(),
            embedding_dim = encoder.dimension(),
            scheme = ?cfg.scoring.scheme,
            "severity predictor ready"
        );
        Ok(Self {
            cfg,
            detector,
            cleaner,
            encoder,
            artifacts,
            metrics,
            stats,
        })
    }

    /// Replaces the configured metrics sinks, including the in-memory stats.
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self.stats = None;
        self
    }

    pub fn config(&self) -> &SeverityConfig {
        &self.cfg
    }

    /// In-memory prediction stats, when enabled by `metrics.stats`.
    pub fn stats(&self) -> Option<&Arc<PredictionStats>> {
        self.stats.as_ref()
    }

    /// Scores one ticket. Never fails; see [`PredictionResult::status`].
    pub async fn predict_single(&self, text: &str) -> PredictionResult {
        let started = Instant::now();
        let result = self.run_pipeline(text).await;
        let latency = started.elapsed();
        self.metrics
            .record(result.severity_category, result.detected_language, latency);
        debug!(
            score = result.severity_score,
            category = %result.severity_category,
            language = %result.detected_language,
            status = ?result.status,
            latency_us = latency.as_micros() as u64,
            "ticket scored"
        );
        result
    }

    /// Scores every ticket independently. Output order and `ticket_index`
    /// follow input order; a failing ticket never affects the others.
    pub async fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<BatchPrediction> {
        let total = texts.len();
        let every = self.cfg.batch.progress_every;
        info!(total, concurrency = self.cfg.batch.max_concurrency, "batch prediction started");

        let mut done = 0usize;
        let pending: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(ticket_index, text)| async move {
                BatchPrediction {
                    ticket_index,
                    result: self.predict_single(text.as_ref()).await,
                }
            })
            .collect();
        let predictions: Vec<BatchPrediction> = stream::iter(pending)
            .buffered(self.cfg.batch.max_concurrency)
            .inspect(|_| {
                done += 1;
                if every > 0 && done % every == 0 && done < total {
                    info!(done, total, "batch progress");
                }
            })
            .collect()
            .await;

        info!(total, "batch prediction finished");
        predictions
    }

    /// [`predict_batch`](Self::predict_batch) plus success and error counts
    /// and wall time.
    pub async fn predict_batch_report<S: AsRef<str>>(&self, texts: &[S]) -> BatchReport {
        let started = Instant::now();
        let predictions = self.predict_batch(texts).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        BatchReport::new(predictions, elapsed_ms)
    }

    /// True when the score lies in the scaler's range and the category
    /// belongs to the active scheme.
    pub fn validate_prediction(&self, result: &PredictionResult) -> bool {
        let scaler = self.artifacts.scaler();
        let score = result.severity_score;
        score.is_finite()
            && score >= scaler.min_score()
            && score <= scaler.max_score()
            && self.cfg.scoring.scheme.accepts(result.severity_category)
            && (0.0..=1.0).contains(&result.confidence)
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            regressor: self.artifacts.regressor().info(),
            scaler: self.artifacts.scaler().info(),
            embedding_model: self.encoder.model_name().to_string(),
            embedding_dim: self.encoder.dimension(),
            embedding_backend: self.encoder.backend_name().to_string(),
            category_scheme: self.cfg.scoring.scheme,
            model_dir: self.artifacts.source_dir().map(|p| p.to_path_buf()),
        }
    }

    async fn run_pipeline(&self, text: &str) -> PredictionResult {
        let scheme = self.cfg.scoring.scheme;
        if text.trim().is_empty() {
            return PredictionResult::empty_input().categorized(scheme);
        }

        let language = self.detector.detect_language(text);
        let processed = match self.cleaner.clean_text(text, language) {
            Ok(cleaned) => cleaned,
            Err(err) => {
                warn!(error = %err, "text cleaning failed, using raw text");
                text.to_string()
            }
        };

        let embedding = match self.encoder.encode(&processed).await {
            Ok(embedding) => embedding,
            Err(err) => {
                error!(error = %err, language = %language, "embedding failed");
                return PredictionResult::degraded(language, processed, err).categorized(scheme);
            }
        };

        let features = embedding.vector.as_slice();
        let scored = self
            .artifacts
            .regressor()
            .predict(features)
            .and_then(|raw| self.artifacts.scaler().score(raw));
        let severity_score = match scored {
            Ok(score) => score,
            Err(err) => {
                error!(error = %err, language = %language, "regression failed");
                return PredictionResult::degraded(language, processed, err).categorized(scheme);
            }
        };

        PredictionResult {
            severity_score,
            severity_category: scheme.categorize(severity_score),
            confidence: self.confidence(features),
            detected_language: language,
            processed_text: processed,
            status: PredictionStatus::Scored,
            error: None,
        }
    }

    fn confidence(&self, features: &[f32]) -> f64 {
        let scoring = &self.cfg.scoring;
        match self.artifacts.regressor().member_predictions(features) {
            Ok(None) => scoring.default_confidence,
            Ok(Some(members)) => scoring
                .ensemble_confidence(&members)
                .unwrap_or(scoring.fallback_confidence),
            Err(err) => {
                warn!(error = %err, "ensemble confidence unavailable");
                scoring.fallback_confidence
            }
        }
    }
}

fn configured_metrics(cfg: &SeverityConfig) -> (Arc<dyn MetricsSink>, Option<Arc<PredictionStats>>) {
    let mut fanout = MetricsFanout::new();
    let stats = cfg
        .metrics
        .stats
        .then(|| Arc::new(PredictionStats::new(cfg.metrics.recent_capacity)));
    if let Some(stats) = &stats {
        fanout = fanout.with(stats.clone());
    }
    if cfg.metrics.recorder {
        #[cfg(feature = "metrics")]
        {
            fanout = fanout.with(Arc::new(crate::metrics::RecorderMetrics));
        }
        #[cfg(not(feature = "metrics"))]
        warn!("metrics.recorder is set but the `metrics` feature is disabled");
    }

    if fanout.is_empty() {
        (Arc::new(NoopMetrics), stats)
    } else {
        (Arc::new(fanout), stats)
    }
}
