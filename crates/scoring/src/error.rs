use std::io;
use thiserror::Error;

/// Errors surfaced by the regressor and the scaler.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// `transform`, `inverse_transform` or `save` on a scaler that was never fitted.
    #[error("scaler must be fitted before use")]
    NotFitted,
    /// `fit` was handed an empty slice.
    #[error("cannot fit on empty predictions")]
    EmptyInput,
    /// A NaN or infinite value reached the scaler or the regressor.
    #[error("non-finite value: {0}")]
    NonFinite(f64),
    /// Feature vector length does not match the model.
    #[error("feature dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },
    /// Scaler file parsed but its state is inconsistent.
    #[error("malformed scaler: {0}")]
    MalformedScaler(String),
    /// Model file parsed but the model cannot be evaluated safely.
    #[error("malformed model: {0}")]
    MalformedModel(String),
    #[error("invalid scoring config: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
