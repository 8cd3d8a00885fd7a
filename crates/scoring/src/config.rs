use serde::{Deserialize, Serialize};

use crate::category::CategoryScheme;
use crate::error::ScoringError;
use crate::scaler::{DEFAULT_MAX_SCORE, DEFAULT_MIN_SCORE};

/// Scoring knobs read from the `scoring` section of the service config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Category bands used for results and validation.
    pub scheme: CategoryScheme,
    /// Confidence reported for models without ensemble members.
    pub default_confidence: f64,
    /// Member variance at which ensemble confidence reaches zero.
    pub variance_ceiling: f64,
    /// Confidence reported when member predictions cannot be computed.
    pub fallback_confidence: f64,
    pub min_score: f64,
    pub max_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            scheme: CategoryScheme::ThreeBand,
            default_confidence: 0.8,
            variance_ceiling: 50.0,
            fallback_confidence: 0.5,
            min_score: DEFAULT_MIN_SCORE,
            max_score: DEFAULT_MAX_SCORE,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringError> {
        for (name, value) in [
            ("default_confidence", self.default_confidence),
            ("fallback_confidence", self.fallback_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScoringError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if !(self.variance_ceiling.is_finite() && self.variance_ceiling > 0.0) {
            return Err(ScoringError::InvalidConfig(format!(
                "variance_ceiling must be positive, got {}",
                self.variance_ceiling
            )));
        }
        if !(self.min_score.is_finite() && self.max_score.is_finite() && self.min_score < self.max_score) {
            return Err(ScoringError::InvalidConfig(format!(
                "score range [{}, {}] must be finite with min < max",
                self.min_score, self.max_score
            )));
        }
        Ok(())
    }

    /// Ensemble confidence: `1 - variance / variance_ceiling`, clamped to
    /// `[0, 1]`. `None` when there is nothing usable to measure.
    pub fn ensemble_confidence(&self, members: &[f64]) -> Option<f64> {
        let variance = population_variance(members)?;
        Some((1.0 - variance / self.variance_ceiling).clamp(0.0, 1.0))
    }
}

/// Mean squared deviation from the mean (divides by `n`).
pub fn population_variance(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    Some(values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n)
}
