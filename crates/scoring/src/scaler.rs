//! Calibration of raw regressor output onto the 10-100 severity range.
//!
//! Two stages run in [`SeverityScaler::transform`]:
//!
//! 1. Min-max scaling of the raw value into `[min_score, max_score]` using the
//!    range seen at fit time. Values outside that range land outside the
//!    target range; nothing is clamped here.
//! 2. A piecewise remap that widens the top of the scale:
//!    `[60, 100] -> [90, 100]`, `[40, 60) -> [80, 89)`, and everything below
//!    40 onto `10 + (s - 10) / 30 * 69`.
//!
//! [`SeverityScaler::score`] adds the final clip and is what callers want.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::category::{CategoryScheme, SeverityCategory};
use crate::error::ScoringError;

pub const DEFAULT_MIN_SCORE: f64 = 10.0;
pub const DEFAULT_MAX_SCORE: f64 = 100.0;

/// Fitted min-max scaler plus the severity remap.
///
/// Serializes verbatim; a saved scaler loads back to the same state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityScaler {
    min_score: f64,
    max_score: f64,
    original_min: Option<f64>,
    original_max: Option<f64>,
    is_fitted: bool,
}

impl Default for SeverityScaler {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            max_score: DEFAULT_MAX_SCORE,
            original_min: None,
            original_max: None,
            is_fitted: false,
        }
    }
}

/// Snapshot returned by [`SeverityScaler::info`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerInfo {
    pub is_fitted: bool,
    pub min_score: f64,
    pub max_score: f64,
    pub original_min: Option<f64>,
    pub original_max: Option<f64>,
    pub score_range: f64,
}

/// One row of [`SeverityScaler::score_distribution`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub count: usize,
    pub percentage: f64,
}

impl SeverityScaler {
    pub fn new(min_score: f64, max_score: f64) -> Result<Self, ScoringError> {
        check_target_range(min_score, max_score).map_err(ScoringError::InvalidConfig)?;
        Ok(Self {
            min_score,
            max_score,
            ..Self::default()
        })
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Records the observed range of `raw`. Refitting replaces the old range.
    pub fn fit(&mut self, raw: &[f64]) -> Result<&mut Self, ScoringError> {
        if raw.is_empty() {
            return Err(ScoringError::EmptyInput);
        }
        if let Some(bad) = raw.iter().copied().find(|v| !v.is_finite()) {
            return Err(ScoringError::NonFinite(bad));
        }
        let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
        let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        self.original_min = Some(min);
        self.original_max = Some(max);
        self.is_fitted = true;
        info!(
            samples = raw.len(),
            original_min = min,
            original_max = max,
            min_score = self.min_score,
            max_score = self.max_score,
            "fitted severity scaler"
        );
        Ok(self)
    }

    /// Min-max stage followed by the remap. May leave the target range.
    pub fn transform(&self, raw: f64) -> Result<f64, ScoringError> {
        Ok(remap(self.min_max(raw)?))
    }

    pub fn transform_many(&self, raw: &[f64]) -> Result<Vec<f64>, ScoringError> {
        raw.iter().map(|&v| self.transform(v)).collect()
    }

    /// Calibrated severity: `transform` then `clip_scores`.
    pub fn score(&self, raw: f64) -> Result<f64, ScoringError> {
        Ok(self.clip_scores(self.transform(raw)?))
    }

    pub fn fit_transform(&mut self, raw: &[f64]) -> Result<Vec<f64>, ScoringError> {
        self.fit(raw)?;
        self.transform_many(raw)
    }

    /// Inverts the min-max stage only; the remap is not undone.
    pub fn inverse_transform(&self, scaled: f64) -> Result<f64, ScoringError> {
        let (min, max) = self.fitted_range()?;
        let span = self.max_score - self.min_score;
        Ok(min + (scaled - self.min_score) * data_range(min, max) / span)
    }

    pub fn clip_scores(&self, score: f64) -> f64 {
        score.clamp(self.min_score, self.max_score)
    }

    pub fn get_severity_category(&self, scheme: CategoryScheme, score: f64) -> SeverityCategory {
        scheme.categorize(score)
    }

    /// True when every score is inside `[min_score, max_score]`.
    pub fn validate_score_range(&self, scores: &[f64]) -> bool {
        scores
            .iter()
            .all(|s| *s >= self.min_score && *s <= self.max_score)
    }

    /// Count and percentage per category of `scheme`. Empty input gives an
    /// empty map; otherwise every category of the scheme is present.
    pub fn score_distribution(
        &self,
        scheme: CategoryScheme,
        scores: &[f64],
    ) -> BTreeMap<SeverityCategory, CategoryShare> {
        if scores.is_empty() {
            return BTreeMap::new();
        }
        let mut counts: BTreeMap<SeverityCategory, usize> =
            scheme.categories().iter().map(|c| (*c, 0)).collect();
        for score in scores {
            *counts.entry(scheme.categorize(*score)).or_default() += 1;
        }
        let total = scores.len() as f64;
        counts
            .into_iter()
            .map(|(category, count)| {
                (
                    category,
                    CategoryShare {
                        count,
                        percentage: count as f64 / total * 100.0,
                    },
                )
            })
            .collect()
    }

    pub fn info(&self) -> ScalerInfo {
        ScalerInfo {
            is_fitted: self.is_fitted,
            min_score: self.min_score,
            max_score: self.max_score,
            original_min: self.original_min,
            original_max: self.original_max,
            score_range: self.max_score - self.min_score,
        }
    }

    /// Writes the fitted state as JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ScoringError> {
        if !self.is_fitted {
            return Err(ScoringError::NotFitted);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        info!(path = %path.display(), "saved severity scaler");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        let bytes = fs::read(path)?;
        let scaler: Self = serde_json::from_slice(&bytes)?;
        scaler.validate()?;
        info!(path = %path.display(), "loaded severity scaler");
        Ok(scaler)
    }

    /// Checks a deserialized scaler for a usable state.
    pub fn validate(&self) -> Result<(), ScoringError> {
        check_target_range(self.min_score, self.max_score).map_err(ScoringError::MalformedScaler)?;
        if !self.is_fitted {
            return Err(ScoringError::MalformedScaler(
                "scaler was saved before fitting".into(),
            ));
        }
        match (self.original_min, self.original_max) {
            (Some(min), Some(max)) if min.is_finite() && max.is_finite() && min <= max => Ok(()),
            (Some(min), Some(max)) => Err(ScoringError::MalformedScaler(format!(
                "invalid fitted range [{min}, {max}]"
            ))),
            _ => Err(ScoringError::MalformedScaler(
                "fitted scaler is missing its original range".into(),
            )),
        }
    }

    fn fitted_range(&self) -> Result<(f64, f64), ScoringError> {
        match (self.is_fitted, self.original_min, self.original_max) {
            (true, Some(min), Some(max)) => Ok((min, max)),
            _ => Err(ScoringError::NotFitted),
        }
    }

    fn min_max(&self, raw: f64) -> Result<f64, ScoringError> {
        let (min, max) = self.fitted_range()?;
        if !raw.is_finite() {
            return Err(ScoringError::NonFinite(raw));
        }
        let span = self.max_score - self.min_score;
        Ok(self.min_score + (raw - min) * span / data_range(min, max))
    }
}

/// Zero-width ranges divide by one, as scikit-learn's MinMaxScaler does.
fn data_range(min: f64, max: f64) -> f64 {
    let range = max - min;
    if range == 0.0 {
        1.0
    } else {
        range
    }
}

fn check_target_range(min: f64, max: f64) -> Result<(), String> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(format!("score range [{min}, {max}] must be finite with min < max"));
    }
    Ok(())
}

/// Piecewise severity remap applied after min-max scaling.
pub fn remap(score: f64) -> f64 {
    if score >= 60.0 {
        90.0 + (score - 60.0) / 40.0 * 10.0
    } else if score >= 40.0 {
        80.0 + (score - 40.0) / 20.0 * 9.0
    } else {
        10.0 + (score - 10.0) / 30.0 * 69.0
    }
}
