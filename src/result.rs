use preprocess::Language;
use scoring::{CategoryScheme, SeverityCategory};
use serde::{Deserialize, Serialize};

/// Score reported for tickets with no text.
pub const EMPTY_INPUT_SCORE: f64 = 10.0;
/// Score reported when the model could not produce a prediction.
pub const DEGRADED_SCORE: f64 = 50.0;

/// How a [`PredictionResult`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStatus {
    /// The full pipeline ran.
    Scored,
    /// Empty or whitespace-only input; the model was not consulted.
    EmptyInput,
    /// Embedding or regression failed; the score is a placeholder.
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub severity_score: f64,
    pub severity_category: SeverityCategory,
    pub confidence: f64,
    pub detected_language: Language,
    pub processed_text: String,
    pub status: PredictionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionResult {
    /// Sentinel for a ticket with no text. The category comes from the
    /// three-band table; see [`PredictionResult::categorized`] for others.
    pub fn empty_input() -> Self {
        Self {
            severity_score: EMPTY_INPUT_SCORE,
            severity_category: SeverityCategory::Low,
            confidence: 0.0,
            detected_language: Language::En,
            processed_text: String::new(),
            status: PredictionStatus::EmptyInput,
            error: None,
        }
    }

    /// Placeholder for a ticket whose embedding or regression failed. The
    /// language and cleaned text computed before the failure are kept.
    pub fn degraded(language: Language, processed_text: String, error: impl ToString) -> Self {
        Self {
            severity_score: DEGRADED_SCORE,
            severity_category: SeverityCategory::Medium,
            confidence: 0.0,
            detected_language: language,
            processed_text,
            status: PredictionStatus::Degraded,
            error: Some(error.to_string()),
        }
    }

    /// Re-derives the category from the score under `scheme`.
    pub fn categorized(mut self, scheme: CategoryScheme) -> Self {
        self.severity_category = scheme.categorize(self.severity_score);
        self
    }

    pub fn is_degraded(&self) -> bool {
        self.status == PredictionStatus::Degraded
    }
}

/// One entry of a batch response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPrediction {
    pub ticket_index: usize,
    #[serde(flatten)]
    pub result: PredictionResult,
}

/// Batch results plus the counts an API response carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub predictions: Vec<BatchPrediction>,
    pub total: usize,
    /// Items not degraded. Empty tickets count as successes.
    pub success_count: usize,
    pub error_count: usize,
    pub elapsed_ms: u64,
}

impl BatchReport {
    pub(crate) fn new(predictions: Vec<BatchPrediction>, elapsed_ms: u64) -> Self {
        let error_count = predictions.iter().filter(|p| p.result.is_degraded()).count();
        Self {
            total: predictions.len(),
            success_count: predictions.len() - error_count,
            error_count,
            elapsed_ms,
            predictions,
        }
    }
}
