use thiserror::Error;

/// Errors surfaced while producing embeddings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmbeddingError {
    /// Configuration is inconsistent (e.g. http backend without a URL).
    #[error("invalid embedding config: {0}")]
    InvalidConfig(String),
    /// Transport failure or non-success status from a remote backend.
    /// `status` is `None` when no response was received.
    #[error("http request failed{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Http { status: Option<u16>, message: String },
    /// The backend answered but the answer is unusable.
    #[error("inference failure: {0}")]
    Inference(String),
    /// A vector came back with the wrong length.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },
}

impl EmbeddingError {
    /// Transport errors, 429 and 5xx are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            EmbeddingError::Http { status: None, .. } => true,
            EmbeddingError::Http {
                status: Some(code), ..
            } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}
