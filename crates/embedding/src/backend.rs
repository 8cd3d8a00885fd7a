use async_trait::async_trait;

use crate::error::EmbeddingError;

/// The sentence-embedding model, seen from the encoder.
///
/// Implementations get only non-empty texts and must return exactly one
/// vector per input, in input order. Length checks happen in the encoder.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Short label for logs and `model_info`.
    fn name(&self) -> &'static str;

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}
