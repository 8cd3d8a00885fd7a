use async_trait::async_trait;
use fxhash::hash64;

use crate::backend::EmbeddingBackend;
use crate::error::EmbeddingError;

/// Deterministic backend for tests and offline runs.
///
/// Each component is a sinusoid of the text hash mixed with the component
/// index, so equal texts give equal vectors and values stay in `[-1, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct StubBackend {
    dimension: usize,
}

impl StubBackend {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let h = hash64(text.as_bytes());
        (0..self.dimension)
            .map(|idx| {
                let mixed = h.rotate_left((idx % 64) as u32)
                    ^ (idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                ((mixed >> 40) as f32 * 0.0001).sin()
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}
