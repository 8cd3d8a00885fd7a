use serde::{Deserialize, Serialize};

/// Encoder output for one text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    pub vector: Vec<f32>,
    /// Name of the model that produced the vector.
    pub model_name: String,
    /// Length of `vector`.
    pub dimension: usize,
    /// Whether `vector` was L2-normalized. Always false for zero vectors.
    pub normalized: bool,
}

impl Embedding {
    pub(crate) fn zeros(model_name: &str, dimension: usize) -> Self {
        Self {
            vector: vec![0.0; dimension],
            model_name: model_name.to_string(),
            dimension,
            normalized: false,
        }
    }

    /// True for the placeholder produced from empty text.
    pub fn is_zero(&self) -> bool {
        self.vector.iter().all(|v| *v == 0.0)
    }
}
