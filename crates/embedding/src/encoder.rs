use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::backend::EmbeddingBackend;
use crate::config::{BackendKind, EmbeddingConfig};
use crate::error::EmbeddingError;
use crate::normalize::{cosine_similarity, l2_normalize_in_place};
use crate::stub::StubBackend;
use crate::types::Embedding;

/// Turns cleaned ticket text into fixed-size vectors.
///
/// Empty or whitespace-only text never reaches the backend; it maps to the
/// zero vector of the configured dimension. Every backend vector is checked
/// against that dimension.
#[derive(Clone)]
pub struct EmbeddingEncoder {
    cfg: EmbeddingConfig,
    backend: Arc<dyn EmbeddingBackend>,
}

impl fmt::Debug for EmbeddingEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingEncoder")
            .field("cfg", &self.cfg)
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl EmbeddingEncoder {
    /// Builds the backend named by `cfg.backend`.
    pub fn new(cfg: EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let backend = build_backend(&cfg)?;
        Self::with_backend(cfg, backend)
    }

    pub fn with_backend(
        cfg: EmbeddingConfig,
        backend: Arc<dyn EmbeddingBackend>,
    ) -> Result<Self, EmbeddingError> {
        cfg.validate()?;
        info!(
            backend = backend.name(),
            model = %cfg.model_name,
            dimension = cfg.dimension,
            "embedding encoder ready"
        );
        Ok(Self { cfg, backend })
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.cfg
    }

    pub fn model_name(&self) -> &str {
        &self.cfg.model_name
    }

    pub fn dimension(&self) -> usize {
        self.cfg.dimension
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn encode(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut out = self.encode_batch(&[text]).await?;
        out.pop()
            .ok_or_else(|| EmbeddingError::Inference("encoder returned no embedding".into()))
    }

    /// Encodes many texts, `batch_size` per backend call. Output order
    /// matches input order; empty texts come back as zero vectors.
    pub async fn encode_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> Result<Vec<Embedding>, EmbeddingError> {
        let mut out: Vec<Embedding> = texts
            .iter()
            .map(|_| Embedding::zeros(&self.cfg.model_name, self.cfg.dimension))
            .collect();

        let pending: Vec<(usize, &str)> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| (i, t.as_ref()))
            .filter(|(_, t)| !t.trim().is_empty())
            .collect();

        for chunk in pending.chunks(self.cfg.batch_size) {
            let inputs: Vec<&str> = chunk.iter().map(|(_, t)| *t).collect();
            let vectors = self.backend.embed(&inputs).await?;
            if vectors.len() != inputs.len() {
                return Err(EmbeddingError::Inference(format!(
                    "backend returned {} embeddings for {} inputs",
                    vectors.len(),
                    inputs.len()
                )));
            }
            for ((idx, _), vector) in chunk.iter().zip(vectors) {
                out[*idx] = self.finish(vector)?;
            }
        }

        debug!(
            total = texts.len(),
            encoded = pending.len(),
            backend = self.backend.name(),
            "encoded batch"
        );
        Ok(out)
    }

    /// Cosine similarity of two texts' embeddings.
    pub async fn similarity(&self, a: &str, b: &str) -> Result<f32, EmbeddingError> {
        let pair = self.encode_batch(&[a, b]).await?;
        Ok(cosine_similarity(&pair[0].vector, &pair[1].vector))
    }

    /// Indices and similarities of the `top_k` candidates closest to `query`,
    /// best first.
    pub async fn most_similar<S: AsRef<str>>(
        &self,
        query: &str,
        candidates: &[S],
        top_k: usize,
    ) -> Result<Vec<(usize, f32)>, EmbeddingError> {
        if candidates.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        let mut texts: Vec<&str> = Vec::with_capacity(candidates.len() + 1);
        texts.push(query);
        texts.extend(candidates.iter().map(AsRef::as_ref));
        let embeddings = self.encode_batch(&texts).await?;

        let (query, rest) = embeddings.split_at(1);
        let mut scored: Vec<(usize, f32)> = rest
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_similarity(&query[0].vector, &e.vector)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(top_k);
        Ok(scored)
    }

    fn finish(&self, mut vector: Vec<f32>) -> Result<Embedding, EmbeddingError> {
        if vector.len() != self.cfg.dimension {
            return Err(EmbeddingError::Dimension {
                expected: self.cfg.dimension,
                actual: vector.len(),
            });
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::Inference(
                "backend returned a non-finite value".into(),
            ));
        }
        let normalized = self.cfg.normalize && vector.iter().any(|v| *v != 0.0);
        if normalized {
            l2_normalize_in_place(&mut vector);
        }
        Ok(Embedding {
            dimension: vector.len(),
            vector,
            model_name: self.cfg.model_name.clone(),
            normalized,
        })
    }
}

/// Builds the backend selected in `cfg`.
pub fn build_backend(cfg: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingBackend>, EmbeddingError> {
    cfg.validate()?;
    match cfg.backend {
        BackendKind::Stub => Ok(Arc::new(StubBackend::new(cfg.dimension))),
        #[cfg(feature = "api")]
        BackendKind::Http => Ok(Arc::new(crate::api::HttpBackend::new(cfg)?)),
        #[cfg(not(feature = "api"))]
        BackendKind::Http => Err(EmbeddingError::InvalidConfig(
            "the http backend requires the `api` feature".into(),
        )),
    }
}
