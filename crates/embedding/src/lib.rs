//! Multilingual sentence embeddings for ticket text.
//!
//! The encoder wraps an [`EmbeddingBackend`] (the opaque model) and owns the
//! rules around it:
//!
//! - empty or whitespace-only text becomes the zero vector without a backend call
//! - batches keep input order, with empties spliced back in place
//! - every vector is checked against the configured dimension
//! - optional L2 normalization
//!
//! Two backends ship with the crate: [`StubBackend`] (deterministic,
//! offline) and, behind the `api` feature, [`HttpBackend`] for a remote
//! feature-extraction endpoint.
//!
//! ```
//! use embedding::{EmbeddingConfig, EmbeddingEncoder};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let encoder = EmbeddingEncoder::new(EmbeddingConfig::default()).unwrap();
//! let e = rt.block_on(encoder.encode("VPN not connecting")).unwrap();
//! assert_eq!(e.vector.len(), 384);
//! ```

#[cfg(feature = "api")]
mod api;
mod backend;
mod config;
mod encoder;
mod error;
mod normalize;
mod retry;
mod serde_millis;
mod stub;
mod types;

#[cfg(feature = "api")]
pub use crate::api::HttpBackend;
pub use crate::backend::EmbeddingBackend;
pub use crate::config::{BackendKind, EmbeddingConfig, DEFAULT_DIMENSION, DEFAULT_MODEL_NAME};
pub use crate::encoder::{build_backend, EmbeddingEncoder};
pub use crate::error::EmbeddingError;
pub use crate::normalize::cosine_similarity;
pub use crate::retry::RetryConfig;
pub use crate::stub::StubBackend;
pub use crate::types::Embedding;
