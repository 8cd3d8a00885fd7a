//! HTTP feature-extraction backend.
//!
//! Sends `{"inputs": [...]}` and accepts the common response shapes:
//! a bare `[[f32]]`, `{"embeddings": [[f32]]}`, or `{"data": [{"embedding": [f32]}]}`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::backend::EmbeddingBackend;
use crate::config::EmbeddingConfig;
use crate::error::EmbeddingError;
use crate::retry::{retry_async, RetryConfig};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    url: String,
    auth_header: Option<String>,
    retry: RetryConfig,
}

impl HttpBackend {
    pub fn new(cfg: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let url = cfg
            .api_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                EmbeddingError::InvalidConfig("api_url is required for the http backend".into())
            })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.api_timeout_secs))
            .connect_timeout(Duration::from_secs(cfg.api_timeout_secs.min(10)))
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url,
            auth_header: cfg.api_auth_header.clone(),
            retry: cfg.retry,
        })
    }

    async fn send(&self, payload: &Value) -> Result<Value, EmbeddingError> {
        let mut request = self.client.post(&self.url).json(payload);
        if let Some(header) = self.auth_header.as_deref() {
            request = request.header("Authorization", header);
        }
        let response = request.send().await.map_err(|e| EmbeddingError::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Http {
                status: Some(status.as_u16()),
                message: body,
            });
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| EmbeddingError::Inference(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl EmbeddingBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let payload = json!({ "inputs": texts });
        let response = retry_async(&self.retry, |attempt| {
            debug!(attempt, inputs = texts.len(), url = %self.url, "embedding request");
            self.send(&payload)
        })
        .await?;
        parse_embeddings(response)
    }
}

pub(crate) fn parse_embeddings(value: Value) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return parse_collection(embeddings);
            }
            if let Some(Value::Array(items)) = map.remove("data") {
                return items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(mut obj) => obj
                            .remove("embedding")
                            .ok_or_else(|| {
                                EmbeddingError::Inference(
                                    "missing `embedding` field in data item".into(),
                                )
                            })
                            .and_then(parse_vector),
                        _ => Err(EmbeddingError::Inference(
                            "unexpected entry inside `data` array".into(),
                        )),
                    })
                    .collect();
            }
            Err(EmbeddingError::Inference("unsupported API response shape".into()))
        }
        other => parse_collection(other),
    }
}

fn parse_collection(value: Value) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    match value {
        Value::Array(items) if items.iter().all(|i| matches!(i, Value::Array(_))) => {
            items.into_iter().map(parse_vector).collect()
        }
        other => parse_vector(other).map(|v| vec![v]),
    }
}

fn parse_vector(value: Value) -> Result<Vec<f32>, EmbeddingError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num
                    .as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| EmbeddingError::Inference("non-finite embedding value".into())),
                other => Err(EmbeddingError::Inference(format!(
                    "embedding entries must be numbers, got {other}"
                ))),
            })
            .collect(),
        other => Err(EmbeddingError::Inference(format!(
            "embedding vector must be an array, got {other}"
        ))),
    }
}
