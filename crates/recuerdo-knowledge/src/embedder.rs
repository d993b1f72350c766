// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP embedding adapter for OpenAI-compatible `/embeddings` endpoints.
//!
//! The catalog is seeded and queried through the same remote model, so
//! the adapter pins the model name and output dimensionality from
//! configuration and validates every response against them.

use std::time::Duration;

use async_trait::async_trait;
use recuerdo_config::model::EmbeddingConfig;
use recuerdo_core::traits::EmbeddingAdapter;
use recuerdo_core::types::{EmbeddingInput, EmbeddingOutput};
use recuerdo_core::RecuerdoError;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variables consulted for the API key, in order.
const API_KEY_ENV_VARS: &[&str] = &["RECUERDO_EMBEDDING_API_KEY", "OPENAI_API_KEY"];

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

/// Embedding adapter backed by a remote OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl HttpEmbedder {
    /// Creates an embedder from configuration.
    ///
    /// The API key comes from the config file when set, otherwise from
    /// `RECUERDO_EMBEDDING_API_KEY` or `OPENAI_API_KEY`. A missing key
    /// is a configuration error.
    pub fn new(config: &EmbeddingConfig) -> Result<Self, RecuerdoError> {
        let api_key = resolve_api_key(config)?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
            RecuerdoError::Config(format!("invalid API key header value: {e}"))
        })?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| RecuerdoError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimensions: config.dimensions,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

fn resolve_api_key(config: &EmbeddingConfig) -> Result<String, RecuerdoError> {
    if let Some(key) = &config.api_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }
    for var in API_KEY_ENV_VARS {
        if let Ok(key) = std::env::var(var)
            && !key.is_empty()
        {
            return Ok(key);
        }
    }
    Err(RecuerdoError::Config(
        "no embedding API key: set embedding.api_key or RECUERDO_EMBEDDING_API_KEY".to_string(),
    ))
}

#[async_trait]
impl EmbeddingAdapter for HttpEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, RecuerdoError> {
        if input.texts.is_empty() {
            return Ok(EmbeddingOutput {
                embeddings: vec![],
                dimensions: self.dimensions,
            });
        }

        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingsRequest {
            model: &self.model,
            input: &input.texts,
            dimensions: self.dimensions,
        };
        debug!(model = %self.model, count = input.texts.len(), "requesting embeddings");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RecuerdoError::Provider {
                message: format!("embedding request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecuerdoError::Provider {
                message: format!("embedding API returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: EmbeddingsResponse =
            response.json().await.map_err(|e| RecuerdoError::Provider {
                message: format!("malformed embedding response: {e}"),
                source: Some(Box::new(e)),
            })?;

        if parsed.data.len() != input.texts.len() {
            return Err(RecuerdoError::Provider {
                message: format!(
                    "embedding API returned {} vectors for {} inputs",
                    parsed.data.len(),
                    input.texts.len()
                ),
                source: None,
            });
        }
        for item in &parsed.data {
            if item.embedding.len() != self.dimensions {
                return Err(RecuerdoError::Config(format!(
                    "embedding dimensionality mismatch: expected {}, got {}",
                    self.dimensions,
                    item.embedding.len()
                )));
            }
        }

        Ok(EmbeddingOutput {
            embeddings: parsed.data.into_iter().map(|d| d.embedding).collect(),
            dimensions: self.dimensions,
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> EmbeddingConfig {
        EmbeddingConfig {
            api_key: Some("test-key".to_string()),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 3,
        }
    }

    #[tokio::test]
    async fn embed_parses_vectors_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(body_partial_json(serde_json::json!({
                "model": "text-embedding-3-small",
                "dimensions": 3,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {"embedding": [1.0, 0.0, 0.0]},
                    {"embedding": [0.0, 1.0, 0.0]},
                ]
            })))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&test_config())
            .unwrap()
            .with_base_url(server.uri());
        let output = embedder
            .embed(EmbeddingInput {
                texts: vec!["botas".to_string(), "bastones".to_string()],
            })
            .await
            .unwrap();

        assert_eq!(output.embeddings.len(), 2);
        assert_eq!(output.embeddings[0], vec![1.0, 0.0, 0.0]);
        assert_eq!(output.dimensions, 3);
    }

    #[tokio::test]
    async fn empty_input_skips_the_network() {
        let embedder = HttpEmbedder::new(&test_config())
            .unwrap()
            .with_base_url("http://127.0.0.1:1".to_string());
        let output = embedder.embed(EmbeddingInput { texts: vec![] }).await.unwrap();
        assert!(output.embeddings.is_empty());
    }

    #[tokio::test]
    async fn api_error_surfaces_as_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&test_config())
            .unwrap()
            .with_base_url(server.uri());
        let err = embedder
            .embed(EmbeddingInput {
                texts: vec!["botas".to_string()],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RecuerdoError::Provider { .. }));
    }

    #[tokio::test]
    async fn wrong_dimensionality_is_a_config_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"embedding": [1.0, 0.0]}]
            })))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&test_config())
            .unwrap()
            .with_base_url(server.uri());
        let err = embedder
            .embed(EmbeddingInput {
                texts: vec!["botas".to_string()],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RecuerdoError::Config(_)));
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let mut config = test_config();
        config.api_key = None;
        // Guard against ambient keys leaking into the test.
        unsafe {
            std::env::remove_var("RECUERDO_EMBEDDING_API_KEY");
            std::env::remove_var("OPENAI_API_KEY");
        }
        assert!(matches!(
            HttpEmbedder::new(&config),
            Err(RecuerdoError::Config(_))
        ));
    }
}
