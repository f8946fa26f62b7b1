//! HTTP client for the external embedding service.

use serde::Deserialize;
use serde_json::json;

use crate::config::EmbeddingConfig;
use crate::embedding::{ensure_non_empty, EmbeddingProvider, EmbeddingVector};
use crate::error::{Result, RmError};
use crate::retry::{with_retry_if, RetryConfig};

pub struct ApiEmbedder {
    endpoint: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::blocking::Client,
    retry: RetryConfig,
}

impl std::fmt::Debug for ApiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEmbedder")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

impl ApiEmbedder {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                RmError::MissingConfig("embedding.endpoint is not set".to_string())
            })?;

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| RmError::Config(format!("embedding http client: {err}")))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client,
            retry: config.retry(),
        })
    }

    fn request(&self, text: &str) -> Result<EmbeddingVector> {
        let body = json!({
            "model": self.model,
            "input": text,
        });

        let mut request = self
            .client
            .post(format!("{}/embeddings", self.endpoint))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }

        let response = request
            .send()
            .map_err(|err| RmError::Provider(format!("embedding request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RmError::Provider(format!("embedding service HTTP {status}")));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .map_err(|err| RmError::Provider(format!("embedding response parse: {err}")))?;

        let datum = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| RmError::Provider("embedding response contained no data".to_string()))?;

        EmbeddingVector::new(datum.embedding)
    }
}

impl EmbeddingProvider for ApiEmbedder {
    fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        ensure_non_empty(text)?;
        with_retry_if(&self.retry, || self.request(text), RmError::is_transient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn config_for(server: &MockServer, max_attempts: u32) -> EmbeddingConfig {
        EmbeddingConfig {
            endpoint: Some(server.base_url()),
            api_key: Some("secret".to_string()),
            max_attempts,
            ..EmbeddingConfig::default()
        }
    }

    fn fast_embedder(config: &EmbeddingConfig) -> ApiEmbedder {
        let mut embedder = ApiEmbedder::from_config(config).unwrap();
        embedder.retry.initial_delay = Duration::from_millis(1);
        embedder.retry.max_delay = Duration::from_millis(2);
        embedder
    }

    #[test]
    fn parses_embedding_from_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/embeddings")
                .header("api-key", "secret")
                .json_body_includes(r#"{"input": "financial analyst"}"#);
            then.status(200).json_body(serde_json::json!({
                "data": [{"embedding": vec![0.5f32; 1536]}]
            }));
        });

        let embedder = fast_embedder(&config_for(&server, 1));
        let vector = embedder.embed("financial analyst").unwrap();
        mock.assert();
        assert_eq!(vector.as_slice().len(), 1536);
        assert!((vector.as_slice()[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn exhausts_retry_budget_on_server_errors() {
        let server = MockServer::start();
        let failing = server.mock(|when, then| {
            when.method(POST).path("/embeddings");
            then.status(503);
        });

        let embedder = fast_embedder(&config_for(&server, 3));
        assert!(embedder.embed("x y z").is_err());
        assert_eq!(failing.hits(), 3);
    }

    #[test]
    fn wrong_dimensionality_is_a_provider_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/embeddings");
            then.status(200).json_body(serde_json::json!({
                "data": [{"embedding": [0.1, 0.2, 0.3]}]
            }));
        });

        let embedder = fast_embedder(&config_for(&server, 1));
        assert!(matches!(embedder.embed("abc"), Err(RmError::Provider(_))));
    }

    #[test]
    fn empty_text_never_hits_the_network() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/embeddings");
            then.status(200);
        });

        let embedder = fast_embedder(&config_for(&server, 3));
        assert!(matches!(embedder.embed("   "), Err(RmError::Validation(_))));
        assert_eq!(mock.hits(), 0);
    }

    #[test]
    fn missing_endpoint_is_a_config_error() {
        let config = EmbeddingConfig::default();
        assert!(matches!(
            ApiEmbedder::from_config(&config),
            Err(RmError::MissingConfig(_))
        ));
    }
}
