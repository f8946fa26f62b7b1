//! HTTP client for the external completion service.

use serde::Deserialize;
use serde_json::json;

use crate::completion::CompletionProvider;
use crate::config::CompletionConfig;
use crate::error::{Result, RmError};
use crate::retry::{with_retry_if, RetryConfig};

pub struct ApiCompleter {
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f64,
    client: reqwest::blocking::Client,
    retry: RetryConfig,
}

impl std::fmt::Debug for ApiCompleter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCompleter")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

impl ApiCompleter {
    pub fn from_config(config: &CompletionConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                RmError::MissingConfig("completion.endpoint is not set".to_string())
            })?;

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| RmError::Config(format!("completion http client: {err}")))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            client,
            retry: config.retry(),
        })
    }

    fn request(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
        });

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }

        let response = request
            .send()
            .map_err(|err| RmError::Provider(format!("completion request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RmError::Provider(format!("completion service HTTP {status}")));
        }

        let parsed: CompletionResponse = response
            .json()
            .map_err(|err| RmError::Provider(format!("completion response parse: {err}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| RmError::Provider("completion response contained no choices".to_string()))
    }
}

impl CompletionProvider for ApiCompleter {
    fn complete(&self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(RmError::Validation(
                "cannot complete an empty prompt".to_string(),
            ));
        }
        with_retry_if(&self.retry, || self.request(prompt), RmError::is_transient)
    }
}
