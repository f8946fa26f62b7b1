//! HTTP client for the hosted hybrid search service.
//!
//! Stateless aside from the connection pool; safe to share across
//! threads by reference. Queries propagate failure (there is no
//! meaningful fallback to "no search"), while batch upserts report
//! per-document tallies instead of failing wholesale.

use serde_json::{json, Value};

use crate::config::SearchConfig;
use crate::error::{Result, RmError};
use crate::search::document::{IndexReport, RawResult, RoleDocument};
use crate::search::query::HybridQuery;
use crate::search::schema::index_definition;

pub struct SearchIndexClient {
    endpoint: String,
    api_key: String,
    index_name: String,
    api_version: String,
    client: reqwest::blocking::Client,
}

impl std::fmt::Debug for SearchIndexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndexClient")
            .field("endpoint", &self.endpoint)
            .field("index_name", &self.index_name)
            .finish_non_exhaustive()
    }
}

impl SearchIndexClient {
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(RmError::MissingConfig("search.endpoint is not set".to_string()));
        }
        if config.api_key.trim().is_empty() {
            return Err(RmError::MissingConfig("search.api_key is not set".to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| RmError::Config(format!("search http client: {err}")))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            index_name: config.index_name.clone(),
            api_version: config.api_version.clone(),
            client,
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Run a hybrid (text + vector + optional filter) query, returning
    /// raw engine rows in engine order. Malformed rows are skipped with
    /// a warning; they are individual documents, not the whole answer.
    pub fn hybrid_search(&self, query: &HybridQuery) -> Result<Vec<RawResult>> {
        let url = format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint, self.index_name, self.api_version
        );

        let response = self
            .client
            .post(url)
            .header("api-key", &self.api_key)
            .json(&query.to_body())
            .send()
            .map_err(|err| RmError::Search(format!("hybrid search request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RmError::Search(format!("search service HTTP {status}")));
        }

        let payload: Value = response
            .json()
            .map_err(|err| RmError::Search(format!("search response parse: {err}")))?;

        let rows = payload
            .get("value")
            .and_then(Value::as_array)
            .ok_or_else(|| RmError::Search("search response missing value array".to_string()))?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            match parse_row(row) {
                Ok(result) => results.push(result),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping malformed search result");
                }
            }
        }

        tracing::debug!(
            returned = results.len(),
            requested = query.top,
            "hybrid search completed"
        );
        Ok(results)
    }

    /// Upsert role documents, keyed by id and idempotent. Partial
    /// failure is reported per document, never raised.
    pub fn upsert_documents(&self, documents: &[RoleDocument]) -> Result<IndexReport> {
        if documents.is_empty() {
            return Ok(IndexReport::default());
        }

        let url = format!(
            "{}/indexes/{}/docs/index?api-version={}",
            self.endpoint, self.index_name, self.api_version
        );

        let mut actions = Vec::with_capacity(documents.len());
        for doc in documents {
            let mut value = serde_json::to_value(doc)?;
            value["@search.action"] = Value::String("mergeOrUpload".to_string());
            actions.push(value);
        }

        let response = self
            .client
            .post(url)
            .header("api-key", &self.api_key)
            .json(&json!({ "value": actions }))
            .send()
            .map_err(|err| RmError::Search(format!("index upsert request failed: {err}")))?;

        let status = response.status();
        // 207 carries per-document statuses for partial failure.
        if !status.is_success() && status.as_u16() != 207 {
            return Err(RmError::Search(format!("index service HTTP {status}")));
        }

        let payload: Value = response
            .json()
            .map_err(|err| RmError::Search(format!("index response parse: {err}")))?;

        let mut report = IndexReport::default();
        match payload.get("value").and_then(Value::as_array) {
            Some(statuses) => {
                for entry in statuses {
                    let succeeded = entry
                        .get("status")
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                    report.record(succeeded);
                }
            }
            // Engines that return an empty body on full success.
            None => {
                for _ in documents {
                    report.record(true);
                }
            }
        }

        if !report.all_succeeded() {
            tracing::warn!(summary = %report.summary(), "partial index upsert failure");
        }
        Ok(report)
    }

    /// Create or update the index schema. Idempotent; an existing index
    /// with the same definition is left untouched by the engine.
    pub fn ensure_index(&self) -> Result<()> {
        let url = format!(
            "{}/indexes/{}?api-version={}",
            self.endpoint, self.index_name, self.api_version
        );

        let response = self
            .client
            .put(url)
            .header("api-key", &self.api_key)
            .json(&index_definition(&self.index_name))
            .send()
            .map_err(|err| RmError::Search(format!("index create request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RmError::Search(format!(
                "index create-or-update HTTP {status}"
            )));
        }

        tracing::debug!(index = %self.index_name, "index schema ensured");
        Ok(())
    }
}

/// Normalize one engine row into a [`RawResult`]. Captions arrive either
/// as a plain string or as an array of `{text}` objects depending on the
/// engine's semantic configuration.
fn parse_row(row: &Value) -> Result<RawResult> {
    let mut row = row.clone();

    let caption = row
        .get("@search.captions")
        .map(|captions| match captions {
            Value::String(text) => Some(text.clone()),
            Value::Array(items) => items
                .first()
                .and_then(|item| item.get("text"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .unwrap_or_default();

    if let Value::Object(map) = &mut row {
        map.remove("@search.captions");
        if let Some(text) = caption {
            map.insert("semantic_caption".to_string(), Value::String(text));
        }
    }

    Ok(serde_json::from_value(row)?)
}
