//! Deterministic in-process fakes for the provider and index seams.
//!
//! Compiled into the library so both unit tests and the `tests/` tree
//! can share them. Nothing here touches the network.

use std::sync::Mutex;

use crate::completion::CompletionProvider;
use crate::embedding::{EmbeddingProvider, EmbeddingVector};
use crate::error::{Result, RmError};
use crate::search::{HybridQuery, IndexReport, RawResult, RoleDocument, SearchIndex};

/// Search index fake that replays canned results and records every
/// query and upload it receives.
#[derive(Debug, Default)]
pub struct StaticSearchIndex {
    results: Vec<RawResult>,
    fail: bool,
    state: Mutex<RecordedState>,
}

#[derive(Debug, Default)]
struct RecordedState {
    search_calls: usize,
    last_top: Option<usize>,
    last_filter: Option<String>,
    last_text: Option<String>,
    uploads: Vec<RoleDocument>,
}

impl StaticSearchIndex {
    pub fn with_results(results: Vec<RawResult>) -> Self {
        Self {
            results,
            fail: false,
            state: Mutex::new(RecordedState::default()),
        }
    }

    /// An index whose every call errors, for exercising failure paths.
    pub fn failing() -> Self {
        Self {
            results: Vec::new(),
            fail: true,
            state: Mutex::new(RecordedState::default()),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, RecordedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn search_calls(&self) -> usize {
        self.state().search_calls
    }

    pub fn last_top(&self) -> Option<usize> {
        self.state().last_top
    }

    pub fn last_filter(&self) -> Option<String> {
        self.state().last_filter.clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.state().last_text.clone()
    }

    pub fn uploaded_documents(&self) -> Vec<RoleDocument> {
        self.state().uploads.clone()
    }

    pub fn clear_uploads(&self) {
        self.state().uploads.clear();
    }
}

impl SearchIndex for StaticSearchIndex {
    fn hybrid_search(&self, query: &HybridQuery) -> Result<Vec<RawResult>> {
        let mut state = self.state();
        state.search_calls += 1;
        state.last_top = Some(query.top);
        state.last_filter = query.filter.clone();
        state.last_text = Some(query.text.clone());
        drop(state);

        if self.fail {
            return Err(RmError::Search("search unavailable".into()));
        }
        Ok(self.results.clone())
    }

    fn upsert_documents(&self, documents: &[RoleDocument]) -> Result<IndexReport> {
        if self.fail {
            return Err(RmError::Search("index unavailable".into()));
        }
        self.state().uploads.extend_from_slice(documents);

        let mut report = IndexReport::default();
        for _ in documents {
            report.record(true);
        }
        Ok(report)
    }
}

/// Completion provider that always returns the same canned response.
#[derive(Debug, Clone)]
pub struct StaticCompleter {
    response: String,
}

impl StaticCompleter {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl CompletionProvider for StaticCompleter {
    fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.response.clone())
    }
}

/// Completion provider that always fails, forcing fallback paths.
#[derive(Debug, Clone, Copy)]
pub struct FailingCompleter;

impl CompletionProvider for FailingCompleter {
    fn complete(&self, _prompt: &str) -> Result<String> {
        Err(RmError::Provider("completion unavailable".into()))
    }
}

/// Embedding provider that always fails, forcing fallback paths.
#[derive(Debug, Clone, Copy)]
pub struct FailingEmbedder;

impl EmbeddingProvider for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<EmbeddingVector> {
        Err(RmError::Provider("embedding unavailable".into()))
    }
}
