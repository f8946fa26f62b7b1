//! Client for the hosted hybrid (vector + keyword) search service.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      HybridQuery                          │
//! │   text leg + 1536-dim vector leg + optional filter        │
//! └───────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//!               ┌─────────────────────────┐
//!               │    SearchIndexClient    │
//!               │  (REST, api-key auth)   │
//!               └─────────────────────────┘
//!                            │
//!                            ▼
//!              raw engine rows (RawResult), engine order
//! ```
//!
//! Scores coming back here are raw engine scores; recalibration into
//! the [0, 1] relevancy range happens in [`crate::scoring`].

pub mod client;
pub mod document;
pub mod query;
pub mod schema;

pub use client::SearchIndexClient;
pub use document::{IndexReport, RawResult, RoleDocument};
pub use query::{HybridQuery, IndustryFilter, SELECT_FIELDS};
pub use schema::{index_definition, VECTOR_METRIC};

use crate::error::Result;

/// Query/indexing seam consumed by the matcher and authoring pipeline,
/// so tests can substitute a deterministic in-process index.
pub trait SearchIndex: Send + Sync {
    fn hybrid_search(&self, query: &HybridQuery) -> Result<Vec<RawResult>>;
    fn upsert_documents(&self, documents: &[RoleDocument]) -> Result<IndexReport>;
}

impl SearchIndex for SearchIndexClient {
    fn hybrid_search(&self, query: &HybridQuery) -> Result<Vec<RawResult>> {
        SearchIndexClient::hybrid_search(self, query)
    }

    fn upsert_documents(&self, documents: &[RoleDocument]) -> Result<IndexReport> {
        SearchIndexClient::upsert_documents(self, documents)
    }
}
