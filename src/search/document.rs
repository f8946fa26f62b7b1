//! Document and result types exchanged with the search index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::embedding::EmbeddingVector;
use crate::model::{HierarchyLevel, Role};

/// A role flattened into the index document schema.
///
/// Keyword lists are flattened to a single space-joined string before
/// indexing; `created_at` is serialized as an ISO-8601 timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct RoleDocument {
    pub id: String,
    pub title: String,
    pub description: String,
    pub industry_id: String,
    pub industry_name: String,
    pub hierarchy_level: String,
    pub search_keywords: String,
    pub embedding_vector: EmbeddingVector,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl RoleDocument {
    pub fn from_role(role: &Role, vector: EmbeddingVector) -> Self {
        Self {
            id: role.id.clone(),
            title: role.title.clone(),
            description: role.description.clone(),
            industry_id: role.industry_id.clone(),
            industry_name: role.industry_name.clone(),
            hierarchy_level: role.level.to_string(),
            search_keywords: role.search_keywords.join(" "),
            embedding_vector: vector,
            is_active: role.is_active,
            created_at: role.created_at,
        }
    }
}

/// One raw row from a hybrid query, before recalibration.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResult {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub industry_id: String,
    #[serde(default)]
    pub industry_name: String,
    #[serde(default)]
    pub hierarchy_level: Option<String>,
    #[serde(default)]
    pub search_keywords: String,
    #[serde(rename = "@search.score")]
    pub raw_score: f64,
    /// Extracted from the engine's caption payload by the client before
    /// deserialization.
    #[serde(default)]
    pub semantic_caption: Option<String>,
}

impl RawResult {
    pub fn level(&self) -> HierarchyLevel {
        self.hierarchy_level
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

/// Per-document tally for a batch upsert. Partial failure is expected
/// and reported here rather than raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub successful_uploads: usize,
    pub failed_uploads: usize,
    pub total_documents: usize,
}

impl IndexReport {
    pub fn record(&mut self, succeeded: bool) {
        self.total_documents += 1;
        if succeeded {
            self.successful_uploads += 1;
        } else {
            self.failed_uploads += 1;
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_uploads == 0
    }

    /// Summary string suitable for logging.
    pub fn summary(&self) -> String {
        format!(
            "{}/{} uploaded, {} failed",
            self.successful_uploads, self.total_documents, self.failed_uploads
        )
    }
}
