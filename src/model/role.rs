use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::HierarchyLevel;

/// Canonical role record owned by the persistence boundary.
///
/// Lifecycle: created by the authoring pipeline or a seeding process,
/// mutated only by explicit updates, never hard-deleted -- roles are
/// deactivated instead so existing matches keep resolving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub title: String,
    /// Always stored in third-person/professional voice.
    pub description: String,
    pub industry_id: String,
    pub industry_name: String,
    pub level: HierarchyLevel,
    /// Order-insensitive set of search keywords.
    pub search_keywords: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Whether this role carries the given keyword, ignoring case.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.search_keywords
            .iter()
            .any(|k| k.eq_ignore_ascii_case(keyword))
    }
}

/// A matched role paired with its recalibrated relevance and the
/// human-readable reasons it matched. Constructed fresh per query from
/// the engine's selectable fields; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleMatch {
    pub id: String,
    pub title: String,
    pub description: String,
    pub industry_id: String,
    pub industry_name: String,
    pub hierarchy_level: HierarchyLevel,
    pub search_keywords: Vec<String>,
    /// Clamped to [0.0, 1.0]; serialized with full precision.
    pub relevance_score: f64,
    pub match_reasons: Vec<String>,
}

/// Record of what the AI-assisted authoring actually did to the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiEnhancements {
    pub original_description: String,
    pub rewritten_description: String,
    pub generated_keywords: Vec<String>,
    /// False when the rewrite came back byte-identical and the fallback
    /// table also changed nothing.
    pub was_rewritten: bool,
}

/// Output of the authoring pipeline: the persisted role plus the
/// enhancement record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthoredRole {
    pub role: Role,
    pub ai_enhancements: AiEnhancements,
}
