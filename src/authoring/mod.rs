//! AI-assisted role authoring.
//!
//! Turns a raw job description into a persisted, searchable role:
//! rewrite the description into professional third-person voice,
//! generate search keywords, store the role, then index it. Persistence
//! is the point of no return; indexing after it is best-effort and an
//! indexing failure never unwinds the stored role.

use chrono::Utc;
use uuid::Uuid;

use crate::completion::{generate_keywords, rewrite_description, CompletionProvider};
use crate::embedding::EmbeddingProvider;
use crate::error::{Result, RmError};
use crate::model::{AiEnhancements, AuthoredRole, JobDescription, Role};
use crate::search::{RoleDocument, SearchIndex};
use crate::store::RoleStore;

pub struct RoleAuthoringPipeline<'a> {
    completer: Option<&'a dyn CompletionProvider>,
    embedder: &'a dyn EmbeddingProvider,
    search: &'a dyn SearchIndex,
    store: &'a dyn RoleStore,
}

impl std::fmt::Debug for RoleAuthoringPipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleAuthoringPipeline")
            .field("completer", &self.completer.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> RoleAuthoringPipeline<'a> {
    pub fn new(
        completer: Option<&'a dyn CompletionProvider>,
        embedder: &'a dyn EmbeddingProvider,
        search: &'a dyn SearchIndex,
        store: &'a dyn RoleStore,
    ) -> Self {
        Self {
            completer,
            embedder,
            search,
            store,
        }
    }

    /// Author and persist a new role from a job description.
    ///
    /// Errors before [`RoleStore::insert`] leave no trace; errors from
    /// the insert itself surface as [`RmError::Authoring`]. Embedding or
    /// indexing failures after the insert are logged and swallowed, the
    /// role is still returned.
    pub fn author_role(&self, job: &JobDescription, industry_id: &str) -> Result<AuthoredRole> {
        let title = job.title.trim();
        if title.is_empty() {
            return Err(RmError::Validation("role title must not be empty".into()));
        }
        let original = job.description.trim();
        if original.is_empty() {
            return Err(RmError::Validation(
                "role description must not be empty".into(),
            ));
        }

        let industry_name = self
            .store
            .industry_name(industry_id)?
            .ok_or_else(|| RmError::Validation(format!("unknown industry id: {industry_id}")))?;

        let (rewritten, was_rewritten) = rewrite_description(self.completer, title, original);
        let keywords = generate_keywords(self.completer, title, &rewritten);

        let role = Role {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: rewritten.clone(),
            industry_id: industry_id.to_string(),
            industry_name,
            level: job.level,
            search_keywords: keywords.clone(),
            is_active: true,
            created_at: Utc::now(),
        };

        self.store
            .insert(&role)
            .map_err(|err| RmError::Authoring(format!("failed to persist role: {err}")))?;
        tracing::info!(role_id = %role.id, title = %role.title, "role persisted");

        self.index_role(&role);

        Ok(AuthoredRole {
            role,
            ai_enhancements: AiEnhancements {
                original_description: original.to_string(),
                rewritten_description: rewritten,
                generated_keywords: keywords,
                was_rewritten,
            },
        })
    }

    /// Push every active role back into the search index. Used after
    /// schema changes or index rebuilds.
    pub fn reindex_all(&self) -> Result<usize> {
        let roles = self.store.fetch_all_active()?;
        let mut documents = Vec::with_capacity(roles.len());
        for role in &roles {
            let vector = self.embedder.embed(&role_search_text(role))?;
            documents.push(RoleDocument::from_role(role, vector));
        }

        let report = self.search.upsert_documents(&documents)?;
        if !report.all_succeeded() {
            return Err(RmError::Search(format!(
                "reindex incomplete: {}",
                report.summary()
            )));
        }
        Ok(report.successful_uploads)
    }

    fn index_role(&self, role: &Role) {
        let vector = match self.embedder.embed(&role_search_text(role)) {
            Ok(vector) => vector,
            Err(err) => {
                tracing::warn!(role_id = %role.id, error = %err, "skipping index update, embedding failed");
                return;
            }
        };

        let document = RoleDocument::from_role(role, vector);
        match self.search.upsert_documents(std::slice::from_ref(&document)) {
            Ok(report) if report.all_succeeded() => {}
            Ok(report) => {
                tracing::warn!(role_id = %role.id, summary = %report.summary(), "index upsert partially failed");
            }
            Err(err) => {
                tracing::warn!(role_id = %role.id, error = %err, "index upsert failed, role remains stored");
            }
        }
    }
}

fn role_search_text(role: &Role) -> String {
    let mut text = format!("{} {} {}", role.title, role.level, role.description);
    if !role.search_keywords.is_empty() {
        text.push(' ');
        text.push_str(&role.search_keywords.join(" "));
    }
    text
}
