//! Role matching orchestration.
//!
//! Wires the embedding provider, the hybrid search index, and the score
//! recalibrator into one answer to "what existing roles match this job
//! description". Collaborators are injected, never constructed here.

use crate::config::{ScoringConfig, SearchConfig};
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::model::{JobDescription, RoleMatch};
use crate::scoring::{recalibrate, title_query_overlap};
use crate::search::{HybridQuery, IndustryFilter, RawResult, SearchIndex};

/// Reason strings attached to matches, in presentation order.
const REASON_SEMANTIC: &str = "Semantic content match";
const REASON_EXCELLENT: &str = "Excellent match";
const REASON_HIGH: &str = "High relevancy match";
const REASON_GOOD: &str = "Good relevancy match";
const REASON_ACCEPTABLE: &str = "Acceptable match";
const REASON_TITLE_KEYWORD: &str = "Title keyword match";

pub struct RoleMatcher<'a> {
    embedder: &'a dyn EmbeddingProvider,
    search: &'a dyn SearchIndex,
    scoring: ScoringConfig,
    over_fetch_factor: usize,
}

impl<'a> RoleMatcher<'a> {
    pub fn new(
        embedder: &'a dyn EmbeddingProvider,
        search: &'a dyn SearchIndex,
        scoring: ScoringConfig,
        search_config: &SearchConfig,
    ) -> Self {
        Self {
            embedder,
            search,
            scoring,
            over_fetch_factor: search_config.over_fetch_factor.max(1),
        }
    }

    /// Find existing roles matching a job description, ranked by
    /// recalibrated relevance.
    ///
    /// Embedding failure is fatal to the call: the resilient embedder
    /// has already absorbed everything absorbable, so an error here
    /// means no meaningful vector signal exists. Candidates below the
    /// minimum relevancy threshold are discarded outright, so fewer
    /// than `max_results` matches (including zero) may come back.
    pub fn find_matches(
        &self,
        job: &JobDescription,
        industry_filter: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<RoleMatch>> {
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed(&job.search_text())?;

        let query_text = job.text_query();
        let top = max_results * self.over_fetch_factor;
        let mut query = HybridQuery::new(query_text.clone(), vector, top);
        if let Some(industry) = industry_filter.map(str::trim).filter(|s| !s.is_empty()) {
            query = query.with_filter(&IndustryFilter::equals(industry));
        }

        let raw_results = self.search.hybrid_search(&query)?;
        tracing::debug!(
            candidates = raw_results.len(),
            max_results,
            "recalibrating hybrid search candidates"
        );

        let mut matches: Vec<RoleMatch> = raw_results
            .into_iter()
            .filter_map(|raw| self.score_candidate(raw, &query_text))
            .collect();

        // Stable sort keeps engine order as the tie-break.
        matches.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(max_results);

        Ok(matches)
    }

    fn score_candidate(&self, raw: RawResult, query_text: &str) -> Option<RoleMatch> {
        let score = recalibrate(raw.raw_score, &raw.title, query_text, &self.scoring);
        if score < self.scoring.min_relevancy {
            return None;
        }

        let reasons = match_reasons(&raw, score, query_text);
        let level = raw.level();

        Some(RoleMatch {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            industry_id: raw.industry_id,
            industry_name: raw.industry_name,
            hierarchy_level: level,
            search_keywords: raw
                .search_keywords
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            relevance_score: score,
            match_reasons: reasons,
        })
    }
}

fn match_reasons(raw: &RawResult, score: f64, query_text: &str) -> Vec<String> {
    let mut reasons = Vec::new();

    if raw.semantic_caption.is_some() {
        reasons.push(REASON_SEMANTIC.to_string());
    }

    let band = if score > 0.9 {
        REASON_EXCELLENT
    } else if score > 0.8 {
        REASON_HIGH
    } else if score > 0.7 {
        REASON_GOOD
    } else {
        REASON_ACCEPTABLE
    };
    reasons.push(band.to_string());

    if title_query_overlap(&raw.title, query_text) > 0 {
        reasons.push(REASON_TITLE_KEYWORD.to_string());
    }

    reasons
}
