//! Hybrid query construction.
//!
//! The filter expression is an opaque predicate string as far as the
//! engine is concerned; internally it is always built through
//! [`IndustryFilter`] so values containing quotes cannot break out of
//! the predicate.

use serde_json::{json, Value};

use crate::embedding::EmbeddingVector;

/// Fields requested back from the engine at query time.
pub const SELECT_FIELDS: &str =
    "id,title,description,industry_id,industry_name,hierarchy_level,search_keywords";

/// Typed builder for the single equality predicate the matcher uses.
#[derive(Debug, Clone)]
pub struct IndustryFilter {
    industry_name: String,
}

impl IndustryFilter {
    pub fn equals(industry_name: impl Into<String>) -> Self {
        Self {
            industry_name: industry_name.into(),
        }
    }

    /// Render the predicate, doubling single quotes in the value.
    pub fn to_expression(&self) -> String {
        let escaped = self.industry_name.replace('\'', "''");
        format!("industry_name eq '{escaped}'")
    }
}

/// A fully-specified hybrid (text + vector + optional filter) query.
#[derive(Debug, Clone)]
pub struct HybridQuery {
    pub text: String,
    pub vector: EmbeddingVector,
    pub top: usize,
    pub filter: Option<String>,
}

impl HybridQuery {
    pub fn new(text: impl Into<String>, vector: EmbeddingVector, top: usize) -> Self {
        Self {
            text: text.into(),
            vector,
            top,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: &IndustryFilter) -> Self {
        self.filter = Some(filter.to_expression());
        self
    }

    /// Pass an already-rendered predicate through verbatim.
    pub fn with_filter_expression(mut self, expression: impl Into<String>) -> Self {
        self.filter = Some(expression.into());
        self
    }

    /// Render the engine request body.
    pub fn to_body(&self) -> Value {
        let mut body = json!({
            "search": self.text,
            "top": self.top,
            "select": SELECT_FIELDS,
            "queryType": "semantic",
            "vectorQueries": [{
                "kind": "vector",
                "vector": self.vector.as_slice(),
                "fields": "embedding_vector",
                "k": self.top,
            }],
        });
        if let Some(filter) = &self.filter {
            body["filter"] = Value::String(filter.clone());
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{EmbeddingProvider, HashEmbedder};

    fn vector() -> EmbeddingVector {
        HashEmbedder::default().embed("query").unwrap()
    }

    #[test]
    fn filter_renders_equality_predicate() {
        let filter = IndustryFilter::equals("Finance");
        assert_eq!(filter.to_expression(), "industry_name eq 'Finance'");
    }

    #[test]
    fn filter_escapes_single_quotes() {
        let filter = IndustryFilter::equals("O'Brien & Sons");
        assert_eq!(filter.to_expression(), "industry_name eq 'O''Brien & Sons'");
    }

    #[test]
    fn body_includes_text_and_vector_legs() {
        let query = HybridQuery::new("financial analyst", vector(), 15);
        let body = query.to_body();
        assert_eq!(body["search"], "financial analyst");
        assert_eq!(body["top"], 15);
        assert_eq!(body["vectorQueries"][0]["k"], 15);
        assert_eq!(body["vectorQueries"][0]["fields"], "embedding_vector");
        assert_eq!(body["vectorQueries"][0]["vector"].as_array().unwrap().len(), 1536);
        assert!(body.get("filter").is_none());
    }

    #[test]
    fn body_carries_filter_when_present() {
        let query = HybridQuery::new("analyst", vector(), 9)
            .with_filter(&IndustryFilter::equals("Finance"));
        let body = query.to_body();
        assert_eq!(body["filter"], "industry_name eq 'Finance'");
    }
}
