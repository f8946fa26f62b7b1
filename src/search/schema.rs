//! Index schema definition for the `roles` index.
//!
//! Schema management is an administrative operation separate from
//! query-time behavior; [`index_definition`] renders the create-or-update
//! payload and the client PUTs it idempotently.

use serde_json::{json, Value};

use crate::embedding::EMBEDDING_DIMS;

/// Vector similarity metric used by the engine profile.
pub const VECTOR_METRIC: &str = "cosine";

/// Render the full index definition for the given index name.
pub fn index_definition(index_name: &str) -> Value {
    json!({
        "name": index_name,
        "fields": [
            {"name": "id", "type": "Edm.String", "key": true, "filterable": true},
            {"name": "title", "type": "Edm.String", "searchable": true,
             "analyzer": "en.microsoft"},
            {"name": "description", "type": "Edm.String", "searchable": true,
             "analyzer": "en.microsoft"},
            {"name": "industry_id", "type": "Edm.String", "filterable": true},
            {"name": "industry_name", "type": "Edm.String", "searchable": true,
             "filterable": true, "analyzer": "en.microsoft"},
            {"name": "hierarchy_level", "type": "Edm.String", "filterable": true,
             "facetable": true},
            {"name": "search_keywords", "type": "Edm.String", "searchable": true,
             "analyzer": "en.microsoft"},
            {"name": "embedding_vector", "type": "Collection(Edm.Single)",
             "searchable": true, "dimensions": EMBEDDING_DIMS,
             "vectorSearchProfile": "roles-vector-profile"},
            {"name": "is_active", "type": "Edm.Boolean", "filterable": true},
            {"name": "created_at", "type": "Edm.DateTimeOffset", "filterable": true,
             "sortable": true},
        ],
        "vectorSearch": {
            "algorithms": [{
                "name": "roles-hnsw",
                "kind": "hnsw",
                "hnswParameters": {"metric": VECTOR_METRIC},
            }],
            "profiles": [{
                "name": "roles-vector-profile",
                "algorithm": "roles-hnsw",
            }],
        },
        "semantic": {
            "configurations": [{
                "name": "roles-semantic",
                "prioritizedFields": {
                    "titleField": {"fieldName": "title"},
                    "prioritizedContentFields": [
                        {"fieldName": "description"},
                        {"fieldName": "search_keywords"},
                    ],
                },
            }],
        },
    })
}
