//! Matching flow exercised end to end, both against the in-process
//! index fake and against a mocked HTTP search service.

use httpmock::prelude::*;
use serde_json::json;

use rolematch::config::{ScoringConfig, SearchConfig};
use rolematch::embedding::HashEmbedder;
use rolematch::matcher::RoleMatcher;
use rolematch::model::JobDescription;
use rolematch::search::{RawResult, SearchIndexClient};
use rolematch::test_utils::StaticSearchIndex;

fn canned(id: &str, title: &str, raw_score: f64) -> RawResult {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "description": "Works with numbers all day.",
        "industry_id": "ind-1",
        "industry_name": "Finance",
        "hierarchy_level": "associate",
        "search_keywords": "finance analysis",
        "@search.score": raw_score,
    }))
    .unwrap()
}

#[test]
fn strong_candidate_survives_weak_candidate_does_not() {
    let embedder = HashEmbedder::default();
    let index = StaticSearchIndex::with_results(vec![
        canned("strong", "Financial Analyst", 0.04),
        canned("weak", "Veterinary Assistant", 0.005),
    ]);
    let matcher = RoleMatcher::new(
        &embedder,
        &index,
        ScoringConfig::default(),
        &SearchConfig::default(),
    );
    let job = JobDescription::new("Financial Analyst", "Builds Excel forecast models.");

    let matches = matcher.find_matches(&job, None, 10).unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "strong");
    assert!((matches[0].relevance_score - 1.0).abs() < 1e-9);
    assert!(matches[0]
        .match_reasons
        .contains(&"Excellent match".to_string()));
}

#[test]
fn no_candidates_above_threshold_yields_empty_not_error() {
    let embedder = HashEmbedder::default();
    let index = StaticSearchIndex::with_results(vec![
        canned("a", "Zookeeper", 0.003),
        canned("b", "Lighthouse Keeper", 0.004),
    ]);
    let matcher = RoleMatcher::new(
        &embedder,
        &index,
        ScoringConfig::default(),
        &SearchConfig::default(),
    );
    let job = JobDescription::new("Financial Analyst", "Builds Excel forecast models.");

    let matches = matcher.find_matches(&job, None, 10).unwrap();
    assert!(matches.is_empty());
}

#[test]
fn full_match_over_mocked_search_service() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/indexes/roles/docs/search")
            .query_param("api-version", "2024-07-01")
            .header("api-key", "secret")
            .json_body_includes(
                json!({
                    "queryType": "semantic",
                    "filter": "industry_name eq 'Finance'",
                    "top": 6,
                })
                .to_string(),
            );
        then.status(200).json_body(json!({
            "value": [
                {
                    "id": "role-1",
                    "title": "Financial Analyst",
                    "description": "Analyzes financial data.",
                    "industry_id": "ind-1",
                    "industry_name": "Finance",
                    "hierarchy_level": "supervisor",
                    "search_keywords": "finance excel",
                    "@search.score": 0.04,
                    "@search.captions": [{"text": "Analyzes financial data."}],
                },
            ],
        }));
    });

    let search_config = SearchConfig {
        endpoint: server.base_url(),
        api_key: "secret".to_string(),
        ..SearchConfig::default()
    };
    let client = SearchIndexClient::from_config(&search_config).unwrap();
    let embedder = HashEmbedder::default();
    let matcher = RoleMatcher::new(
        &embedder,
        &client,
        ScoringConfig::default(),
        &search_config,
    );

    let job = JobDescription::new("Financial Analyst", "Builds Excel forecast models.");
    let matches = matcher.find_matches(&job, Some("Finance"), 2).unwrap();

    mock.assert();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "role-1");
    assert_eq!(matches[0].match_reasons[0], "Semantic content match");
    assert_eq!(
        matches[0].hierarchy_level,
        rolematch::model::HierarchyLevel::Supervisor
    );
}

#[test]
fn service_outage_surfaces_as_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/indexes/roles/docs/search");
        then.status(503).body("upstream unavailable");
    });

    let search_config = SearchConfig {
        endpoint: server.base_url(),
        api_key: "secret".to_string(),
        ..SearchConfig::default()
    };
    let client = SearchIndexClient::from_config(&search_config).unwrap();
    let embedder = HashEmbedder::default();
    let matcher = RoleMatcher::new(
        &embedder,
        &client,
        ScoringConfig::default(),
        &search_config,
    );

    let job = JobDescription::new("Analyst", "Data work.");
    let result = matcher.find_matches(&job, None, 3);
    assert!(result.is_err());
}
