//! Authoring pipeline exercised against the real SQLite store and the
//! in-process index fake.

use rolematch::authoring::RoleAuthoringPipeline;
use rolematch::embedding::HashEmbedder;
use rolematch::model::{HierarchyLevel, JobDescription};
use rolematch::store::{RoleStore, SqliteRoleStore};
use rolematch::test_utils::{FailingCompleter, StaticCompleter, StaticSearchIndex};

fn store() -> SqliteRoleStore {
    let store = SqliteRoleStore::open_in_memory().unwrap();
    store.upsert_industry("ind-7", "Healthcare").unwrap();
    store
}

#[test]
fn authored_role_is_stored_and_indexed() {
    let embedder = HashEmbedder::default();
    let index = StaticSearchIndex::with_results(vec![]);
    let store = store();
    let pipeline = RoleAuthoringPipeline::new(None, &embedder, &index, &store);

    let job = JobDescription::new(
        "Registered Nurse",
        "I provide patient care and I coordinate with physicians.",
    )
    .with_level(HierarchyLevel::Associate);

    let authored = pipeline.author_role(&job, "ind-7").unwrap();

    // Stored.
    let stored = store.fetch(&authored.role.id).unwrap().unwrap();
    assert_eq!(stored.industry_name, "Healthcare");
    assert!(stored.is_active);

    // Indexed with the rewritten description.
    let uploaded = index.uploaded_documents();
    assert_eq!(uploaded.len(), 1);
    assert_eq!(uploaded[0].id, authored.role.id);
    assert_eq!(uploaded[0].description, authored.role.description);
    assert_eq!(uploaded[0].embedding_vector.as_slice().len(), 1536);
}

#[test]
fn first_person_voice_is_rewritten_without_a_provider() {
    let embedder = HashEmbedder::default();
    let index = StaticSearchIndex::with_results(vec![]);
    let store = store();
    let pipeline = RoleAuthoringPipeline::new(None, &embedder, &index, &store);

    let job = JobDescription::new(
        "Registered Nurse",
        "I provide patient care in my ward.",
    );
    let authored = pipeline.author_role(&job, "ind-7").unwrap();

    assert!(authored.ai_enhancements.was_rewritten);
    assert!(!authored.role.description.contains("I provide"));
    assert!(!authored.role.description.contains(" my "));
}

#[test]
fn provider_keywords_are_parsed_and_bounded() {
    let embedder = HashEmbedder::default();
    let index = StaticSearchIndex::with_results(vec![]);
    let store = store();
    let completer = StaticCompleter::new(
        "nursing, patient care, triage, medication, charting, scheduling, empathy, iv therapy, extra, overflow",
    );
    let pipeline = RoleAuthoringPipeline::new(Some(&completer), &embedder, &index, &store);

    let job = JobDescription::new("Registered Nurse", "Provides patient care.");
    let authored = pipeline.author_role(&job, "ind-7").unwrap();

    let keywords = &authored.role.search_keywords;
    assert!(keywords.len() <= 8);
    assert!(keywords.contains(&"nursing".to_string()));
    assert!(keywords.contains(&"patient care".to_string()));
}

#[test]
fn all_provider_failures_still_author_a_complete_role() {
    let embedder = HashEmbedder::default();
    let index = StaticSearchIndex::failing();
    let store = store();
    let completer = FailingCompleter;
    let pipeline = RoleAuthoringPipeline::new(Some(&completer), &embedder, &index, &store);

    let job = JobDescription::new(
        "Registered Nurse",
        "I provide patient care and coordinate with physicians daily.",
    );
    let authored = pipeline.author_role(&job, "ind-7").unwrap();

    assert!(authored.role.search_keywords.len() >= 5);
    assert!(store.fetch(&authored.role.id).unwrap().is_some());
}

#[test]
fn authored_roles_round_trip_through_reindex() {
    let embedder = HashEmbedder::default();
    let index = StaticSearchIndex::with_results(vec![]);
    let store = store();
    let pipeline = RoleAuthoringPipeline::new(None, &embedder, &index, &store);

    pipeline
        .author_role(
            &JobDescription::new("Registered Nurse", "Provides patient care."),
            "ind-7",
        )
        .unwrap();
    pipeline
        .author_role(
            &JobDescription::new("Lab Technician", "Runs diagnostic panels."),
            "ind-7",
        )
        .unwrap();

    index.clear_uploads();
    let count = pipeline.reindex_all().unwrap();

    assert_eq!(count, 2);
    assert_eq!(index.uploaded_documents().len(), 2);
}
