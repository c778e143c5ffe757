//! spec.md §8 scenario: saving and reloading an index reproduces
//! identical search results and statistics.

use super::common::build_engine;
use infidex::{EngineConfig, SearchQuery};

#[test]
fn save_load_reproduces_search_results_and_statistics() {
    let engine = build_engine(&[
        (1, "The quick brown fox jumps over the lazy dog"),
        (2, "A journey of a thousand miles begins with a single step"),
        (3, "To be or not to be, that is the question"),
    ]);

    let before_stats = engine.get_statistics();
    let before_results = engine.search(SearchQuery::new("qick fux")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.infidex");
    engine.save(&path).unwrap();
    let loaded = infidex::Engine::load(&path, EngineConfig::default()).unwrap();

    let after_stats = loaded.get_statistics();
    let after_results = loaded.search(SearchQuery::new("qick fux")).unwrap();

    assert_eq!(before_stats.document_count, after_stats.document_count);
    assert_eq!(before_stats.term_count, after_stats.term_count);
    assert!(after_stats.is_indexed);
    assert_eq!(before_results, after_results);
}
