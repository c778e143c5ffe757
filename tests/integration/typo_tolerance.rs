//! spec.md §8 scenario: a two-character-typo query still ranks the
//! correct document first, via Stage 2's fuzzy-LD1 rescue.

use super::common::build_engine;
use infidex::SearchQuery;

#[test]
fn two_typo_query_still_finds_correct_document() {
    let engine = build_engine(&[
        (1, "The quick brown fox jumps over the lazy dog"),
        (2, "A journey of a thousand miles begins with a single step"),
        (3, "To be or not to be, that is the question"),
    ]);

    let results = engine.search(SearchQuery::new("qick fux")).unwrap();
    assert!(!results.is_empty());
    assert_eq!(results[0].document_key, 1);
}

#[test]
fn single_typo_scores_higher_than_unrelated_document() {
    let engine = build_engine(&[(1, "elephant sanctuary"), (2, "quarterly tax filing")]);

    let results = engine.search(SearchQuery::new("elefant sanctuary")).unwrap();
    assert_eq!(results[0].document_key, 1);
    assert!(results[0].score > 0);
}
