//! spec.md §8 scenario: a query that misses Stage 1's TF-IDF cosine
//! similarity (too few shared shingles) is still rescued by Stage 2's
//! affix/prefix matching.

use super::common::build_engine;
use infidex::SearchQuery;

#[test]
fn prefix_affix_match_rescues_a_low_stage1_candidate() {
    let engine = build_engine(&[
        (1, "internationalization and localization frameworks"),
        (2, "a short unrelated sentence about gardening"),
    ]);

    let results = engine.search(SearchQuery::new("international")).unwrap();
    assert!(!results.is_empty());
    assert_eq!(results[0].document_key, 1);
}

#[test]
fn suffix_affix_match_is_found() {
    let engine = build_engine(&[(1, "the cats were running quickly"), (2, "birds fly south")]);

    let results = engine.search(SearchQuery::new("run")).unwrap();
    assert!(!results.is_empty());
    assert_eq!(results[0].document_key, 1);
}
