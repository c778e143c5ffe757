//! spec.md §8 scenario: a typo'd query still finds its target inside a
//! large corpus of near-duplicate titles. Downscaled from the spec's
//! ~40,000-title figure to keep this test fast; the rescue mechanism
//! being exercised (Stage 2 fuzzy-LD1 over `coverage_depth` Stage 1
//! candidates) doesn't depend on corpus size once the target is within
//! `coverage_depth`.

use super::common::build_engine;
use infidex::SearchQuery;

#[test]
fn typo_query_finds_target_among_thousands_of_similar_titles() {
    let mut docs: Vec<(i64, String)> = (0..4000)
        .map(|i| (i as i64, format!("quarterly report volume {i} annual summary")))
        .collect();
    docs.push((9999, "Expedition to the Himalayas".to_string()));

    let refs: Vec<(i64, &str)> = docs.iter().map(|(k, t)| (*k, t.as_str())).collect();
    let engine = build_engine(&refs);

    let results = engine.search(SearchQuery::new("Himalayass expidition")).unwrap();
    assert!(!results.is_empty());
    assert_eq!(results[0].document_key, 9999);
}
