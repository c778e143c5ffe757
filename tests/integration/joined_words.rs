//! spec.md §8 scenario: a two-word query ranks a document where the
//! words appear joined (no space) above an unrelated document, via
//! Stage 2's joined/split algorithm.

use super::common::build_engine;
use infidex::SearchQuery;

#[test]
fn joined_words_in_document_matches_split_query() {
    let engine = build_engine(&[(1, "newyork city guide"), (2, "Los Angeles weather report")]);

    let results = engine.search(SearchQuery::new("new york")).unwrap();
    assert_eq!(results[0].document_key, 1);
}

#[test]
fn split_words_in_document_match_joined_query() {
    let engine = build_engine(&[(1, "the ice cream shop"), (2, "a grocery store downtown")]);

    let results = engine.search(SearchQuery::new("icecream")).unwrap();
    assert_eq!(results[0].document_key, 1);
}
