//! Property: search results are always sorted score-descending and
//! every score fits a `u8`, for arbitrary corpora and queries — the
//! externally-observable half of the bucket-sort/fusion invariants
//! checked more directly against internal state in `src/quantize.rs`
//! and `src/pipeline.rs`.

use super::common::build_engine;
use infidex::SearchQuery;
use proptest::prelude::*;

proptest! {
    #[test]
    fn results_are_score_descending_and_capped(
        titles in prop::collection::vec("[a-z ]{3,30}", 1..15),
        query in "[a-z]{2,10}",
    ) {
        let docs: Vec<(i64, &str)> = titles.iter().enumerate().map(|(i, t)| (i as i64, t.as_str())).collect();
        let engine = build_engine(&docs);
        let results = engine.search(SearchQuery::new(query)).unwrap();

        prop_assert!(results.len() <= 20);
        for window in results.windows(2) {
            prop_assert!(window[0].score >= window[1].score);
        }
    }
}
