//! Property: building two engines from the same documents in the same
//! order produces bit-exact search results — the public-API
//! observation of the "bit-exact postings" invariant, whose internal
//! form (identical `Posting` lists) isn't reachable from outside the
//! crate.

use super::common::build_engine;
use infidex::SearchQuery;
use proptest::prelude::*;

proptest! {
    #[test]
    fn identical_corpora_produce_identical_results(
        titles in prop::collection::vec("[a-z ]{3,30}", 1..15),
        query in "[a-z]{2,10}",
    ) {
        let docs: Vec<(i64, &str)> = titles.iter().enumerate().map(|(i, t)| (i as i64, t.as_str())).collect();
        let a = build_engine(&docs);
        let b = build_engine(&docs);

        let results_a = a.search(SearchQuery::new(query.clone())).unwrap();
        let results_b = b.search(SearchQuery::new(query)).unwrap();
        prop_assert_eq!(results_a, results_b);
    }
}
