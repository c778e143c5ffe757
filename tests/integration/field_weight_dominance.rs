//! spec.md §8 scenario: a term appearing in a `High`-weighted field
//! outranks the same term appearing only in a `Low`-weighted field,
//! holding term frequency equal.

use super::common::build_engine_with_fields;
use infidex::{SearchQuery, Weight};

#[test]
fn title_field_match_outranks_content_field_match() {
    let engine = build_engine_with_fields(&[
        (1, &[("title", "rust programming guide", Weight::High), ("body", "a book about cooking", Weight::Low)]),
        (2, &[("title", "cooking basics", Weight::High), ("body", "also mentions rust programming", Weight::Low)]),
    ]);

    let results = engine.search(SearchQuery::new("rust programming")).unwrap();
    assert_eq!(results[0].document_key, 1);
}
