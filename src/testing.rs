//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation. It
//! provides canonical helper constructors to avoid duplicating fixture
//! setup across every test file.

#![doc(hidden)]

use crate::types::{Document, Field, Weight};

/// A single-field document with the given key and body text, weighted
/// `High`.
pub fn make_document(key: i64, text: &str) -> Document {
    Document::new(key, vec![Field::new("body", text, Weight::High)])
}

/// A document with an explicit set of `(name, value, weight)` fields.
pub fn make_document_with_fields(key: i64, fields: &[(&str, &str, Weight)]) -> Document {
    Document::new(
        key,
        fields.iter().map(|(name, value, weight)| Field::new(*name, *value, *weight)).collect(),
    )
}

/// A non-indexable metadata field, for tests exercising field filtering.
pub fn make_metadata_field(name: &str, value: &str) -> Field {
    Field::metadata(name, value)
}
