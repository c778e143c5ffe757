//! Shared fixtures for integration and property tests.

#![allow(dead_code)]

use infidex::{Document, Engine, EngineConfig, Field, Weight};

/// Builds and indexes an engine from `(key, title)` pairs, all stored in
/// a single `High`-weighted `title` field, then runs `calculate_weights`
/// so it is ready to search.
pub fn build_engine(docs: &[(i64, &str)]) -> Engine {
    let engine = Engine::new(EngineConfig::default()).expect("valid config");
    for &(key, title) in docs {
        engine
            .index_document(Document::new(key, vec![Field::new("title", title, Weight::High)]))
            .expect("index_document");
    }
    engine.calculate_weights().expect("calculate_weights");
    engine
}

/// Builds and indexes an engine from documents with named, weighted
/// fields: `(key, [(field_name, field_value, weight), ...])`.
pub fn build_engine_with_fields(docs: &[(i64, &[(&str, &str, Weight)])]) -> Engine {
    let engine = Engine::new(EngineConfig::default()).expect("valid config");
    for &(key, fields) in docs {
        let fields = fields
            .iter()
            .map(|(name, value, weight)| Field::new(*name, *value, *weight))
            .collect();
        engine.index_document(Document::new(key, fields)).expect("index_document");
    }
    engine.calculate_weights().expect("calculate_weights");
    engine
}
