//! `VectorModel` — Stage 1: inverted index, two-pass TF-IDF normalization,
//! byte-quantized cosine-similarity scoring.
//!
//! Grounded on the teacher's `inverted::build_inverted_index` two-pass
//! accumulate-then-normalize shape and `scoring::core`'s named-constant,
//! byte-oriented inner loop style, generalized from word-posting-list
//! field scoring to a full TF-IDF vector space with explicit L2
//! normalization and quantization, which the teacher's suffix-array /
//! field-hierarchy model does not do at all.

use crate::config::EngineConfig;
use crate::document::DocumentCollection;
use crate::progress::CancellationToken;
use crate::quantize::f2b;
use crate::term::TermCollection;
use crate::tokenizer::Tokenizer;
use crate::types::{weight_at, Field, FieldBoundary, ScoreEntry, StoredDocument, Weight, SECTION_SEPARATOR};
use std::collections::HashMap;

/// The result of tokenizing one document's fields, ready to fold into a
/// `VectorModel` via `apply_prepared`. Carries its own `words` (for the
/// caller's `WordMatcher::index_word` calls) alongside the shingles, so
/// a parallel ingest path only has to tokenize once per document.
pub struct PreparedDocument {
    pub key: i64,
    pub segment_number: i32,
    pub client_info: String,
    pub json_index: i32,
    pub indexed_text: String,
    pub field_boundaries: Vec<FieldBoundary>,
    pub shingles: Vec<crate::types::Shingle>,
    pub words: Vec<String>,
}

pub struct VectorModel {
    pub terms: TermCollection,
    pub documents: DocumentCollection,
    tokenizer: Tokenizer,
    field_weights: [f32; 3],
    stop_term_limit: u32,
    /// Set by `build_inverted_lists`; cleared by `index_document`.
    built: bool,
}

impl VectorModel {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            terms: TermCollection::new(),
            documents: DocumentCollection::new(),
            tokenizer: Tokenizer::new(config.index_sizes.clone(), config.start_pad, config.stop_pad),
            field_weights: config.field_weights,
            stop_term_limit: config.stop_term_limit,
            built: false,
        }
    }

    /// Rebuilds a model from persisted state, used by `persistence::load`.
    /// `field_weights`/`stop_term_limit`/tokenizer shape come from the
    /// caller-supplied `config`, not the persisted bytes — a loaded index
    /// is only meaningful under the config it was built with.
    pub(crate) fn from_parts(
        config: &EngineConfig,
        terms: TermCollection,
        documents: DocumentCollection,
        built: bool,
    ) -> Self {
        Self {
            terms,
            documents,
            tokenizer: Tokenizer::new(config.index_sizes.clone(), config.start_pad, config.stop_pad),
            field_weights: config.field_weights,
            stop_term_limit: config.stop_term_limit,
            built,
        }
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Concatenates indexable field values with `SECTION_SEPARATOR`,
    /// recording `FieldBoundary` entries at each start-of-field offset.
    fn build_indexed_text(fields: &[Field]) -> (String, Vec<FieldBoundary>) {
        let mut text = String::new();
        let mut boundaries = Vec::new();
        for field in fields.iter().filter(|f| f.indexable) {
            let pos = text.chars().count() as u16;
            boundaries.push(FieldBoundary {
                position: pos,
                weight_index: field.weight as u8,
            });
            text.push_str(&field.value);
            text.push(SECTION_SEPARATOR);
        }
        if boundaries.is_empty() {
            boundaries.push(FieldBoundary { position: 0, weight_index: Weight::Low as u8 });
        }
        (text, boundaries)
    }

    /// Registers `doc`, tokenizes its indexable fields, and accumulates
    /// raw field-weighted occurrences into the term registry. Clears the
    /// "built" flag — a subsequent `build_inverted_lists` call is
    /// required before queries see this document.
    pub fn index_document(
        &mut self,
        key: i64,
        segment_number: i32,
        fields: Vec<Field>,
        client_info: String,
        json_index: i32,
    ) -> i32 {
        let prepared = self.prepare_document(key, segment_number, fields, client_info, json_index);
        self.apply_prepared(prepared)
    }

    /// The pure, embarrassingly-parallel half of indexing: normalizes and
    /// shingles one document's fields without touching shared state. Split
    /// out from `index_document` so a caller ingesting many documents at
    /// once (`Engine::index_documents`) can run this half across threads
    /// with `rayon` (the `parallel` feature) before taking the writer lock
    /// for the sequential `apply_prepared` half.
    pub fn prepare_document(
        &self,
        key: i64,
        segment_number: i32,
        fields: Vec<Field>,
        client_info: String,
        json_index: i32,
    ) -> PreparedDocument {
        let (indexed_text, field_boundaries) = Self::build_indexed_text(&fields);
        let is_continuation = segment_number > 0;
        let shingles = self.tokenizer.tokenize_for_indexing(&indexed_text, is_continuation);
        let mut words = Vec::new();
        for field in fields.iter().filter(|f| f.indexable) {
            words.extend(self.tokenizer.words(&field.value));
        }
        PreparedDocument {
            key,
            segment_number,
            client_info,
            json_index,
            indexed_text,
            field_boundaries,
            shingles,
            words,
        }
    }

    /// The sequential half of indexing: assigns a dense internal id and
    /// folds `prepared`'s shingles into the term registry. Must run in
    /// document order (dense id assignment is order-dependent), so callers
    /// parallelizing `prepare_document` still apply results sequentially.
    pub fn apply_prepared(&mut self, prepared: PreparedDocument) -> i32 {
        let stored = StoredDocument {
            id: -1,
            key: prepared.key,
            segment_number: prepared.segment_number,
            client_info: prepared.client_info,
            json_index: prepared.json_index,
            indexed_text: prepared.indexed_text,
            field_boundaries: prepared.field_boundaries.clone(),
            deleted: false,
        };
        let internal_id = self.documents.add_document(stored);

        let is_continuation = prepared.segment_number > 0;
        let remove_duplicates = is_continuation;
        let start_pad = if is_continuation { 0 } else { self.tokenizer.start_pad as i32 };
        for shingle in prepared.shingles {
            // shingle.position is a char offset into the padded, normalized
            // text; field boundaries are recorded in char offsets into the
            // raw indexed_text, so un-pad before looking one up.
            let unpadded_pos = (shingle.position - start_pad).max(0) as usize;
            let weight = weight_at(&prepared.field_boundaries, unpadded_pos).multiplier(&self.field_weights);
            let term = self.terms.count_term_usage(&shingle.text, false);
            term.add_occurrence(internal_id, weight, remove_duplicates);
        }

        self.built = false;
        internal_id
    }

    /// Two-pass normalization (spec.md §4.E): pass 1 computes per-`(term,
    /// doc)` TF-IDF and accumulates each document's squared vector
    /// length; pass 2 L2-normalizes and byte-quantizes every posting.
    /// Afterward the inverted index is read-only until the next
    /// `index_document` call.
    pub fn build_inverted_lists(&mut self, cancel: &CancellationToken, poll_interval: usize) -> Result<(), ()> {
        let n = self.documents.live_count().max(1) as f64;
        let mut vector_length_sq: HashMap<i32, f64> = HashMap::new();
        // idf_{t,d} computed in pass 1, reused in pass 2 without recomputation.
        let mut idf_cache: HashMap<(String, i32), f64> = HashMap::new();

        let mut counted = 0usize;
        for (text, term) in self.terms.all_terms() {
            counted += 1;
            if counted % poll_interval == 0 && cancel.is_cancelled() {
                return Err(());
            }
            let df = term.raw_weights.len().max(1) as f64;
            for &(doc_id, raw_weight) in &term.raw_weights {
                let tf = raw_weight as f64;
                let idf = 1.0 + (n * tf / df).log10();
                idf_cache.insert((text.to_string(), doc_id), idf);
                *vector_length_sq.entry(doc_id).or_insert(0.0) += idf * idf;
            }
        }

        let vector_length: HashMap<i32, f64> = vector_length_sq
            .into_iter()
            .map(|(doc, sq)| (doc, sq.sqrt()))
            .collect();

        let mut counted = 0usize;
        self.terms.for_each_term_mut(|text, term| {
            counted += 1;
            let raw_weights = std::mem::take(&mut term.raw_weights);
            term.postings.clear();
            for (doc_id, _) in &raw_weights {
                let idf = *idf_cache.get(&(text.to_string(), *doc_id)).unwrap_or(&0.0);
                let len = vector_length.get(doc_id).copied().unwrap_or(0.0);
                let normalized = if len > 0.0 { idf / len } else { 0.0 };
                let byte_weight = f2b(normalized as f32);
                term.postings.push(crate::term::Posting { doc_internal_id: *doc_id, weight: byte_weight });
            }
            term.postings.sort_by_key(|p| p.doc_internal_id);
            term.document_frequency = term.postings.len() as i32;
        });
        let _ = counted;

        self.built = true;
        Ok(())
    }

    /// Stage 1 query-time scoring: builds a byte-quantized query vector,
    /// then accumulates `round(w_d * q_i / 255)` per posting into a
    /// zeroed byte accumulator, saturating at 255.
    pub fn search(&self, query_text: &str) -> Vec<(i32, u8)> {
        if !self.built {
            return Vec::new();
        }
        let (shingles, _) = self.tokenizer.tokenize_for_search(query_text);
        let n = self.documents.live_count().max(1) as f64;

        let mut query_raw: Vec<(String, f64)> = Vec::new();
        for shingle in &shingles {
            let Some(term) = self.terms.get_term(&shingle.text) else { continue };
            if term.document_frequency as u32 > self.stop_term_limit {
                continue;
            }
            if term.document_frequency == 0 {
                continue;
            }
            let idf = 1.0 + (n * shingle.occurrences as f64 / term.document_frequency as f64).log10();
            query_raw.push((shingle.text.clone(), idf));
        }
        if query_raw.is_empty() {
            return Vec::new();
        }
        let len: f64 = query_raw.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        let query_vec: Vec<(String, u8)> = query_raw
            .into_iter()
            .map(|(t, w)| (t, f2b((if len > 0.0 { w / len } else { 0.0 }) as f32)))
            .collect();

        let doc_count = self.documents.count();
        let mut accum = vec![0u8; doc_count];
        for (text, q_i) in &query_vec {
            let Some(term) = self.terms.get_term(text) else { continue };
            for posting in &term.postings {
                let idx = posting.doc_internal_id as usize;
                let contribution = ((posting.weight as f32) * (*q_i as f32) / 255.0).round() as i32;
                let slot = &mut accum[idx];
                *slot = (*slot as i32 + contribution).min(255).max(0) as u8;
            }
        }

        accum
            .into_iter()
            .enumerate()
            .filter(|(idx, score)| *score > 0 && !self.documents.get_document(*idx as i32).map(|d| d.deleted).unwrap_or(true))
            .map(|(idx, score)| (idx as i32, score))
            .collect()
    }

    pub fn score_entries(&self, byte_scores: &[(i32, u8)]) -> Vec<ScoreEntry> {
        byte_scores
            .iter()
            .filter_map(|(id, score)| {
                self.documents.get_document(*id).map(|doc| ScoreEntry { score: *score, document_key: doc.key })
            })
            .collect()
    }
}
