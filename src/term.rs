//! `Term` and `TermCollection`: the term <-> posting-list registry.
//!
//! Grounded on the teacher's `inverted::build_inverted_index` accumulation
//! pattern (`HashMap<String, Vec<Posting>>`, sorted postings, doc-freq by
//! dedup count) generalized to carry float field-weight accumulation
//! through a two-pass TF-IDF build instead of one-shot word postings.

use std::collections::HashMap;

/// One `(doc_internal_id, weight)` entry in a term's posting list.
///
/// During the first indexing pass `weight` holds raw field-weight
/// contributions (as an accumulated float, stored in `raw_weight` on the
/// owning `Term`); `build_inverted_lists` overwrites it with the final
/// byte-quantized weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc_internal_id: i32,
    pub weight: u8,
}

/// A term's registry entry: document frequency plus its posting list.
///
/// # Invariants
/// - `postings` sorted ascending by `doc_internal_id`, no duplicate ids
///   except where segment-continuation merging explicitly keeps one.
/// - `document_frequency == postings.len()` once `build_inverted_lists`
///   has run.
#[derive(Debug, Clone, Default)]
pub struct Term {
    pub document_frequency: i32,
    pub postings: Vec<Posting>,
    /// Raw accumulated field-weight per `doc_internal_id`, insertion
    /// order, consumed and cleared by `build_inverted_lists` pass 1.
    /// `(doc_internal_id, raw_weight_sum)`.
    pub raw_weights: Vec<(i32, f32)>,
}

impl Term {
    /// Accumulates a shingle occurrence's field weight for `doc_id`.
    ///
    /// `remove_duplicates` is set by the caller when
    /// `segment_number > 0` (continuation segments must not double-count
    /// identical shingles re-seen at a segment boundary); for a
    /// non-continuation document, repeat occurrences of the same shingle
    /// in one document are each counted (kept both), integrated later by
    /// TF summation in pass 1.
    pub fn add_occurrence(&mut self, doc_id: i32, field_weight: f32, remove_duplicates: bool) {
        if remove_duplicates {
            if let Some(entry) = self.raw_weights.iter_mut().find(|(d, _)| *d == doc_id) {
                entry.1 = entry.1.max(field_weight);
                return;
            }
        }
        if let Some(entry) = self.raw_weights.iter_mut().find(|(d, _)| *d == doc_id) {
            entry.1 += field_weight;
        } else {
            self.raw_weights.push((doc_id, field_weight));
        }
    }
}

/// Mapping `text -> Term`, unique on `text`.
#[derive(Debug, Clone, Default)]
pub struct TermCollection {
    terms: HashMap<String, Term>,
    /// Stable insertion order, so `all_terms()` enumerates identically
    /// across repeated builds over the same input.
    order: Vec<String>,
}

impl TermCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a collection from `(text, Term)` pairs in persisted
    /// order, used by `persistence::load`.
    pub(crate) fn from_entries(entries: Vec<(String, Term)>) -> Self {
        let mut terms = HashMap::with_capacity(entries.len());
        let mut order = Vec::with_capacity(entries.len());
        for (text, term) in entries {
            order.push(text.clone());
            terms.insert(text, term);
        }
        Self { terms, order }
    }

    /// Looks up or creates the term for `text`, incrementing
    /// `document_frequency` unless `for_fast_insert` is set. A term
    /// whose frequency exceeds `stop_term_limit` is retained — it is
    /// merely excluded from query matching later, never removed here.
    pub fn count_term_usage(&mut self, text: &str, for_fast_insert: bool) -> &mut Term {
        if !self.terms.contains_key(text) {
            self.terms.insert(text.to_string(), Term::default());
            self.order.push(text.to_string());
        }
        let term = self.terms.get_mut(text).expect("just inserted");
        if !for_fast_insert {
            term.document_frequency += 1;
        }
        term
    }

    pub fn get_term(&self, text: &str) -> Option<&Term> {
        self.terms.get(text)
    }

    pub fn get_term_mut(&mut self, text: &str) -> Option<&mut Term> {
        self.terms.get_mut(text)
    }

    /// Stable enumeration for build passes: order must be reproducible
    /// between the two normalization passes (and across repeated builds
    /// over the same input, for the bit-exact-postings property).
    pub fn all_terms(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.order.iter().map(move |t| (t.as_str(), &self.terms[t]))
    }

    /// Visits every term in stable insertion order, each with exclusive
    /// access. Takes a closure rather than returning an iterator of
    /// `&mut Term` because the borrow checker can't otherwise see that
    /// `order`'s entries name distinct map keys.
    pub fn for_each_term_mut(&mut self, mut f: impl FnMut(&str, &mut Term)) {
        for text in &self.order {
            if let Some(term) = self.terms.get_mut(text) {
                f(text, term);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
