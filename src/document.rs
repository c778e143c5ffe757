//! `DocumentCollection`: dense internal ids, key lookup, segment grouping.
//!
//! Grounded on the teacher's dense-id `SearchDoc`/`docs: Vec<SearchDoc>`
//! storage in `types.rs`/`index.rs`, generalized with a `key -> ids`
//! index since this engine's documents are keyed by caller-chosen `i64`
//! rather than a positional slug.

use crate::types::StoredDocument;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct DocumentCollection {
    docs: Vec<StoredDocument>,
    by_key: HashMap<i64, Vec<i32>>,
}

impl DocumentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the `by_key` index from already-assigned `StoredDocument`s,
    /// used by `persistence::load`.
    pub(crate) fn from_docs(docs: Vec<StoredDocument>) -> Self {
        let mut by_key: HashMap<i64, Vec<i32>> = HashMap::new();
        for doc in &docs {
            by_key.entry(doc.key).or_default().push(doc.id);
        }
        for ids in by_key.values_mut() {
            ids.sort_unstable();
        }
        Self { docs, by_key }
    }

    /// Assigns the next dense internal id and stores `doc`. Collisions
    /// on `(key, segment_number)` are the caller's responsibility —
    /// this layer rejects nothing.
    pub fn add_document(&mut self, mut doc: StoredDocument) -> i32 {
        let id = self.docs.len() as i32;
        doc.id = id;
        let key = doc.key;
        self.docs.push(doc);
        let ids = self.by_key.entry(key).or_default();
        ids.push(id);
        ids.sort_unstable();
        id
    }

    pub fn get_document(&self, internal_id: i32) -> Option<&StoredDocument> {
        self.docs.get(internal_id as usize)
    }

    /// The lowest-numbered segment sharing `key` (i.e. the one with
    /// `segment_number == 0`, which is always the lowest internal id in
    /// the contiguous range for that key).
    pub fn get_document_by_key(&self, key: i64) -> Option<&StoredDocument> {
        let ids = self.by_key.get(&key)?;
        ids.first().and_then(|id| self.get_document(*id))
    }

    /// All segments sharing `key`, in segment order.
    pub fn get_documents_by_key(&self, key: i64) -> Vec<&StoredDocument> {
        match self.by_key.get(&key) {
            Some(ids) => ids.iter().filter_map(|id| self.get_document(*id)).collect(),
            None => Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.docs.len()
    }

    pub fn live_count(&self) -> usize {
        self.docs.iter().filter(|d| !d.deleted).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredDocument> {
        self.docs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(key: i64, segment: i32) -> StoredDocument {
        StoredDocument {
            id: -1,
            key,
            segment_number: segment,
            client_info: String::new(),
            indexed_text: String::new(),
            field_boundaries: Vec::new(),
            deleted: false,
            json_index: 0,
        }
    }

    #[test]
    fn internal_ids_are_dense_and_assigned_in_insertion_order() {
        let mut dc = DocumentCollection::new();
        let a = dc.add_document(doc(1, 0));
        let b = dc.add_document(doc(2, 0));
        assert_eq!((a, b), (0, 1));
        assert_eq!(dc.count(), 2);
    }

    #[test]
    fn segments_sharing_a_key_form_a_contiguous_range() {
        let mut dc = DocumentCollection::new();
        dc.add_document(doc(5, 0));
        dc.add_document(doc(5, 1));
        dc.add_document(doc(5, 2));
        let ids: Vec<i32> = dc.get_documents_by_key(5).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(dc.get_document_by_key(5).unwrap().segment_number, 0);
    }
}
