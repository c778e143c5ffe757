//! Core data model: documents, fields, field boundaries, and shingles.
//!
//! Grounded on the teacher's `types.rs` newtype-and-invariant style
//! (`DocId`, `FieldBoundary`, `Section`) — bounds-checked constructors,
//! doc-comment "Invariants" sections — generalized from the teacher's
//! fixed Title/Heading/Content hierarchy to the spec's three-class
//! `Weight` scheme.

/// A field's contribution class. Maps to a float multiplier via
/// `EngineConfig::field_weights`, indexed by `Weight as usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weight {
    High = 0,
    Med = 1,
    Low = 2,
}

impl Weight {
    pub fn multiplier(self, field_weights: &[f32; 3]) -> f32 {
        field_weights[self as usize]
    }
}

/// One named field of a `Document`.
///
/// Only `indexable` fields feed the tokenizer; non-indexable fields are
/// carried as opaque metadata the caller can still read back via
/// `get_document`.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub weight: Weight,
    pub indexable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>, weight: Weight) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            weight,
            indexable: true,
        }
    }

    pub fn metadata(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            weight: Weight::Low,
            indexable: false,
        }
    }
}

/// A document as handed to the engine by a caller.
///
/// `key` is caller-chosen and may repeat across several `Document`
/// values that are successive segments of one logical document — only
/// `segment_number == 0` receives start-padding during tokenization.
#[derive(Debug, Clone)]
pub struct Document {
    pub key: i64,
    pub segment_number: i32,
    pub fields: Vec<Field>,
    pub client_info: String,
    /// Opaque caller-supplied reference (e.g. an offset into an external
    /// JSON payload store) carried through to `StoredDocument` and the
    /// persisted record, but never interpreted by this crate.
    pub json_index: i32,
}

impl Document {
    pub fn new(key: i64, fields: Vec<Field>) -> Self {
        Self {
            key,
            segment_number: 0,
            fields,
            client_info: String::new(),
            json_index: 0,
        }
    }

    pub fn with_segment(mut self, segment_number: i32) -> Self {
        self.segment_number = segment_number;
        self
    }

    pub fn with_client_info(mut self, client_info: impl Into<String>) -> Self {
        self.client_info = client_info.into();
        self
    }

    pub fn with_json_index(mut self, json_index: i32) -> Self {
        self.json_index = json_index;
        self
    }
}

/// A document after it has been assigned a dense internal id.
///
/// # Invariants
/// - `id` is unique and dense in `[0, DocumentCollection::count())`.
/// - For any `key`, the internal ids sharing it form a contiguous range
///   whose lowest member has `segment_number == 0`.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: i32,
    pub key: i64,
    pub segment_number: i32,
    pub client_info: String,
    /// Concatenation of all indexable field values, joined by
    /// `SECTION_SEPARATOR`.
    pub indexed_text: String,
    /// Boundaries recording which weight class applies at each
    /// start-of-field offset within `indexed_text`.
    pub field_boundaries: Vec<FieldBoundary>,
    pub deleted: bool,
    /// Opaque caller-supplied reference, carried through from `Document`
    /// and round-tripped by `persistence` (spec.md §6). Never interpreted
    /// here.
    pub json_index: i32,
}

/// The character used to join indexable field values inside
/// `indexed_text`. Chosen from the Unicode Private Use Area so it never
/// collides with real document content.
pub const SECTION_SEPARATOR: char = '\u{E000}';

/// Records, at one start-of-field offset in `indexed_text`, which
/// weight class applies from that point forward.
///
/// # Invariants
/// - Positions are strictly increasing within one document's boundary
///   list.
/// - The first entry is always at position 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBoundary {
    pub position: u16,
    pub weight_index: u8,
}

impl FieldBoundary {
    pub fn weight(self) -> Weight {
        match self.weight_index {
            0 => Weight::High,
            1 => Weight::Med,
            _ => Weight::Low,
        }
    }
}

/// Looks up the weight class active at `position` (a char offset into
/// `indexed_text`) in a sorted boundary list. Binary search by
/// `partition_point`, mirroring the teacher's
/// `get_field_type_from_boundaries`.
pub fn weight_at(boundaries: &[FieldBoundary], position: usize) -> Weight {
    if boundaries.is_empty() {
        return Weight::Low;
    }
    let idx = boundaries.partition_point(|b| (b.position as usize) <= position);
    let idx = idx.saturating_sub(1);
    boundaries[idx].weight()
}

/// One n-gram or word occurrence produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shingle {
    pub text: String,
    pub occurrences: u16,
    pub position: i32,
}

/// A scored candidate, as returned to callers and passed between
/// pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEntry {
    pub score: u8,
    pub document_key: i64,
}
