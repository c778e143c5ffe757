//! `INFIDEX_V1` binary persistence: header, varint-framed sections, CRC32
//! footer.
//!
//! Grounded on the teacher's `binary/header.rs` (fixed-size header +
//! magic-tagged footer, single source of truth for section layout) and
//! `binary/encoding.rs` (LEB128 varints for length prefixes), generalized
//! from the teacher's read-only search-index format (vocabulary, suffix
//! array, postings, WASM blob) to a format that round-trips the full
//! writable engine state: documents, term postings, and raw per-document
//! weights still awaiting a build, plus the `WordMatcher` dictionaries.
//! The front-compression and separated-stream tricks in the teacher's
//! vocabulary/suffix-array encoders are dropped — those earn their keep
//! against a multi-megabyte static vocabulary, not this crate's
//! comparatively small in-process dictionaries.

use crate::config::EngineConfig;
use crate::document::DocumentCollection;
use crate::error::{InfidexError, Result};
use crate::term::{Posting, Term, TermCollection};
use crate::types::{FieldBoundary, StoredDocument};
use crate::vector_model::VectorModel;
use crate::word_matcher::WordMatcher;
use crc32fast::Hasher as Crc32Hasher;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

const MAGIC: [u8; 4] = *b"INFX";
const FOOTER_MAGIC: [u8; 4] = *b"XFNI";
const VERSION: u8 = 1;
const MAX_VARINT_BYTES: usize = 10;

fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
}

fn decode_varint(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0u32;
    let mut i = 0;
    while i < bytes.len() && i < MAX_VARINT_BYTES {
        let byte = bytes[i];
        result |= ((byte & 0x7F) as u64) << shift;
        i += 1;
        if byte & 0x80 == 0 {
            return Ok((result, i));
        }
        shift += 7;
    }
    Err(InfidexError::InvalidFormat("truncated or overlong varint".into()))
}

fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

fn zigzag_decode(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

fn encode_string(s: &str, buf: &mut Vec<u8>) {
    let bytes = s.as_bytes();
    encode_varint(bytes.len() as u64, buf);
    buf.extend_from_slice(bytes);
}

fn decode_string(bytes: &[u8]) -> Result<(String, usize)> {
    let (len, consumed) = decode_varint(bytes)?;
    let len = len as usize;
    let end = consumed.checked_add(len).ok_or_else(|| InfidexError::InvalidFormat("string length overflow".into()))?;
    if end > bytes.len() {
        return Err(InfidexError::InvalidFormat("truncated string".into()));
    }
    let s = String::from_utf8(bytes[consumed..end].to_vec())
        .map_err(|e| InfidexError::InvalidFormat(format!("invalid utf8: {e}")))?;
    Ok((s, end))
}

fn encode_id_set(ids: &HashSet<i32>, buf: &mut Vec<u8>) {
    encode_varint(ids.len() as u64, buf);
    let mut sorted: Vec<i32> = ids.iter().copied().collect();
    sorted.sort_unstable();
    for id in sorted {
        encode_varint(zigzag_encode(id as i64), buf);
    }
}

fn decode_id_set(bytes: &[u8]) -> Result<(HashSet<i32>, usize)> {
    let (count, mut pos) = decode_varint(bytes)?;
    let mut set = HashSet::with_capacity(count as usize);
    for _ in 0..count {
        let (v, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;
        set.insert(zigzag_decode(v) as i32);
    }
    Ok((set, pos))
}

fn encode_dictionary(map: &HashMap<String, HashSet<i32>>, buf: &mut Vec<u8>) {
    encode_varint(map.len() as u64, buf);
    let mut entries: Vec<(&String, &HashSet<i32>)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (word, ids) in entries {
        encode_string(word, buf);
        encode_id_set(ids, buf);
    }
}

fn decode_dictionary(bytes: &[u8]) -> Result<(HashMap<String, HashSet<i32>>, usize)> {
    let (count, mut pos) = decode_varint(bytes)?;
    let mut map = HashMap::with_capacity(count as usize);
    for _ in 0..count {
        let (word, consumed) = decode_string(&bytes[pos..])?;
        pos += consumed;
        let (ids, consumed) = decode_id_set(&bytes[pos..])?;
        pos += consumed;
        map.insert(word, ids);
    }
    Ok((map, pos))
}

fn encode_field_boundary(b: FieldBoundary, buf: &mut Vec<u8>) {
    encode_varint(b.position as u64, buf);
    buf.push(b.weight_index);
}

fn decode_field_boundary(bytes: &[u8]) -> Result<(FieldBoundary, usize)> {
    let (position, mut pos) = decode_varint(bytes)?;
    if position > u16::MAX as u64 {
        return Err(InfidexError::InvalidFormat("field boundary position out of range".into()));
    }
    if pos >= bytes.len() {
        return Err(InfidexError::InvalidFormat("truncated field boundary".into()));
    }
    let weight_index = bytes[pos];
    pos += 1;
    Ok((FieldBoundary { position: position as u16, weight_index }, pos))
}

fn encode_document(doc: &StoredDocument, buf: &mut Vec<u8>) {
    encode_varint(zigzag_encode(doc.key), buf);
    encode_varint(zigzag_encode(doc.segment_number as i64), buf);
    encode_string(&doc.client_info, buf);
    encode_string(&doc.indexed_text, buf);
    encode_varint(doc.field_boundaries.len() as u64, buf);
    for b in &doc.field_boundaries {
        encode_field_boundary(*b, buf);
    }
    buf.push(doc.deleted as u8);
    encode_varint(zigzag_encode(doc.json_index as i64), buf);
}

fn decode_document(id: i32, bytes: &[u8]) -> Result<(StoredDocument, usize)> {
    let (key, mut pos) = decode_varint(bytes)?;
    let key = zigzag_decode(key);
    let (segment_number, consumed) = decode_varint(&bytes[pos..])?;
    pos += consumed;
    let segment_number = zigzag_decode(segment_number) as i32;
    let (client_info, consumed) = decode_string(&bytes[pos..])?;
    pos += consumed;
    let (indexed_text, consumed) = decode_string(&bytes[pos..])?;
    pos += consumed;
    let (boundary_count, consumed) = decode_varint(&bytes[pos..])?;
    pos += consumed;
    let mut field_boundaries = Vec::with_capacity(boundary_count as usize);
    for _ in 0..boundary_count {
        let (b, consumed) = decode_field_boundary(&bytes[pos..])?;
        pos += consumed;
        field_boundaries.push(b);
    }
    if pos >= bytes.len() {
        return Err(InfidexError::InvalidFormat("truncated document record".into()));
    }
    let deleted = bytes[pos] != 0;
    pos += 1;
    let (json_index, consumed) = decode_varint(&bytes[pos..])?;
    pos += consumed;
    let json_index = zigzag_decode(json_index) as i32;
    Ok((
        StoredDocument { id, key, segment_number, client_info, indexed_text, field_boundaries, deleted, json_index },
        pos,
    ))
}

fn encode_term(text: &str, term: &Term, buf: &mut Vec<u8>) {
    encode_string(text, buf);
    encode_varint(zigzag_encode(term.document_frequency as i64), buf);
    encode_varint(term.postings.len() as u64, buf);
    for p in &term.postings {
        encode_varint(zigzag_encode(p.doc_internal_id as i64), buf);
        buf.push(p.weight);
    }
    encode_varint(term.raw_weights.len() as u64, buf);
    for (doc_id, weight) in &term.raw_weights {
        encode_varint(zigzag_encode(*doc_id as i64), buf);
        buf.extend_from_slice(&weight.to_le_bytes());
    }
}

fn decode_term(bytes: &[u8]) -> Result<((String, Term), usize)> {
    let (text, mut pos) = decode_string(bytes)?;
    let (df, consumed) = decode_varint(&bytes[pos..])?;
    pos += consumed;
    let document_frequency = zigzag_decode(df) as i32;
    let (posting_count, consumed) = decode_varint(&bytes[pos..])?;
    pos += consumed;
    let mut postings = Vec::with_capacity(posting_count as usize);
    for _ in 0..posting_count {
        let (id, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;
        if pos >= bytes.len() {
            return Err(InfidexError::InvalidFormat("truncated posting".into()));
        }
        let weight = bytes[pos];
        pos += 1;
        postings.push(Posting { doc_internal_id: zigzag_decode(id) as i32, weight });
    }
    let (raw_count, consumed) = decode_varint(&bytes[pos..])?;
    pos += consumed;
    let mut raw_weights = Vec::with_capacity(raw_count as usize);
    for _ in 0..raw_count {
        let (id, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;
        if pos + 4 > bytes.len() {
            return Err(InfidexError::InvalidFormat("truncated raw weight".into()));
        }
        let weight = f32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
        pos += 4;
        raw_weights.push((zigzag_decode(id) as i32, weight));
    }
    Ok(((text, Term { document_frequency, postings, raw_weights }), pos))
}

/// Serializes `vector_model` and `word_matcher` to `path`.
pub fn save(path: &Path, vector_model: &VectorModel, word_matcher: &WordMatcher) -> Result<()> {
    let mut body = Vec::new();
    body.push(vector_model.is_built() as u8);

    let docs: Vec<&StoredDocument> = vector_model.documents.iter().collect();
    encode_varint(docs.len() as u64, &mut body);
    for doc in &docs {
        encode_document(doc, &mut body);
    }

    let terms: Vec<(&str, &Term)> = vector_model.terms.all_terms().collect();
    encode_varint(terms.len() as u64, &mut body);
    for (text, term) in terms {
        encode_term(text, term, &mut body);
    }

    encode_dictionary(word_matcher.exact_map(), &mut body);
    encode_dictionary(word_matcher.ld1_map(), &mut body);
    encode_dictionary(word_matcher.affix_map(), &mut body);

    let mut file = Vec::with_capacity(body.len() + 16);
    file.extend_from_slice(&MAGIC);
    file.push(VERSION);
    file.extend_from_slice(&body);

    let mut hasher = Crc32Hasher::new();
    hasher.update(&file);
    let crc32 = hasher.finalize();
    file.extend_from_slice(&crc32.to_le_bytes());
    file.extend_from_slice(&FOOTER_MAGIC);

    fs::write(path, file).map_err(|e| InfidexError::OutOfMemory(format!("failed to write index: {e}")))
}

/// Deserializes an engine written by `save`, rebuilding `VectorModel` and
/// `WordMatcher` under `config`. Rejects anything whose magic, version,
/// or CRC32 footer doesn't match — the file is either untouched by this
/// crate or corrupted, and either way isn't safe to trust.
pub fn load(path: &Path, config: &EngineConfig) -> Result<(VectorModel, WordMatcher)> {
    let bytes = fs::read(path).map_err(|e| InfidexError::InvalidFormat(format!("cannot read index file: {e}")))?;
    if bytes.len() < 4 + 1 + 4 + 4 {
        return Err(InfidexError::InvalidFormat("file too short".into()));
    }
    if bytes[0..4] != MAGIC {
        return Err(InfidexError::InvalidFormat("bad magic".into()));
    }
    let footer_start = bytes.len() - 8;
    if bytes[footer_start + 4..] != FOOTER_MAGIC {
        return Err(InfidexError::InvalidFormat("bad footer magic".into()));
    }
    let stored_crc32 = u32::from_le_bytes(bytes[footer_start..footer_start + 4].try_into().unwrap());
    let mut hasher = Crc32Hasher::new();
    hasher.update(&bytes[..footer_start]);
    if hasher.finalize() != stored_crc32 {
        return Err(InfidexError::InvalidFormat("CRC32 mismatch".into()));
    }

    let version = bytes[4];
    if version != VERSION {
        return Err(InfidexError::InvalidFormat(format!("unsupported version {version}")));
    }

    let body = &bytes[5..footer_start];
    if body.is_empty() {
        return Err(InfidexError::InvalidFormat("truncated body".into()));
    }
    let built = body[0] != 0;
    let mut pos = 1;

    let (doc_count, consumed) = decode_varint(&body[pos..])?;
    pos += consumed;
    let mut docs = Vec::with_capacity(doc_count as usize);
    for id in 0..doc_count as i32 {
        let (doc, consumed) = decode_document(id, &body[pos..])?;
        pos += consumed;
        docs.push(doc);
    }

    let (term_count, consumed) = decode_varint(&body[pos..])?;
    pos += consumed;
    let mut entries = Vec::with_capacity(term_count as usize);
    for _ in 0..term_count {
        let (entry, consumed) = decode_term(&body[pos..])?;
        pos += consumed;
        entries.push(entry);
    }

    let (exact, consumed) = decode_dictionary(&body[pos..])?;
    pos += consumed;
    let (ld1, consumed) = decode_dictionary(&body[pos..])?;
    pos += consumed;
    let (affix, _consumed) = decode_dictionary(&body[pos..])?;

    let documents = DocumentCollection::from_docs(docs);
    let terms = TermCollection::from_entries(entries);
    let vector_model = VectorModel::from_parts(config, terms, documents, built);
    let word_matcher = WordMatcher::from_parts(config.word_matcher_setup, exact, ld1, affix);
    Ok((vector_model, word_matcher))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CancellationToken;
    use crate::types::{Field, Weight};
    use tempfile::tempdir;

    fn sample_engine() -> (VectorModel, WordMatcher) {
        let cfg = EngineConfig::default();
        let mut vm = VectorModel::new(&cfg);
        let mut wm = WordMatcher::new(cfg.word_matcher_setup);
        for (key, text) in [(1i64, "the quick brown fox"), (2, "a lazy dog sleeps")] {
            let id = vm.index_document(key, 0, vec![Field::new("body", text, Weight::High)], String::new(), 0);
            for w in vm.tokenizer().words(text) {
                wm.index_word(&w, id);
            }
        }
        vm.build_inverted_lists(&CancellationToken::new(), 10).unwrap();
        (vm, wm)
    }

    #[test]
    fn round_trip_preserves_term_and_document_state() {
        let (vm, wm) = sample_engine();
        let dir = tempdir().unwrap();
        let path = dir.path().join("idx.infidex");
        save(&path, &vm, &wm).unwrap();

        let cfg = EngineConfig::default();
        let (loaded_vm, loaded_wm) = load(&path, &cfg).unwrap();
        assert_eq!(loaded_vm.documents.count(), vm.documents.count());
        assert_eq!(loaded_vm.terms.len(), vm.terms.len());
        assert!(loaded_vm.is_built());
        assert!(loaded_wm.exact_map().contains_key("quick"));
    }

    #[test]
    fn round_trip_preserves_json_index() {
        let cfg = EngineConfig::default();
        let mut vm = VectorModel::new(&cfg);
        let wm = WordMatcher::new(cfg.word_matcher_setup);
        vm.index_document(1, 0, vec![Field::new("body", "negative offsets too", Weight::High)], String::new(), -7);
        vm.index_document(2, 0, vec![Field::new("body", "positive offset", Weight::High)], String::new(), 42);
        vm.build_inverted_lists(&CancellationToken::new(), 10).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("idx.infidex");
        save(&path, &vm, &wm).unwrap();
        let (loaded_vm, _) = load(&path, &cfg).unwrap();

        assert_eq!(loaded_vm.documents.get_document_by_key(1).unwrap().json_index, -7);
        assert_eq!(loaded_vm.documents.get_document_by_key(2).unwrap().json_index, 42);
    }

    #[test]
    fn search_scores_match_after_round_trip() {
        let (vm, wm) = sample_engine();
        let dir = tempdir().unwrap();
        let path = dir.path().join("idx.infidex");
        save(&path, &vm, &wm).unwrap();
        let cfg = EngineConfig::default();
        let (loaded_vm, _) = load(&path, &cfg).unwrap();
        assert_eq!(vm.search("quick fox"), loaded_vm.search("quick fox"));
        let _ = wm;
    }

    #[test]
    fn corrupted_magic_is_rejected() {
        let (vm, wm) = sample_engine();
        let dir = tempdir().unwrap();
        let path = dir.path().join("idx.infidex");
        save(&path, &vm, &wm).unwrap();
        let mut bytes = fs::read(&path).unwrap();
        bytes[0] = b'X';
        fs::write(&path, bytes).unwrap();
        let cfg = EngineConfig::default();
        assert!(matches!(load(&path, &cfg), Err(InfidexError::InvalidFormat(_))));
    }

    #[test]
    fn flipped_byte_fails_crc_check() {
        let (vm, wm) = sample_engine();
        let dir = tempdir().unwrap();
        let path = dir.path().join("idx.infidex");
        save(&path, &vm, &wm).unwrap();
        let mut bytes = fs::read(&path).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;
        fs::write(&path, bytes).unwrap();
        let cfg = EngineConfig::default();
        assert!(matches!(load(&path, &cfg), Err(InfidexError::InvalidFormat(_))));
    }
}
