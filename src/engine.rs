//! `Engine`: the public API surface, tying components A-J together
//! behind a single-writer/many-reader lock.
//!
//! Grounded on the teacher's `lib.rs` re-export-aggregator role and
//! `build::run_build`'s top-level orchestration, generalized into a
//! stateful handle instead of a one-shot CLI build pass, since this
//! engine is a long-lived in-process object rather than a batch tool.
//! The `parking_lot::RwLock` is the same crate the teacher already pulls
//! in under its own `parallel` feature for incremental loading — carried
//! here unconditionally since the single-writer/many-reader discipline
//! is core to this engine, not an optional acceleration.

use crate::config::{CoverageSetup, EngineConfig};
use crate::error::{InfidexError, Result};
use crate::persistence;
use crate::pipeline::SearchPipeline;
use crate::progress::{CancellationToken, ProgressObserver};
use crate::types::{Document, ScoreEntry, StoredDocument};
use crate::vector_model::VectorModel;
use crate::word_matcher::WordMatcher;
use parking_lot::RwLock;
use std::path::Path;

/// A query, as accepted by `Engine::search`.
///
/// `coverage_depth` is the plain per-query override for how many Stage 1
/// candidates get Stage 2 rescoring; `coverage_setup`, when `Some`,
/// overrides the full set of Stage 2 knobs for this query alone and takes
/// precedence over `coverage_depth` (spec.md §4.K).
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub max_results: usize,
    pub enable_coverage: bool,
    pub coverage_depth: usize,
    pub coverage_setup: Option<CoverageSetup>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            max_results: 20,
            enable_coverage: true,
            coverage_depth: CoverageSetup::default().coverage_depth,
            coverage_setup: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineStatistics {
    pub document_count: usize,
    pub live_document_count: usize,
    pub term_count: usize,
    pub is_indexed: bool,
}

struct EngineInner {
    vector_model: VectorModel,
    word_matcher: WordMatcher,
    config: EngineConfig,
}

/// The embedded search engine. Cheap to clone a handle to (internally an
/// `Arc`-free `RwLock` — callers share one `Engine` across threads by
/// reference or by wrapping it in their own `Arc`, mirroring how the
/// teacher's CLI shares one built index across parallel query benches).
pub struct Engine {
    inner: RwLock<EngineInner>,
}

impl Engine {
    /// Validates `config` (rejecting unsupported values at construction
    /// time, spec.md §7 `InvalidArgument`) and returns a fresh, empty
    /// engine.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let vector_model = VectorModel::new(&config);
        let word_matcher = WordMatcher::new(config.word_matcher_setup);
        Ok(Self {
            inner: RwLock::new(EngineInner { vector_model, word_matcher, config }),
        })
    }

    /// Indexes one document. Takes the writer lock; clears the "built"
    /// flag so a subsequent `search` sees stale (pre-index) results
    /// until `calculate_weights` runs again.
    pub fn index_document(&self, doc: Document) -> Result<i32> {
        let mut inner = self.inner.write();
        let id = inner.vector_model.index_document(
            doc.key,
            doc.segment_number,
            doc.fields.clone(),
            doc.client_info.clone(),
            doc.json_index,
        );
        for field in doc.fields.iter().filter(|f| f.indexable) {
            for word in inner.vector_model.tokenizer().words(&field.value) {
                inner.word_matcher.index_word(&word, id);
            }
        }
        Ok(id)
    }

    /// Indexes many documents, reporting `[0, 50]` ingest progress to
    /// `progress` if supplied. Under the `parallel` feature, tokenization
    /// (the embarrassingly-parallel half of indexing, per
    /// `VectorModel::prepare_document`) runs across threads via `rayon`
    /// before the sequential apply pass; document order — and therefore
    /// dense internal id assignment — is unaffected either way.
    pub fn index_documents(
        &self,
        docs: impl IntoIterator<Item = Document>,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<()> {
        let docs: Vec<Document> = docs.into_iter().collect();
        let total = docs.len().max(1);

        #[cfg(feature = "parallel")]
        let prepared: Vec<_> = {
            use rayon::prelude::*;
            let inner = self.inner.read();
            docs.into_par_iter()
                .map(|doc| inner.vector_model.prepare_document(doc.key, doc.segment_number, doc.fields, doc.client_info, doc.json_index))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let prepared: Vec<_> = {
            let inner = self.inner.read();
            docs.into_iter()
                .map(|doc| inner.vector_model.prepare_document(doc.key, doc.segment_number, doc.fields, doc.client_info, doc.json_index))
                .collect()
        };

        let mut inner = self.inner.write();
        for (i, p) in prepared.into_iter().enumerate() {
            let words = p.words.clone();
            let id = inner.vector_model.apply_prepared(p);
            for word in &words {
                inner.word_matcher.index_word(word, id);
            }
            if let Some(progress) = progress {
                let percent = ((i + 1) * 50 / total).min(50) as u8;
                progress.on_progress(percent);
            }
        }
        Ok(())
    }

    /// Forces `build_inverted_lists` (spec.md §4.E). Takes the writer
    /// lock for the duration of the build — readers are drained first
    /// and see either the pre-build or post-build snapshot, never a
    /// half-built index.
    pub fn calculate_weights(&self) -> Result<()> {
        self.calculate_weights_with(&CancellationToken::new(), None)
    }

    pub fn calculate_weights_with(
        &self,
        cancel: &CancellationToken,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<()> {
        let mut inner = self.inner.write();
        let poll_interval = inner.config.cancellation_poll_interval;
        if let Some(p) = progress {
            p.on_progress(50);
        }
        let result = inner.vector_model.build_inverted_lists(cancel, poll_interval);
        if let Some(p) = progress {
            p.on_progress(100);
        }
        result.map_err(|()| InfidexError::Cancelled)
    }

    /// Runs the full search pipeline (Stage 1 -> Stage 2 -> fusion ->
    /// top-K). A query whose terms are all absent or stop-terms returns
    /// `Ok(vec![])`, never an error (spec.md §7 `EmptyResult`).
    pub fn search(&self, query: SearchQuery) -> Result<Vec<ScoreEntry>> {
        let inner = self.inner.read();
        if !inner.vector_model.is_built() {
            return Ok(Vec::new());
        }
        let pipeline = SearchPipeline::new(&inner.vector_model, &inner.word_matcher);
        let coverage_setup = query
            .coverage_setup
            .unwrap_or(CoverageSetup { coverage_depth: query.coverage_depth });
        Ok(pipeline.search(&query.text, query.max_results, query.enable_coverage, coverage_setup))
    }

    pub fn get_document(&self, key: i64) -> Option<StoredDocument> {
        self.inner.read().vector_model.documents.get_document_by_key(key).cloned()
    }

    pub fn get_documents(&self, key: i64) -> Vec<StoredDocument> {
        self.inner
            .read()
            .vector_model
            .documents
            .get_documents_by_key(key)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn get_statistics(&self) -> EngineStatistics {
        let inner = self.inner.read();
        EngineStatistics {
            document_count: inner.vector_model.documents.count(),
            live_document_count: inner.vector_model.documents.live_count(),
            term_count: inner.vector_model.terms.len(),
            is_indexed: inner.vector_model.is_built(),
        }
    }

    /// Serializes the engine to `path` in the `INFIDEX_V1` format
    /// (spec.md §6).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let inner = self.inner.read();
        persistence::save(path.as_ref(), &inner.vector_model, &inner.word_matcher)
    }

    /// Deserializes an engine previously written by `save`. A magic/
    /// version mismatch returns `InvalidFormat` without touching any
    /// existing state — there is none, since this always returns a
    /// fresh `Engine`.
    pub fn load(path: impl AsRef<Path>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let (vector_model, word_matcher) = persistence::load(path.as_ref(), &config)?;
        Ok(Self { inner: RwLock::new(EngineInner { vector_model, word_matcher, config }) })
    }
}
