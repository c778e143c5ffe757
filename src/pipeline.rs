//! `SearchPipeline`: Stage 1 -> Stage 2 -> fusion -> top-K.
//!
//! Grounded on the teacher's `search::search_unified` mode-dispatch
//! orchestration and `scoring::ranking::compare_results`'s bucketed
//! ranking philosophy, generalized from "dispatch by index mode" to
//! "dispatch by pipeline stage" since this engine always runs the same
//! two stages rather than choosing among suffix-array/inverted-index
//! strategies.

use crate::config::CoverageSetup;
use crate::coverage::CoverageEngine;
use crate::quantize::bucket_top_k;
use crate::types::ScoreEntry;
use crate::vector_model::VectorModel;
use crate::word_matcher::WordMatcher;

pub struct SearchPipeline<'a> {
    vector_model: &'a VectorModel,
    word_matcher: &'a WordMatcher,
}

impl<'a> SearchPipeline<'a> {
    pub fn new(vector_model: &'a VectorModel, word_matcher: &'a WordMatcher) -> Self {
        Self { vector_model, word_matcher }
    }

    /// Runs the full pipeline for `query_text`, returning up to
    /// `max_results` `ScoreEntry`s. `coverage_setup.coverage_depth` bounds
    /// how many Stage 1 candidates receive Stage 2 rescoring, and is the
    /// per-query override seam for Stage 2 knobs (spec.md §4.K);
    /// `enable_coverage = false` skips Stage 2 and returns Stage 1 scores
    /// directly.
    pub fn search(
        &self,
        query_text: &str,
        max_results: usize,
        enable_coverage: bool,
        coverage_setup: CoverageSetup,
    ) -> Vec<ScoreEntry> {
        let stage1 = self.vector_model.search(query_text);
        if stage1.is_empty() {
            return Vec::new();
        }

        if !enable_coverage {
            let top = bucket_top_k(&stage1, max_results, |id| id as u64);
            return self.vector_model.score_entries(
                &top.into_iter().map(|(id, score)| (id, score)).collect::<Vec<_>>(),
            );
        }

        let candidates = bucket_top_k(&stage1, coverage_setup.coverage_depth, |id| id as u64);

        let tokenizer = self.vector_model.tokenizer();
        let coverage_engine = CoverageEngine::new(tokenizer, self.word_matcher);

        let mut fused: Vec<(i32, u8)> = Vec::with_capacity(candidates.len());
        for (internal_id, stage1_byte) in candidates {
            let Some(doc) = self.vector_model.documents.get_document(internal_id) else { continue };
            if doc.deleted {
                continue;
            }
            let stage2 = coverage_engine.score(query_text, &doc.indexed_text, internal_id);
            let final_score = stage1_byte.max(stage2.score);
            debug_assert!(final_score >= stage1_byte && final_score >= stage2.score);
            fused.push((internal_id, final_score));
        }

        let top = bucket_top_k(&fused, max_results, |id| id as u64);
        self.vector_model.score_entries(&top.into_iter().map(|(id, s)| (id, s)).collect::<Vec<_>>())
    }
}
