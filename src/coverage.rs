//! `CoverageEngine` — Stage 2: five-algorithm lexical rescoring.
//!
//! The five algorithms are distinguished by priority within one loop, not
//! polymorphic dispatch, per spec.md §9 ("the set is closed and the hot
//! loop benefits") — mirroring the teacher's own `MatchType`/bucketed
//! `compare_results` style of keeping a fixed, closed set of match kinds
//! as a plain enum rather than a trait-object hierarchy.

use crate::bitparallel::{packed_lcs, scalar_lcs, within_distance};
use crate::quantize::f2b;
use crate::tokenizer::Tokenizer;
use crate::word_matcher::WordMatcher;

/// Which of the five algorithms produced a query word's hit. Closed set,
/// priority order 1 -> 5; a word is credited to the first algorithm that
/// hits, never more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAlgorithm {
    Exact,
    Fuzzy,
    JoinedOrSplit,
    Affix,
    Lcs,
}

#[derive(Debug, Clone, Copy)]
pub struct CoverageResult {
    pub score: u8,
    pub word_hits: u32,
}

pub struct CoverageEngine<'a> {
    tokenizer: &'a Tokenizer,
    word_matcher: &'a WordMatcher,
}

impl<'a> CoverageEngine<'a> {
    pub fn new(tokenizer: &'a Tokenizer, word_matcher: &'a WordMatcher) -> Self {
        Self { tokenizer, word_matcher }
    }

    /// Scores candidate document `doc_id` (whose text is `indexed_text`)
    /// against query `query_text`. Returns score 0, word_hits 0 for an
    /// empty query.
    pub fn score(&self, query_text: &str, indexed_text: &str, doc_id: i32) -> CoverageResult {
        let query_words = self.tokenizer.words(query_text);
        let total_chars: usize = query_words.iter().map(|w| w.chars().count()).sum();
        if query_words.is_empty() || total_chars == 0 {
            return CoverageResult { score: 0, word_hits: 0 };
        }

        let doc_words = self.tokenizer.words(indexed_text);
        let doc_word_set: std::collections::HashSet<&str> =
            doc_words.iter().map(String::as_str).collect();
        let doc_joined: String = doc_words.concat();

        let mut matched_chars: usize = 0;
        let mut word_hits: u32 = 0;
        let mut order_bonus: u32 = 0;
        let mut last_matched_pos: Option<usize> = None;

        for (j, q) in query_words.iter().enumerate() {
            let qlen = q.chars().count();
            let mut hit: Option<(MatchAlgorithm, usize)> = None;

            // 1. Exact word.
            if doc_word_set.contains(q.as_str()) {
                hit = Some((MatchAlgorithm::Exact, qlen));
                if let Some(pos) = doc_words.iter().position(|w| w == q) {
                    let non_decreasing = match last_matched_pos {
                        Some(p) => pos >= p,
                        None => true,
                    };
                    if non_decreasing {
                        order_bonus = order_bonus.saturating_add(1);
                    }
                    last_matched_pos = Some(pos);
                }
            }

            // 2. Fuzzy (LD <= 1) via WordMatcher.
            if hit.is_none() && self.word_matcher.lookup_exact_or_ld1(q).contains(&doc_id) {
                hit = Some((MatchAlgorithm::Fuzzy, qlen.saturating_sub(1)));
            }

            // 3. Joined/split.
            if hit.is_none() {
                if let Some(next) = query_words.get(j + 1) {
                    let joined = format!("{q}{next}");
                    if doc_joined.contains(&joined) {
                        hit = Some((MatchAlgorithm::JoinedOrSplit, qlen));
                    }
                }
            }
            if hit.is_none() && qlen >= 2 {
                let chars: Vec<char> = q.chars().collect();
                for split_at in 1..chars.len() {
                    let (a, b): (String, String) = (
                        chars[..split_at].iter().collect(),
                        chars[split_at..].iter().collect(),
                    );
                    if doc_word_set.contains(a.as_str()) && doc_word_set.contains(b.as_str()) {
                        hit = Some((MatchAlgorithm::JoinedOrSplit, qlen));
                        break;
                    }
                }
            }

            // 4. Prefix/suffix via affix index.
            if hit.is_none() {
                if let Some((matched_len, docs)) = self.word_matcher.lookup_affix(q) {
                    if docs.contains(&doc_id) {
                        hit = Some((MatchAlgorithm::Affix, qlen.min(matched_len)));
                    }
                }
            }

            // 5. LCS fallback against every candidate word, take the max.
            if hit.is_none() && !doc_words.is_empty() {
                let q_chars: Vec<char> = q.chars().collect();
                let best = doc_words
                    .iter()
                    .map(|w| {
                        let w_chars: Vec<char> = w.chars().collect();
                        if q_chars.len() + w_chars.len() <= 60 {
                            packed_lcs(&[&q_chars], &w_chars)
                                .map(|v| v[0])
                                .unwrap_or_else(|| scalar_lcs(&q_chars, &w_chars))
                        } else {
                            scalar_lcs(&q_chars, &w_chars)
                        }
                    })
                    .max()
                    .unwrap_or(0);
                if best > 0 {
                    hit = Some((MatchAlgorithm::Lcs, best as usize));
                }
            }

            if let Some((_, contributed)) = hit {
                matched_chars = (matched_chars + contributed).min(total_chars);
                word_hits += 1;
            }
        }

        let ratio = matched_chars as f32 / total_chars as f32;
        let base = f2b(ratio) as u32;
        let score = base.saturating_add(order_bonus).min(255) as u8;
        CoverageResult { score, word_hits }
    }

    /// Oracle helper exposed for testing: true iff `a` and `b` are within
    /// edit distance 1 via the bit-parallel/scalar fallback, independent
    /// of the WordMatcher's symmetric-delete index. Useful when a query
    /// word falls outside the WordMatcher's LD1 size window.
    pub fn fuzzy_within_one(a: &str, b: &str) -> bool {
        let (a, b): (Vec<char>, Vec<char>) = (a.chars().collect(), b.chars().collect());
        within_distance(&a, &b, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WordMatcherSetup;

    fn engine<'a>(tok: &'a Tokenizer, wm: &'a WordMatcher) -> CoverageEngine<'a> {
        CoverageEngine::new(tok, wm)
    }

    #[test]
    fn empty_query_scores_zero() {
        let tok = Tokenizer::default();
        let wm = WordMatcher::new(WordMatcherSetup::default());
        let e = engine(&tok, &wm);
        let r = e.score("", "the quick brown fox", 0);
        assert_eq!((r.score, r.word_hits), (0, 0));
    }

    #[test]
    fn exact_match_saturates_near_max() {
        let tok = Tokenizer::default();
        let wm = WordMatcher::new(WordMatcherSetup::default());
        let e = engine(&tok, &wm);
        let r = e.score("the quick brown fox", "the quick brown fox", 0);
        assert!(r.score >= 250, "score was {}", r.score);
        assert_eq!(r.word_hits, 4);
    }

    #[test]
    fn fuzzy_rescues_typo() {
        let tok = Tokenizer::default();
        let mut wm = WordMatcher::new(WordMatcherSetup::default());
        for w in tok.words("the quick brown fox") {
            wm.index_word(&w, 0);
        }
        let e = engine(&tok, &wm);
        let r = e.score("qick fux", "the quick brown fox", 0);
        assert!(r.score > 100, "score was {}", r.score);
    }

    #[test]
    fn joined_words_detected() {
        let tok = Tokenizer::default();
        let wm = WordMatcher::new(WordMatcherSetup::default());
        let e = engine(&tok, &wm);
        let r = e.score("new york", "newyork city", 0);
        assert!(r.word_hits >= 1);
    }

    #[test]
    fn each_query_word_counted_at_most_once() {
        let tok = Tokenizer::default();
        let wm = WordMatcher::new(WordMatcherSetup::default());
        let e = engine(&tok, &wm);
        let r = e.score("fox fox", "the quick brown fox", 0);
        assert_eq!(r.word_hits, 2);
    }
}
