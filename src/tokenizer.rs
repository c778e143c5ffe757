//! `Tokenizer`: padded multi-size n-gram shingling plus word split.
//!
//! Generalizes the teacher's `inverted::tokenize` (word-boundary split
//! + stop-word filter, used to build a classic inverted index) to
//! character-shingle emission with padding sentinels, since this engine
//! indexes n-grams rather than whole words for its Stage 1 vector model.

use crate::normalize::normalize;
use crate::types::Shingle;
use std::collections::{HashMap, HashSet};

/// Start-of-segment padding sentinel. Chosen from the Unicode Private
/// Use Area so it cannot collide with ordinary document text; if input
/// does contain it, it is treated as an ordinary character per spec —
/// only *all-padding* shingles are special-cased, not individual
/// sentinel characters.
pub const START_PAD_CHAR: char = '\u{E001}';
/// End-of-segment padding sentinel.
pub const STOP_PAD_CHAR: char = '\u{E002}';

#[derive(Debug, Clone)]
pub struct Tokenizer {
    pub index_sizes: Vec<u8>,
    pub start_pad: u8,
    pub stop_pad: u8,
    pub delimiters: HashSet<char>,
}

impl Tokenizer {
    pub fn new(index_sizes: Vec<u8>, start_pad: u8, stop_pad: u8) -> Self {
        let delimiters = " \t\r\n.,;:!?\"'()[]{}/<>-_".chars().collect();
        Self {
            index_sizes,
            start_pad,
            stop_pad,
            delimiters,
        }
    }

    fn is_all_padding(chars: &[char]) -> bool {
        chars
            .iter()
            .all(|c| *c == START_PAD_CHAR || *c == STOP_PAD_CHAR)
    }

    /// Emits every length-`n` substring of `chars` (for each configured
    /// `n`, in list order) as a `Shingle` at its starting char position,
    /// dropping all-padding shingles. Duplicates are preserved; callers
    /// that need counts aggregate separately.
    fn emit_shingles(&self, chars: &[char]) -> Vec<Shingle> {
        let mut out = Vec::new();
        for &n in &self.index_sizes {
            let n = n as usize;
            if n == 0 || n > chars.len() {
                continue;
            }
            for start in 0..=(chars.len() - n) {
                let window = &chars[start..start + n];
                if Self::is_all_padding(window) {
                    continue;
                }
                let text: String = window.iter().collect();
                out.push(Shingle {
                    text,
                    occurrences: 1,
                    position: start as i32,
                });
            }
        }
        out
    }

    /// Indexing path: normalize, pad (unless a non-zero segment
    /// continuation), emit shingles for every configured size.
    pub fn tokenize_for_indexing(&self, text: &str, is_segment_continuation: bool) -> Vec<Shingle> {
        let normalized = normalize(text);
        let mut chars: Vec<char> = Vec::new();
        if !is_segment_continuation {
            chars.extend(std::iter::repeat(START_PAD_CHAR).take(self.start_pad as usize));
        }
        chars.extend(normalized.chars());
        chars.extend(std::iter::repeat(STOP_PAD_CHAR).take(self.stop_pad as usize));
        self.emit_shingles(&chars)
    }

    /// Search path: same shingle generation over the raw (unpadded)
    /// query, plus delimiter-split words deduplicated and added verbatim
    /// (for words of length >= the first configured shingle size),
    /// consolidated by summing occurrences of identical shingle text.
    ///
    /// Returns the deduplicated shingle set plus an auxiliary
    /// `text -> shingle index` map for callers (e.g. `CoverageEngine`)
    /// that need to walk distinct query terms.
    pub fn tokenize_for_search(&self, text: &str) -> (Vec<Shingle>, HashMap<String, usize>) {
        let normalized = normalize(text);
        let chars: Vec<char> = normalized.chars().collect();
        let mut shingles = self.emit_shingles(&chars);

        let min_word_len = self.index_sizes.first().copied().unwrap_or(1) as usize;
        let mut seen_words: HashSet<String> = HashSet::new();
        for word in normalized.split(|c: char| self.delimiters.contains(&c)) {
            if word.is_empty() || word.chars().count() < min_word_len {
                continue;
            }
            if seen_words.insert(word.to_string()) {
                shingles.push(Shingle {
                    text: word.to_string(),
                    occurrences: 1,
                    position: 0,
                });
            }
        }

        let mut consolidated: Vec<Shingle> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for s in shingles {
            if let Some(&i) = index.get(&s.text) {
                consolidated[i].occurrences = consolidated[i].occurrences.saturating_add(s.occurrences);
            } else {
                index.insert(s.text.clone(), consolidated.len());
                consolidated.push(s);
            }
        }
        (consolidated, index)
    }

    /// Splits normalized text on the configured delimiter set, used by
    /// `WordMatcher`/`CoverageEngine` word-level matching.
    pub fn words(&self, text: &str) -> Vec<String> {
        normalize(text)
            .split(|c: char| self.delimiters.contains(&c))
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(vec![2, 3], 2, 0)
    }
}
