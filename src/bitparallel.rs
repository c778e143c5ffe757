//! Bit-parallel string metrics: Myers edit distance and packed LCS.
//!
//! Neither algorithm exists in the corpus teacher repository (its own
//! fuzzy matching is a bounded scalar DP in `fuzzy::levenshtein` plus a
//! Schulz-Mihov parametric-state DFA for precomputed automata — register
//! bit-packing is a different technique entirely). These are authored
//! fresh from the published algorithms (Myers 1999; Hyyrö & Navarro
//! 2006, "Increased Bit-Parallelism for Approximate and Multiple String
//! Matching"), in the teacher's idiom: small free functions over
//! primitive integers, unit-tested against a scalar oracle the way
//! `util::simd`'s SIMD Levenshtein is tested against its scalar
//! fallback.

/// Upper bound on word length the bit-parallel routines accept; beyond
/// this, callers fall back to scalar algorithms.
pub const MAX_BITPARALLEL_LEN: usize = 64;

/// Precomputes, for each ASCII-range byte value and also arbitrary
/// `char`s actually present in `pattern`, a bitmask with a 1 at every
/// position the character occurs in `pattern`.
fn char_bitmasks(pattern: &[char]) -> std::collections::HashMap<char, u64> {
    let mut map = std::collections::HashMap::new();
    for (i, &c) in pattern.iter().enumerate() {
        *map.entry(c).or_insert(0u64) |= 1u64 << i;
    }
    map
}

/// Myers (1999) bit-parallel Levenshtein distance for `pattern` against
/// `text`, both at most `MAX_BITPARALLEL_LEN` characters. Maintains two
/// 64-bit vectors `vp`/`vn` (vertical positive/negative differentials);
/// each text character updates them in O(1) machine words and the
/// running distance is read from the top bit of the pattern's length.
///
/// Returns `None` if either string exceeds `MAX_BITPARALLEL_LEN` chars —
/// callers should fall back to a scalar DP (e.g. `scalar_levenshtein`)
/// in that case.
pub fn myers_distance(pattern: &[char], text: &[char]) -> Option<u32> {
    let m = pattern.len();
    if m == 0 {
        return Some(text.len() as u32);
    }
    if m > MAX_BITPARALLEL_LEN || text.len() > MAX_BITPARALLEL_LEN * 4096 {
        return None;
    }
    let pm = char_bitmasks(pattern);
    let last_bit: u64 = 1u64 << (m - 1);
    let mut vp: u64 = !0u64;
    let mut vn: u64 = 0u64;
    let mut score = m as u32;

    for &c in text {
        let eq = *pm.get(&c).unwrap_or(&0);
        let xv = eq | vn;
        let xh_partial = eq & vp;
        let xh = xh_partial.wrapping_add(vp) ^ vp | eq;
        let mut ph = vn | !(xh | vp);
        let mut mh = vp & xh;

        if ph & last_bit != 0 {
            score += 1;
        } else if mh & last_bit != 0 {
            score -= 1;
        }

        ph = (ph << 1) | 1;
        mh <<= 1;
        vp = mh | !(xv | ph);
        vn = ph & xv;
    }
    Some(score)
}

/// Scalar Levenshtein DP, used as the oracle `myers_distance` is tested
/// against, and as the fallback for words longer than
/// `MAX_BITPARALLEL_LEN`.
pub fn scalar_levenshtein(a: &[char], b: &[char]) -> u32 {
    let (n, m) = (a.len(), b.len());
    let mut prev: Vec<u32> = (0..=m as u32).collect();
    let mut cur = vec![0u32; m + 1];
    for i in 1..=n {
        cur[0] = i as u32;
        for j in 1..=m {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            cur[j] = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[m]
}

/// Bounded-distance check used as an LD1 oracle: true iff
/// `distance(a, b) <= max`, short-circuiting on the length-difference
/// lower bound the way the teacher's `levenshtein_within` does.
pub fn within_distance(a: &[char], b: &[char], max: u32) -> bool {
    if (a.len() as i64 - b.len() as i64).unsigned_abs() as u32 > max {
        return false;
    }
    let dist = if a.len().max(b.len()) <= MAX_BITPARALLEL_LEN {
        myers_distance(a, b).unwrap_or_else(|| scalar_levenshtein(a, b))
    } else {
        scalar_levenshtein(a, b)
    };
    dist <= max
}

/// A single packed query word ready for `packed_lcs`: its character
/// bitmap folded into the shared register layout, plus the mask
/// isolating its own bit range.
struct PackedWord {
    /// `word_mask`: bits `[offset, offset+len)` set.
    word_mask: u64,
    offset: usize,
    len: usize,
}

/// Packs up to 60 characters across `words` into one 64-bit boundary
/// mask `ZM` (zero at the last bit of each packed word, one elsewhere)
/// plus per-word masks, per Hyyrö & Navarro (2006). Returns `None` if
/// the words don't jointly fit in 60 packed bits.
fn pack_words(words: &[&[char]]) -> Option<(Vec<PackedWord>, u64, usize)> {
    debug_assert!(words.iter().all(|w| !w.is_empty()), "packed_lcs requires non-empty words");
    let total: usize = words.iter().map(|w| w.len()).sum();
    if total == 0 || total > 60 {
        return None;
    }
    let mut packed = Vec::with_capacity(words.len());
    let mut zm: u64 = !0u64;
    let mut offset = 0usize;
    for w in words {
        let len = w.len();
        let word_mask = ((1u64 << len) - 1) << offset;
        zm &= !(1u64 << (offset + len - 1));
        packed.push(PackedWord { word_mask, offset, len });
        offset += len;
    }
    Some((packed, zm, total))
}

/// Longest common subsequence length between each packed query word and
/// `doc`, computed in a single pass over `doc` per Hyyrö & Navarro
/// (2006) "increased bit-parallelism": `S` packs the per-word LCS state;
/// per document character, `M` is the precomputed bitmap of that
/// character's positions across all packed words, `U = S & M`,
/// `S = ((S & ZM) + (U & ZM)) | (S - U)`. At the end,
/// `popcount(~S & word_mask_i) = LCS(word_i, doc)`.
///
/// Falls back to `None` when the packed words don't fit in 60 bits;
/// callers should use `scalar_lcs` per word in that case.
pub fn packed_lcs(words: &[&[char]], doc: &[char]) -> Option<Vec<u32>> {
    let (packed, zm, _total) = pack_words(words)?;

    let mut bitmap: std::collections::HashMap<char, u64> = std::collections::HashMap::new();
    for (pw, word) in packed.iter().zip(words.iter()) {
        for (i, &c) in word.iter().enumerate() {
            *bitmap.entry(c).or_insert(0) |= 1u64 << (pw.offset + i);
        }
    }

    let mut s: u64 = !0u64;
    for &dc in doc {
        let m = *bitmap.get(&dc).unwrap_or(&0);
        let u = s & m;
        s = ((s & zm).wrapping_add(u & zm)) | (s.wrapping_sub(u));
    }

    Some(
        packed
            .iter()
            .map(|pw| (!s & pw.word_mask).count_ones())
            .collect(),
    )
}

/// Scalar LCS length DP, the fallback for words too long to pack.
pub fn scalar_lcs(a: &[char], b: &[char]) -> u32 {
    let (n, m) = (a.len(), b.len());
    let mut prev = vec![0u32; m + 1];
    let mut cur = vec![0u32; m + 1];
    for i in 1..=n {
        for j in 1..=m {
            cur[j] = if a[i - 1] == b[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(cur[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[m]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cs(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn myers_matches_scalar_oracle() {
        let cases = [
            ("kitten", "sitting"),
            ("", "abc"),
            ("abc", ""),
            ("flaw", "lawn"),
            ("café", "cafe"),
            ("same", "same"),
            ("a", "b"),
        ];
        for (a, b) in cases {
            let (a, b) = (cs(a), cs(b));
            let myers = myers_distance(&a, &b).unwrap();
            let scalar = scalar_levenshtein(&a, &b);
            assert_eq!(myers, scalar, "mismatch for {a:?} vs {b:?}");
        }
    }

    #[test]
    fn within_distance_matches_exact_ld1_semantics() {
        assert!(within_distance(&cs("kitten"), &cs("kitten"), 1));
        assert!(within_distance(&cs("kitten"), &cs("sitten"), 1));
        assert!(!within_distance(&cs("kitten"), &cs("sittin"), 1));
    }

    #[test]
    fn packed_lcs_matches_scalar_oracle() {
        let words: Vec<Vec<char>> = vec![cs("abc"), cs("xyz"), cs("abz")];
        let doc = cs("xaybzc");
        let refs: Vec<&[char]> = words.iter().map(|w| w.as_slice()).collect();
        let got = packed_lcs(&refs, &doc).unwrap();
        for (w, g) in words.iter().zip(got.iter()) {
            assert_eq!(*g, scalar_lcs(w, &doc), "word={w:?}");
        }
    }

    #[test]
    fn packed_lcs_rejects_oversized_batch() {
        let long: Vec<char> = vec!['a'; 61];
        let refs: Vec<&[char]> = vec![&long];
        assert!(packed_lcs(&refs, &cs("a")).is_none());
    }

    #[test]
    fn scalar_lcs_basic() {
        assert_eq!(scalar_lcs(&cs("abcde"), &cs("ace")), 3);
        assert_eq!(scalar_lcs(&cs(""), &cs("abc")), 0);
    }
}
