//! `float <-> byte` quantization and O(n+256) bucket sort.
//!
//! Grounded on the teacher's byte-oriented inner loops (`util::simd`'s
//! `u8`-DP Levenshtein cells, `scoring::core`'s `f64`-to-bucket ranking
//! constants) generalized into a standalone quantization contract, since
//! this engine's whole scoring path is deliberately u8-typed end to end.

/// `f2b(x) = 0 if x<=0; 255 if x>=1; else round(x*255)` clamped to
/// `[0,255]`.
pub fn f2b(x: f32) -> u8 {
    if x <= 0.0 {
        0
    } else if x >= 1.0 {
        255
    } else {
        (x * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

/// `b2f(b) = b / 255`.
pub fn b2f(b: u8) -> f32 {
    b as f32 / 255.0
}

/// Selects up to `k` entries with the highest score via 256-bucket sort:
/// drop every `(index, score)` into `buckets[score]`, then drain buckets
/// from 255 down to 0 until `k` have been collected. Ties within a
/// bucket are broken by ascending index for determinism, mirroring the
/// teacher's bucketed `compare_results` ranking philosophy ("buckets are
/// impermeable") generalized from a 3-tier match-type bucket to a
/// 256-value score bucket.
///
/// Returns `(index, score)` pairs, ordered score descending then index
/// ascending within a score, truncated to `k`.
pub fn bucket_top_k<T: Copy>(entries: &[(T, u8)], k: usize, key: impl Fn(T) -> u64) -> Vec<(T, u8)> {
    let mut buckets: Vec<Vec<(T, u8)>> = (0..256).map(|_| Vec::new()).collect();
    for &(item, score) in entries {
        buckets[score as usize].push((item, score));
    }
    let mut out = Vec::with_capacity(k.min(entries.len()));
    for score in (0u16..=255).rev() {
        let bucket = &mut buckets[score as usize];
        bucket.sort_by_key(|&(item, _)| key(item));
        for &entry in bucket.iter() {
            if out.len() >= k {
                return out;
            }
            out.push(entry);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f2b_clamps_at_bounds() {
        assert_eq!(f2b(-1.0), 0);
        assert_eq!(f2b(0.0), 0);
        assert_eq!(f2b(1.0), 255);
        assert_eq!(f2b(2.0), 255);
    }

    #[test]
    fn f2b_rounds_midpoint() {
        assert_eq!(f2b(0.5), 128);
    }

    #[test]
    fn roundtrip_error_under_one_over_255() {
        let mut f = 0.0f32;
        while f <= 1.0 {
            let err = (f - b2f(f2b(f))).abs();
            assert!(err < 1.0 / 255.0 + 1e-6, "f={f} err={err}");
            f += 0.001;
        }
    }

    #[test]
    fn bucket_top_k_is_score_descending_then_index_ascending() {
        let entries: Vec<(i32, u8)> = vec![(0, 10), (1, 200), (2, 200), (3, 50)];
        let top = bucket_top_k(&entries, 10, |i| i as u64);
        assert_eq!(top, vec![(1, 200), (2, 200), (3, 50), (0, 10)]);
    }

    #[test]
    fn bucket_top_k_truncates() {
        let entries: Vec<(i32, u8)> = vec![(0, 1), (1, 2), (2, 3)];
        let top = bucket_top_k(&entries, 2, |i| i as u64);
        assert_eq!(top, vec![(2, 3), (1, 2)]);
    }

    proptest::proptest! {
        #[test]
        fn f2b_b2f_round_trip_within_one_bucket(x in 0.0f32..=1.0f32) {
            let err = (x - b2f(f2b(x))).abs();
            proptest::prop_assert!(err < 1.0 / 255.0 + 1e-6);
        }

        #[test]
        fn bucket_top_k_output_is_monotonic_non_increasing(
            scores in proptest::collection::vec(0u8..=255u8, 0..200),
            k in 0usize..250usize,
        ) {
            let entries: Vec<(i32, u8)> =
                scores.into_iter().enumerate().map(|(i, s)| (i as i32, s)).collect();
            let top = bucket_top_k(&entries, k, |i| i as u64);
            proptest::prop_assert!(top.len() <= k.min(entries.len()));
            for window in top.windows(2) {
                proptest::prop_assert!(window[0].1 >= window[1].1);
            }
        }
    }
}
