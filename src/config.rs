//! Engine configuration: defaults and constructor-time validation.
//!
//! Mirrors the shape of the teacher's `IndexThresholds` — a plain struct
//! with a `Default` impl plus a validation function, no external
//! config-parsing crate.

use crate::error::{InfidexError, Result};

/// LD1 / exact word-length windows used by the `WordMatcher`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordWindow {
    pub min: u8,
    pub max: u8,
}

impl WordWindow {
    fn validate(self, name: &str) -> Result<()> {
        if self.min == 0 || self.max < self.min {
            return Err(InfidexError::InvalidArgument(format!(
                "{name} window must satisfy 0 < min <= max, got [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// `WordMatcher` setup: length windows for the three collocated indexes.
#[derive(Debug, Clone, Copy)]
pub struct WordMatcherSetup {
    pub exact_window: WordWindow,
    pub ld1_window: WordWindow,
}

impl Default for WordMatcherSetup {
    fn default() -> Self {
        Self {
            exact_window: WordWindow { min: 2, max: 50 },
            ld1_window: WordWindow { min: 4, max: 20 },
        }
    }
}

/// Stage 2 knobs, overridable per-query via `SearchQuery::coverage_setup`.
#[derive(Debug, Clone, Copy)]
pub struct CoverageSetup {
    pub coverage_depth: usize,
}

impl Default for CoverageSetup {
    fn default() -> Self {
        Self { coverage_depth: 500 }
    }
}

/// Top-level engine configuration, supplied to `Engine::new`/`Engine::load`.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Shingle sizes, emitted in list order. Default `[2, 3]`.
    pub index_sizes: Vec<u8>,
    /// Start-of-segment padding sentinel repeat count.
    pub start_pad: u8,
    /// End-of-segment padding sentinel repeat count.
    pub stop_pad: u8,
    /// Whether Stage 2 (`CoverageEngine`) runs by default.
    pub enable_coverage: bool,
    /// Terms with `document_frequency` above this are retained but
    /// excluded from query matching.
    pub stop_term_limit: u32,
    /// Field weight multipliers, indexed by `Weight as usize`
    /// (`High`, `Med`, `Low`).
    pub field_weights: [f32; 3],
    pub word_matcher_setup: WordMatcherSetup,
    pub coverage_setup: CoverageSetup,
    /// Cancellation is polled after this many terms within a pass.
    pub cancellation_poll_interval: usize,
    /// Sleep-for-throttling checkpoint granularity during
    /// `build_inverted_lists`.
    pub batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            index_sizes: vec![2, 3],
            start_pad: 2,
            stop_pad: 0,
            enable_coverage: true,
            stop_term_limit: 1_250_000,
            field_weights: [1.5, 1.25, 1.0],
            word_matcher_setup: WordMatcherSetup::default(),
            coverage_setup: CoverageSetup::default(),
            cancellation_poll_interval: 10,
            batch_size: 1000,
        }
    }
}

impl EngineConfig {
    /// Validates the config, rejecting unsupported values at
    /// construction time rather than deep inside a build pass.
    pub fn validate(&self) -> Result<()> {
        if self.index_sizes.is_empty() {
            return Err(InfidexError::InvalidArgument(
                "index_sizes must not be empty".into(),
            ));
        }
        for &size in &self.index_sizes {
            if size == 0 || size > 60 {
                return Err(InfidexError::InvalidArgument(format!(
                    "unsupported index_size {size}; must be in [1, 60]"
                )));
            }
        }
        if self.field_weights.iter().any(|w| *w <= 0.0 || !w.is_finite()) {
            return Err(InfidexError::InvalidArgument(
                "field_weights must be finite and positive".into(),
            ));
        }
        self.word_matcher_setup.exact_window.validate("exact")?;
        self.word_matcher_setup.ld1_window.validate("ld1")?;
        if self.coverage_setup.coverage_depth == 0 {
            return Err(InfidexError::InvalidArgument(
                "coverage_depth must be > 0".into(),
            ));
        }
        if self.cancellation_poll_interval == 0 {
            return Err(InfidexError::InvalidArgument(
                "cancellation_poll_interval must be > 0".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(InfidexError::InvalidArgument("batch_size must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_index_sizes_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.index_sizes.clear();
        assert!(matches!(
            cfg.validate(),
            Err(InfidexError::InvalidArgument(_))
        ));
    }

    #[test]
    fn oversized_shingle_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.index_sizes.push(200);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_ld1_window_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.word_matcher_setup.ld1_window = WordWindow { min: 10, max: 4 };
        assert!(cfg.validate().is_err());
    }
}
