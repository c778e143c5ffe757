//! Progress observer: a simple callback, not a multi-subscriber bus.
//!
//! Grounded on the teacher's `indicatif`-driven build progress
//! (`build::run_build`'s `create_progress_style`), generalized from a
//! concrete `ProgressBar` type to a trait so the library core carries no
//! UI dependency — a caller wires an `indicatif` bar (or anything else)
//! into this the same way the teacher's own CLI binary owns the bar, not
//! the library logic that drives it.

/// Receives integer percent-complete updates, `[0, 100]`.
///
/// Indexing emits `[0, 50]` during document ingest and `[50, 100]` across
/// the two `build_inverted_lists` normalization passes.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, percent: u8);
}

impl<F: Fn(u8) + Send + Sync> ProgressObserver for F {
    fn on_progress(&self, percent: u8) {
        self(percent)
    }
}

/// Cooperative cancellation flag, polled by writer operations between
/// terms (~every `cancellation_poll_interval`) and at batch boundaries.
/// Query operations never consult this — individual queries are bounded
/// by `coverage_depth` instead.
#[derive(Debug, Default, Clone)]
pub struct CancellationToken(std::sync::Arc<std::sync::atomic::AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }
}
