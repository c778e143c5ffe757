//! Error types surfaced by the engine.
//!
//! Reader-side failures (a malformed query, an empty result) are not
//! errors — they come back as `Ok` with an empty `Vec`. Only writer-side
//! and constructor-side failures use this type.

use std::fmt;

/// Failure modes the engine can surface to a caller.
///
/// `EmptyResult` from the design table is intentionally absent here: an
/// empty candidate set is a successful, empty `Vec<ScoreEntry>`, not an
/// `Err` variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfidexError {
    /// `load()` saw a magic tag or version it doesn't recognize. The
    /// caller's existing index (if any) is untouched.
    InvalidFormat(String),
    /// An accumulator or posting buffer could not be allocated.
    OutOfMemory(String),
    /// A writer observed the cancellation flag mid-build. The index is
    /// left marked not-built; the caller must not issue queries against
    /// it until a fresh `build_inverted_lists` completes.
    Cancelled,
    /// Rejected at construction time: negative sizes, an unsupported
    /// `index_sizes` entry, or an unrecognized config value.
    InvalidArgument(String),
}

impl fmt::Display for InfidexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfidexError::InvalidFormat(msg) => write!(f, "invalid index format: {msg}"),
            InfidexError::OutOfMemory(msg) => write!(f, "out of memory: {msg}"),
            InfidexError::Cancelled => write!(f, "operation cancelled"),
            InfidexError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for InfidexError {}

pub type Result<T> = std::result::Result<T, InfidexError>;
