//! Embedded, in-process full-text search with typo-tolerant ranking.
//!
//! The pipeline runs two stages per query: a byte-quantized TF-IDF
//! vector-space score (`vector_model`), then an optional lexical
//! rescoring pass over the top candidates (`coverage`) that rewards
//! typo-tolerant, joined/split, and affix word matches. The two stage
//! scores fuse by pointwise max (`pipeline`), so a perfect hit under
//! either stage always survives into the final ranking.
//!
//! ```
//! use infidex::{Document, Engine, EngineConfig, Field, SearchQuery, Weight};
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! engine.index_document(Document::new(1, vec![Field::new("title", "The quick brown fox", Weight::High)])).unwrap();
//! engine.calculate_weights().unwrap();
//! let results = engine.search(SearchQuery::new("qick fux")).unwrap();
//! assert_eq!(results[0].document_key, 1);
//! ```

mod bitparallel;
mod config;
mod coverage;
mod document;
mod engine;
mod error;
mod normalize;
mod persistence;
mod pipeline;
mod progress;
mod quantize;
mod term;
#[doc(hidden)]
pub mod testing;
mod tokenizer;
mod types;
mod vector_model;
mod word_matcher;

pub use config::{CoverageSetup, EngineConfig, WordMatcherSetup, WordWindow};
pub use engine::{Engine, EngineStatistics, SearchQuery};
pub use error::{InfidexError, Result};
pub use progress::{CancellationToken, ProgressObserver};
pub use types::{Document, Field, ScoreEntry, Weight};
