//! Property test aggregator for invariants observable through the public
//! API. Invariants that require internal state (document frequency,
//! vector norms, quantization round-trips, bucket-sort ordering, fusion
//! inequalities) live as `proptest!` blocks inside their owning modules
//! under `src/`, next to the code they check.

mod common;

#[path = "property/search_invariants.rs"]
mod search_invariants;
#[path = "property/build_determinism.rs"]
mod build_determinism;
