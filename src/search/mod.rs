// Weighted multi-attribute fuzzy search
//
// This module ranks in-memory items against a free-text query.
// Key pieces:
// - Configuration resolved once per call, with call-local overrides
// - Token-level or whole-value scoring per attribute
// - Per-item aggregation of attribute scores into one weight
// - Deterministic ranking with parallel scoring for large inputs
//
// # Architecture
//
// ```text
// SearchConfig + SearchOptions → SearchPlan → score items → MatchAccumulator → Match → rank
// ```

pub mod config;
pub mod engine;
pub mod observer;
pub mod record;
pub mod scoring;

pub use config::{
    positional_weights, resolve_weights, scale_to_one, Scorer, SearchConfig, SearchOptions,
    WeightPolicy, DEFAULT_THRESHOLD,
};
pub use engine::{ResultSummary, SearchEngine, SearchResult};
pub use observer::{SearchObserver, TracingObserver};
pub use record::{Record, Searchable};
pub use scoring::{KeyScore, Match, MatchAccumulator, Observation};
