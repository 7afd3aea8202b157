//! fuzzyrank - Fuzzy full-text ranking over in-memory records
//!
//! Ranks items exposing named string attributes by how well they match a
//! free-text query.
//!
//! # Features
//! - String similarity algorithms (Jaro-Winkler, matching-block ratio,
//!   Damerau-Levenshtein)
//! - Token-aware matchers with automatic strategy selection
//! - Per-attribute weighting and threshold-based acceptance
//! - Deterministic ranking, parallel scoring for large inputs
//!
//! # Example
//!
//! ```rust
//! use fuzzyrank::{Record, SearchEngine};
//!
//! let words: Vec<Record> = ["inconvenience", "laughter", "watson"]
//!     .iter()
//!     .map(|word| Record::new().with_field("word", *word))
//!     .collect();
//!
//! let engine = SearchEngine::with_keys(["word"]);
//! let found = engine.find("inconvene", &words).unwrap();
//! assert_eq!(found[0].get_field("word"), Some("inconvenience"));
//! ```

pub mod algorithms;
pub mod error;
pub mod matchers;
pub mod search;
pub mod tokenize;

pub use algorithms::{
    approx_string_similarity, character_ratio, edit_distance, DistanceAlgorithm, EditDistance,
    Similarity,
};
pub use error::{Result, SearchError};
pub use matchers::{
    best_token_ratio, intersect_token_ratio, lazy_match, simple_ratio, token_sort_ratio,
    MatcherStrategy,
};
pub use search::{
    Match, Record, Scorer, SearchConfig, SearchEngine, SearchObserver, SearchOptions,
    SearchResult, Searchable, TracingObserver, WeightPolicy,
};
pub use tokenize::Tokenizer;

/// Minimum input size for parallel processing.
///
/// For inputs smaller than this threshold, sequential processing is faster
/// due to the overhead of thread pool coordination.
pub const PARALLEL_THRESHOLD: usize = 100;
