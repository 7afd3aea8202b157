//! Core string similarity algorithms
//!
//! Each algorithm is a standalone function for composability, plus a
//! trait-based interface for extensibility. None of them casefold: callers
//! lowercase both operands first.

pub mod damerau;
pub mod jaro;
pub mod ratio;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

pub use damerau::{edit_distance, optimal_string_alignment, DamerauLevenshtein};
pub use jaro::{approx_string_similarity, jaro_similarity, jaro_winkler_similarity, JaroWinkler};
pub use ratio::{character_ratio, CharacterRatio};

/// Trait for all similarity metrics.
/// Returns a value between 0.0 (completely different) and 1.0 (identical).
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// Convenience method for distance (1.0 - similarity)
    fn distance(&self, a: &str, b: &str) -> f64 {
        1.0 - self.similarity(a, b)
    }

    /// Name of the algorithm for debugging/logging
    fn name(&self) -> &'static str;
}

/// Trait for edit distance algorithms that return integer distances.
///
/// Distances are not normalized and are never mixed with [`Similarity`]
/// scores.
pub trait EditDistance: Send + Sync {
    fn distance(&self, a: &str, b: &str) -> usize;

    fn name(&self) -> &'static str;
}

/// Registered token-level similarity algorithms.
///
/// Only normalized algorithms are registered; the engine compares their
/// scores against a [0, 1] threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceAlgorithm {
    /// Long-tolerant Jaro-Winkler ([`approx_string_similarity`])
    #[default]
    JaroWinkler,
    /// Matching-block ratio ([`character_ratio`])
    #[serde(alias = "ratio")]
    CharacterRatio,
}

impl DistanceAlgorithm {
    /// Accepted names, for error messages
    pub const VALID_NAMES: &'static str = "jaro_winkler, approx, ratio, character_ratio";

    /// Score `a` against `b` with this algorithm.
    #[inline]
    #[must_use]
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        match self {
            DistanceAlgorithm::JaroWinkler => approx_string_similarity(a, b),
            DistanceAlgorithm::CharacterRatio => character_ratio(a, b),
        }
    }

    /// Canonical name
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DistanceAlgorithm::JaroWinkler => "jaro_winkler",
            DistanceAlgorithm::CharacterRatio => "ratio",
        }
    }
}

impl FromStr for DistanceAlgorithm {
    type Err = SearchError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "jaro_winkler" | "jaro winkler" | "jaro-winkler" | "approx" => {
                Ok(DistanceAlgorithm::JaroWinkler)
            }
            "ratio" | "character_ratio" => Ok(DistanceAlgorithm::CharacterRatio),
            _ => Err(SearchError::UnknownAlgorithm {
                name: name.to_string(),
                valid: Self::VALID_NAMES.to_string(),
            }),
        }
    }
}

impl fmt::Display for DistanceAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_name() {
        assert_eq!(
            "jaro winkler".parse::<DistanceAlgorithm>(),
            Ok(DistanceAlgorithm::JaroWinkler)
        );
        assert_eq!(
            "Jaro_Winkler".parse::<DistanceAlgorithm>(),
            Ok(DistanceAlgorithm::JaroWinkler)
        );
        assert_eq!("ratio".parse::<DistanceAlgorithm>(), Ok(DistanceAlgorithm::CharacterRatio));
    }

    #[test]
    fn test_unknown_algorithm_lists_valid_names() {
        let err = "damerau levenshtein".parse::<DistanceAlgorithm>().unwrap_err();
        match err {
            SearchError::UnknownAlgorithm { name, valid } => {
                assert_eq!(name, "damerau levenshtein");
                assert!(valid.contains("jaro_winkler"));
                assert!(valid.contains("ratio"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_registry_dispatch() {
        assert_eq!(
            DistanceAlgorithm::JaroWinkler.similarity("inconvene", "inconvenience"),
            approx_string_similarity("inconvene", "inconvenience")
        );
        assert_eq!(
            DistanceAlgorithm::CharacterRatio.similarity("hello", "hallo"),
            character_ratio("hello", "hallo")
        );
    }

    #[test]
    fn test_trait_objects() {
        let metrics: Vec<Box<dyn Similarity>> =
            vec![Box::new(JaroWinkler::default()), Box::new(CharacterRatio::new())];
        for metric in &metrics {
            assert_eq!(metric.similarity("watson", "watson"), 1.0);
            assert_eq!(metric.distance("watson", "watson"), 0.0);
        }
        assert_eq!(metrics[0].name(), "jaro_winkler");
        assert_eq!(metrics[1].name(), "ratio");
    }

    #[test]
    fn test_algorithm_serde_names() {
        let parsed: DistanceAlgorithm = serde_json::from_str("\"character_ratio\"").unwrap();
        assert_eq!(parsed, DistanceAlgorithm::CharacterRatio);
        let parsed: DistanceAlgorithm = serde_json::from_str("\"ratio\"").unwrap();
        assert_eq!(parsed, DistanceAlgorithm::CharacterRatio);
        assert_eq!(serde_json::to_string(&DistanceAlgorithm::JaroWinkler).unwrap(), "\"jaro_winkler\"");
    }
}
