//! Error types for search configuration.
//!
//! Only configuration problems are errors. Items missing an attribute are
//! scored with whatever attributes they have and never surface here.

use thiserror::Error;

/// Errors raised while resolving a search configuration.
///
/// Every variant is raised before any item is scored, so a failed call never
/// returns partial results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// A distance algorithm name is not registered
    #[error("Unknown algorithm: '{name}'. Valid: {valid}")]
    UnknownAlgorithm { name: String, valid: String },

    /// A matcher strategy name is not registered
    #[error("Unknown matcher: '{name}'. Valid: {valid}")]
    UnknownMatcher { name: String, valid: String },

    /// Threshold is NaN and can't be compared against
    #[error("threshold must be a number, got {0}")]
    InvalidThreshold(f64),

    /// Explicit weights don't line up with the attribute keys
    /// (only raised with `WeightPolicy::Strict`)
    #[error("Expected {expected} weights (one per attribute key), got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },

    /// Explicit weights can't be normalized
    /// (only raised with `WeightPolicy::Strict`)
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_algorithm_names_valid_set() {
        let err = SearchError::UnknownAlgorithm {
            name: "soundex".into(),
            valid: "jaro_winkler, ratio".into(),
        };
        let message = err.to_string();
        assert!(message.contains("soundex"));
        assert!(message.contains("jaro_winkler, ratio"));
    }

    #[test]
    fn test_weight_mismatch_message() {
        let err = SearchError::WeightCountMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Expected 3 weights (one per attribute key), got 2"
        );
    }

    #[test]
    fn test_invalid_threshold_message() {
        let err = SearchError::InvalidThreshold(f64::NAN);
        assert_eq!(err.to_string(), "threshold must be a number, got NaN");
    }
}
