//! Search configuration and per-call resolution
//!
//! [`SearchConfig`] is the stored, serializable configuration of an engine.
//! [`SearchOptions`] carries call-local overrides. Each call resolves the
//! two into a [`SearchPlan`] before any item is touched, so every
//! configuration error surfaces up front.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algorithms::DistanceAlgorithm;
use crate::error::{Result, SearchError};
use crate::matchers::MatcherStrategy;
use crate::tokenize::Tokenizer;

/// Default acceptance threshold for the winning key score
pub const DEFAULT_THRESHOLD: f64 = 0.75;

/// What to do when explicit weights can't be used as given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightPolicy {
    /// Fall back to positional weights
    #[default]
    Regenerate,
    /// Fail with [`SearchError::WeightCountMismatch`] or
    /// [`SearchError::InvalidWeights`]
    Strict,
}

/// How an attribute value is scored against the query.
#[derive(Debug, Clone)]
pub enum Scorer {
    /// Compare every value token to every query token
    Tokens(DistanceAlgorithm),
    /// Score the whole value with one matcher
    Strategy(MatcherStrategy),
}

impl Scorer {
    pub fn name(&self) -> &'static str {
        match self {
            Scorer::Tokens(algorithm) => algorithm.name(),
            Scorer::Strategy(strategy) => strategy.name(),
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Scorer::Tokens(DistanceAlgorithm::default())
    }
}

impl From<DistanceAlgorithm> for Scorer {
    fn from(algorithm: DistanceAlgorithm) -> Self {
        Scorer::Tokens(algorithm)
    }
}

impl From<MatcherStrategy> for Scorer {
    fn from(strategy: MatcherStrategy) -> Self {
        Scorer::Strategy(strategy)
    }
}

/// Stored engine configuration.
///
/// # Example
///
/// ```rust
/// use fuzzyrank::search::config::SearchConfig;
///
/// let config: SearchConfig = serde_json::from_str(
///     r#"{"attribute_keys": ["fname", "lname"], "threshold": 0.8}"#,
/// ).unwrap();
/// assert_eq!(config.limit, -1);
/// assert_eq!(config.algorithm, "jaro_winkler");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Attributes to score, most important first
    pub attribute_keys: Vec<String>,

    /// Maximum number of results; zero or negative means unlimited
    pub limit: i64,

    /// Minimum winning key score for an item to be returned (0.0 - 1.0)
    pub threshold: f64,

    /// Explicit weights, one per attribute key
    pub weights: Option<Vec<f64>>,

    pub weight_policy: WeightPolicy,

    /// Token-level distance algorithm name
    pub algorithm: String,

    /// Whole-value matcher name; takes precedence over `algorithm`
    pub matcher: Option<String>,

    pub tokenizer: Tokenizer,

    /// Score large inputs on the rayon pool
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            attribute_keys: Vec::new(),
            limit: -1,
            threshold: DEFAULT_THRESHOLD,
            weights: None,
            weight_policy: WeightPolicy::default(),
            algorithm: DistanceAlgorithm::default().name().to_string(),
            matcher: None,
            tokenizer: Tokenizer::default(),
            parallel: true,
        }
    }
}

impl SearchConfig {
    pub fn new<I, S>(attribute_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attribute_keys: attribute_keys.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Check the configuration without searching.
    pub fn validate(&self) -> Result<()> {
        self.resolve(&SearchOptions::default(), None).map(|_| ())
    }

    /// Merge `options` over this configuration and validate the result.
    ///
    /// Scorer precedence, highest first: `options.scorer`, `options.matcher`,
    /// `options.algorithm`, `engine_scorer`, `self.matcher`,
    /// `self.algorithm`. Every name that is set must be valid, even when a
    /// higher-precedence choice overrides it.
    ///
    /// Weights come from `options.weights`, else from `self.weights` unless
    /// the options replace the attribute keys.
    pub(crate) fn resolve(
        &self,
        options: &SearchOptions,
        engine_scorer: Option<&Scorer>,
    ) -> Result<SearchPlan> {
        let threshold = options.threshold.unwrap_or(self.threshold);
        // out-of-range values are legal: above 1.0 nothing is valid,
        // below 0.0 every scored item is
        if threshold.is_nan() {
            return Err(SearchError::InvalidThreshold(threshold));
        }

        // no keys means every item scores an empty, invalid match
        let keys = options
            .attribute_keys
            .clone()
            .unwrap_or_else(|| self.attribute_keys.clone());

        let config_algorithm: DistanceAlgorithm = self.algorithm.parse()?;
        let config_matcher = self.matcher.as_deref().map(str::parse::<MatcherStrategy>).transpose()?;
        let option_algorithm = options
            .algorithm
            .as_deref()
            .map(str::parse::<DistanceAlgorithm>)
            .transpose()?;
        let option_matcher = options
            .matcher
            .as_deref()
            .map(str::parse::<MatcherStrategy>)
            .transpose()?;

        let scorer = options
            .scorer
            .clone()
            .or_else(|| option_matcher.map(Scorer::Strategy))
            .or_else(|| option_algorithm.map(Scorer::Tokens))
            .or_else(|| engine_scorer.cloned())
            .or_else(|| config_matcher.map(Scorer::Strategy))
            .unwrap_or(Scorer::Tokens(config_algorithm));

        let explicit = match (&options.weights, &options.attribute_keys) {
            (Some(weights), _) => Some(weights.as_slice()),
            (None, None) => self.weights.as_deref(),
            (None, Some(_)) => None,
        };
        let weights = resolve_weights(explicit, keys.len(), self.weight_policy)?;

        let limit = options.limit.unwrap_or(self.limit);
        let limit = usize::try_from(limit).ok().filter(|&limit| limit > 0);

        Ok(SearchPlan {
            keys,
            weights,
            threshold,
            limit,
            scorer,
            tokenizer: self.tokenizer.clone(),
            parallel: self.parallel,
        })
    }
}

/// Call-local overrides for one search. Unset fields fall back to the
/// engine's [`SearchConfig`].
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub attribute_keys: Option<Vec<String>>,
    pub limit: Option<i64>,
    pub threshold: Option<f64>,
    pub weights: Option<Vec<f64>>,
    /// Distance algorithm name
    pub algorithm: Option<String>,
    /// Matcher strategy name
    pub matcher: Option<String>,
    /// Scorer given in code, including custom matchers
    pub scorer: Option<Scorer>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attribute_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_algorithm(mut self, name: impl Into<String>) -> Self {
        self.algorithm = Some(name.into());
        self
    }

    pub fn with_matcher(mut self, name: impl Into<String>) -> Self {
        self.matcher = Some(name.into());
        self
    }

    pub fn with_scorer(mut self, scorer: impl Into<Scorer>) -> Self {
        self.scorer = Some(scorer.into());
        self
    }
}

/// Everything one search call needs, validated.
#[derive(Debug, Clone)]
pub(crate) struct SearchPlan {
    pub keys: Vec<String>,
    /// Scaled weights, parallel to `keys`
    pub weights: Vec<f64>,
    pub threshold: f64,
    pub limit: Option<usize>,
    pub scorer: Scorer,
    pub tokenizer: Tokenizer,
    pub parallel: bool,
}

/// Positional weights `[n, n-1, ..., 1]` scaled so the first is 1.0.
///
/// # Example
///
/// ```rust
/// use fuzzyrank::search::config::positional_weights;
/// assert_eq!(positional_weights(4), vec![1.0, 0.75, 0.5, 0.25]);
/// ```
pub fn positional_weights(count: usize) -> Vec<f64> {
    let n = count as f64;
    (0..count).map(|position| (n - position as f64) / n).collect()
}

/// Scale weights so the largest equals 1.0.
///
/// Returns `None` when any weight is negative or not finite, or when no
/// weight is positive.
pub fn scale_to_one(weights: &[f64]) -> Option<Vec<f64>> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return None;
    }
    let max = weights.iter().copied().fold(0.0f64, f64::max);
    if max <= 0.0 {
        return None;
    }
    Some(weights.iter().map(|w| w / max).collect())
}

/// Effective weights for `count` attribute keys.
pub fn resolve_weights(
    explicit: Option<&[f64]>,
    count: usize,
    policy: WeightPolicy,
) -> Result<Vec<f64>> {
    let Some(weights) = explicit else {
        return Ok(positional_weights(count));
    };

    if weights.len() != count {
        return match policy {
            WeightPolicy::Regenerate => {
                debug!(
                    expected = count,
                    actual = weights.len(),
                    "Weight count mismatch, using positional weights"
                );
                Ok(positional_weights(count))
            }
            WeightPolicy::Strict => Err(SearchError::WeightCountMismatch {
                expected: count,
                actual: weights.len(),
            }),
        };
    }

    match (scale_to_one(weights), policy) {
        (Some(scaled), _) => Ok(scaled),
        (None, WeightPolicy::Regenerate) => {
            debug!(?weights, "Unusable weights, using positional weights");
            Ok(positional_weights(count))
        }
        (None, WeightPolicy::Strict) => Err(SearchError::InvalidWeights(format!(
            "weights must be finite, non-negative and not all zero, got {:?}",
            weights
        ))),
    }
}
