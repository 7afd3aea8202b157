//! Composite matchers scoring a query against one string value.
//!
//! Every matcher returns a score in [0, 1]:
//! - `simple_ratio`: whole-string character ratio
//! - `best_token_ratio`: best sliding-window score of any query token
//! - `token_sort_ratio`: mean sliding-window score over all query tokens
//! - `intersect_token_ratio`: set-based comparison of shared and leftover tokens
//! - `lazy_match`: picks one of the above from the token-count shape
//!
//! The string functions tokenize with [`Tokenizer::default`]. The
//! `*_tokens` variants take sorted, deduplicated token lists produced by
//! [`Tokenizer::tokenize_unique`], so a caller with its own tokenizer can
//! tokenize once and reuse the tokens. An empty token list on either side
//! scores 0.0.
//!
//! Window scoring compares char slices of the probe string directly rather
//! than allocating a `String` per window.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::algorithms::ratio::{character_ratio, character_ratio_chars};
use crate::error::SearchError;
use crate::tokenize::{sorted_intersect, stringify_tokens, Tokenizer};

/// Character ratio of the two strings, with no tokenization.
///
/// Meant for single-word against single-word comparisons.
///
/// # Examples
/// ```
/// use fuzzyrank::matchers::simple_ratio;
/// assert_eq!(simple_ratio("ciao", "ciaone"), 0.8);
/// ```
#[must_use]
pub fn simple_ratio(query: &str, string: &str) -> f64 {
    character_ratio(query, string)
}

/// Best window score of any query token against the string's tokens.
///
/// The string's tokens are concatenated into one probe; each query token is
/// slid across the probe in windows of its own length.
///
/// # Examples
/// ```
/// use fuzzyrank::matchers::best_token_ratio;
/// assert_eq!(best_token_ratio("yankees", "new york yankees"), 1.0);
/// ```
#[must_use]
pub fn best_token_ratio(query: &str, string: &str) -> f64 {
    let tokenizer = Tokenizer::default();
    best_token_ratio_tokens(&tokenizer.tokenize_unique(query), &tokenizer.tokenize_unique(string))
}

/// [`best_token_ratio`] over pre-tokenized input.
#[must_use]
pub fn best_token_ratio_tokens(query: &[String], string: &[String]) -> f64 {
    if query.is_empty() || string.is_empty() {
        return 0.0;
    }

    let probe: Vec<char> = stringify_tokens(string).chars().collect();
    let mut best = 0.0f64;
    for token in query {
        best = best.max(best_window_ratio(token, &probe));
        if best == 1.0 {
            break; // Can't do better than perfect match
        }
    }
    best
}

/// Mean window score over all query tokens.
///
/// Same windows as [`best_token_ratio`], but every query token has to match
/// well for the score to be high.
///
/// # Examples
/// ```
/// use fuzzyrank::matchers::token_sort_ratio;
/// assert_eq!(token_sort_ratio("new york", "new york mets"), 1.0);
/// assert!(token_sort_ratio("new york", "new jersey nets") < 1.0);
/// ```
#[must_use]
pub fn token_sort_ratio(query: &str, string: &str) -> f64 {
    let tokenizer = Tokenizer::default();
    token_sort_ratio_tokens(&tokenizer.tokenize_unique(query), &tokenizer.tokenize_unique(string))
}

/// [`token_sort_ratio`] over pre-tokenized input.
#[must_use]
pub fn token_sort_ratio_tokens(query: &[String], string: &[String]) -> f64 {
    if query.is_empty() || string.is_empty() {
        return 0.0;
    }

    let probe: Vec<char> = stringify_tokens(string).chars().collect();
    let total: f64 = query.iter().map(|token| best_window_ratio(token, &probe)).sum();
    total / query.len() as f64
}

/// Set-based comparison of shared and leftover tokens.
///
/// Builds `t0` from the sorted intersection, `t1 = t0 + query-only tokens`
/// and `t2 = t0 + string-only tokens`, then returns the best pairwise
/// character ratio among the three. Word order and repeated words don't
/// matter.
///
/// # Examples
/// ```
/// use fuzzyrank::matchers::intersect_token_ratio;
/// let score = intersect_token_ratio(
///     "new york mets vs atlanta braves",
///     "atlanta braves vs new york mets",
/// );
/// assert_eq!(score, 1.0);
/// ```
#[must_use]
pub fn intersect_token_ratio(query: &str, string: &str) -> f64 {
    let tokenizer = Tokenizer::default();
    intersect_token_ratio_tokens(&tokenizer.tokenize_unique(query), &tokenizer.tokenize_unique(string))
}

/// [`intersect_token_ratio`] over pre-tokenized input.
#[must_use]
pub fn intersect_token_ratio_tokens(query: &[String], string: &[String]) -> f64 {
    if query.is_empty() || string.is_empty() {
        return 0.0;
    }

    let (common, query_only, string_only) = sorted_intersect(query, string);

    let intersection = stringify_tokens(&common);
    let with_query = format!("{}{}", intersection, stringify_tokens(&query_only));
    let with_string = format!("{}{}", intersection, stringify_tokens(&string_only));

    character_ratio(&intersection, &with_query)
        .max(character_ratio(&intersection, &with_string))
        .max(character_ratio(&with_query, &with_string))
}

/// Pick a matcher from the token counts of the two sides and apply it.
///
/// With `short`/`long` the smaller/larger unique token count:
/// - both sides one token: [`simple_ratio`]
/// - `short <= 1` and `long < 4`: [`best_token_ratio`]
/// - `short < 3` and `long < 5`: [`token_sort_ratio`]
/// - otherwise: [`intersect_token_ratio`]
///
/// # Examples
/// ```
/// use fuzzyrank::matchers::{lazy_match, best_token_ratio};
/// let (query, string) = ("mets", "new york mets");
/// assert_eq!(lazy_match(query, string), best_token_ratio(query, string));
/// ```
#[must_use]
pub fn lazy_match(query: &str, string: &str) -> f64 {
    let tokenizer = Tokenizer::default();
    lazy_match_tokens(&tokenizer.tokenize_unique(query), &tokenizer.tokenize_unique(string))
}

/// [`lazy_match`] over pre-tokenized input.
#[must_use]
pub fn lazy_match_tokens(query: &[String], string: &[String]) -> f64 {
    if query.is_empty() || string.is_empty() {
        return 0.0;
    }

    let short = query.len().min(string.len());
    let long = query.len().max(string.len());

    if short == 1 && long == 1 {
        simple_ratio(&query[0], &string[0])
    } else if short <= 1 && long < 4 {
        best_token_ratio_tokens(query, string)
    } else if short < 3 && long < 5 {
        token_sort_ratio_tokens(query, string)
    } else {
        intersect_token_ratio_tokens(query, string)
    }
}

/// Best character ratio of `token` against any same-length window of
/// `probe`. A token at least as long as the probe is compared to the whole
/// probe.
fn best_window_ratio(token: &str, probe: &[char]) -> f64 {
    let token_chars: SmallVec<[char; 32]> = token.chars().collect();
    let width = token_chars.len();

    if width == 0 || width >= probe.len() {
        return character_ratio_chars(&token_chars, probe);
    }

    let mut best = 0.0f64;
    for window in probe.windows(width) {
        best = best.max(character_ratio_chars(&token_chars, window));
        if best == 1.0 {
            break;
        }
    }
    best
}

/// User-supplied matcher: `(query, value) -> score`.
///
/// Receives the lowercased query and attribute value. Scores outside
/// [0, 1] are clamped.
pub type MatcherFn = Arc<dyn Fn(&str, &str) -> f64 + Send + Sync>;

/// Whole-value matcher selection.
#[derive(Clone)]
pub enum MatcherStrategy {
    SimpleRatio,
    BestTokenRatio,
    TokenSortRatio,
    IntersectTokenRatio,
    Lazy,
    Custom(MatcherFn),
}

impl MatcherStrategy {
    /// Accepted names, for error messages
    pub const VALID_NAMES: &'static str =
        "simple_ratio, best_token_ratio, token_sort_ratio, intersect_token_ratio, lazy";

    /// Wrap a closure as a matcher strategy.
    pub fn custom<F>(matcher: F) -> Self
    where
        F: Fn(&str, &str) -> f64 + Send + Sync + 'static,
    {
        MatcherStrategy::Custom(Arc::new(matcher))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MatcherStrategy::SimpleRatio => "simple_ratio",
            MatcherStrategy::BestTokenRatio => "best_token_ratio",
            MatcherStrategy::TokenSortRatio => "token_sort_ratio",
            MatcherStrategy::IntersectTokenRatio => "intersect_token_ratio",
            MatcherStrategy::Lazy => "lazy",
            MatcherStrategy::Custom(_) => "custom",
        }
    }

    /// Score `string` against `query`, tokenizing both with `tokenizer`.
    #[must_use]
    pub fn score(&self, tokenizer: &Tokenizer, query: &str, string: &str) -> f64 {
        let query = query.to_lowercase();
        let string = string.to_lowercase();
        self.score_prepared(
            &query,
            &tokenizer.tokenize_unique(&query),
            &string,
            &tokenizer.tokenize_unique(&string),
        )
    }

    /// Score with both sides already lowercased and tokenized.
    pub(crate) fn score_prepared(
        &self,
        query: &str,
        query_tokens: &[String],
        string: &str,
        string_tokens: &[String],
    ) -> f64 {
        match self {
            MatcherStrategy::SimpleRatio => {
                if query_tokens.is_empty() || string_tokens.is_empty() {
                    0.0
                } else {
                    simple_ratio(query, string)
                }
            }
            MatcherStrategy::BestTokenRatio => best_token_ratio_tokens(query_tokens, string_tokens),
            MatcherStrategy::TokenSortRatio => token_sort_ratio_tokens(query_tokens, string_tokens),
            MatcherStrategy::IntersectTokenRatio => {
                intersect_token_ratio_tokens(query_tokens, string_tokens)
            }
            MatcherStrategy::Lazy => lazy_match_tokens(query_tokens, string_tokens),
            MatcherStrategy::Custom(matcher) => {
                let score = matcher(query, string);
                if score.is_finite() {
                    score.clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
        }
    }
}

impl fmt::Debug for MatcherStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatcherStrategy({})", self.name())
    }
}

impl FromStr for MatcherStrategy {
    type Err = SearchError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().replace(' ', "_").as_str() {
            "simple_ratio" | "ratio" => Ok(MatcherStrategy::SimpleRatio),
            "best_token_ratio" => Ok(MatcherStrategy::BestTokenRatio),
            "token_sort_ratio" => Ok(MatcherStrategy::TokenSortRatio),
            "intersect_token_ratio" => Ok(MatcherStrategy::IntersectTokenRatio),
            "lazy" | "lazy_match" => Ok(MatcherStrategy::Lazy),
            _ => Err(SearchError::UnknownMatcher {
                name: name.to_string(),
                valid: Self::VALID_NAMES.to_string(),
            }),
        }
    }
}
