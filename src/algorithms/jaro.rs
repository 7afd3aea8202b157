//! Jaro and Jaro-Winkler similarity implementations
//!
//! Jaro-Winkler gives extra weight to common prefixes, which suits names
//! and short words. The long-tolerance variant adds a further correction
//! for longer strings that share most of their characters.
//!
//! ASCII inputs are compared as bytes; anything else goes through a
//! `char` buffer.

use super::Similarity;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Jaro-Winkler similarity calculator
///
/// # Parameters
/// - `prefix_weight`: boost per shared prefix character (clamped to 0.0-0.25)
/// - `max_prefix_length`: longest prefix considered (typically 4)
/// - `boost_threshold`: Jaro score above which the prefix boost applies
/// - `long_tolerance`: apply the long-string correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JaroWinkler {
    pub prefix_weight: f64,
    pub max_prefix_length: usize,
    pub boost_threshold: f64,
    pub long_tolerance: bool,
}

impl Default for JaroWinkler {
    /// Long-tolerant Jaro-Winkler, the engine's default token scorer.
    fn default() -> Self {
        Self {
            prefix_weight: 0.1,
            max_prefix_length: 4,
            boost_threshold: 0.7,
            long_tolerance: true,
        }
    }
}

impl JaroWinkler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Textbook Jaro-Winkler without the long-string correction.
    #[must_use]
    pub fn standard() -> Self {
        Self::default().with_long_tolerance(false)
    }

    #[must_use]
    pub fn with_prefix_weight(mut self, weight: f64) -> Self {
        // Max 0.25 to keep score <= 1.0
        self.prefix_weight = weight.clamp(0.0, 0.25);
        self
    }

    #[must_use]
    pub fn with_max_prefix_length(mut self, length: usize) -> Self {
        self.max_prefix_length = length;
        self
    }

    #[must_use]
    pub fn with_long_tolerance(mut self, enabled: bool) -> Self {
        self.long_tolerance = enabled;
        self
    }

    /// Score `a` against `b`.
    #[must_use]
    pub fn score(&self, a: &str, b: &str) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        if a == b {
            return 1.0;
        }

        if a.is_ascii() && b.is_ascii() {
            self.score_slices(a.as_bytes(), b.as_bytes(), |c: u8| c.is_ascii_digit())
        } else {
            let a_chars: SmallVec<[char; 64]> = a.chars().collect();
            let b_chars: SmallVec<[char; 64]> = b.chars().collect();
            self.score_slices(&a_chars, &b_chars, |c: char| c.is_numeric())
        }
    }

    fn score_slices<T: PartialEq + Copy>(&self, a: &[T], b: &[T], is_digit: impl Fn(T) -> bool) -> f64 {
        let Some(counts) = jaro_counts(a, b) else {
            return 0.0;
        };
        let mut weight = counts.jaro(a.len(), b.len());

        if weight <= self.boost_threshold {
            return weight;
        }

        let min_len = a.len().min(b.len());
        let prefix_weight = self.prefix_weight.clamp(0.0, 0.25);
        let prefix = a
            .iter()
            .zip(b.iter())
            .take(self.max_prefix_length.min(min_len))
            .take_while(|(x, y)| x == y)
            .count();

        weight += prefix as f64 * prefix_weight * (1.0 - weight);

        let common = counts.matches;
        if self.long_tolerance
            && min_len > 4
            && common > prefix + 1
            && 2 * common >= min_len + prefix
            && !is_digit(a[0])
        {
            let numerator = (common - prefix - 1) as f64;
            let denominator = (a.len() + b.len() - 2 * prefix + 2) as f64;
            weight += (1.0 - weight) * numerator / denominator;
        }

        weight
    }
}

impl Similarity for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self.score(a, b)
    }

    fn name(&self) -> &'static str {
        "jaro_winkler"
    }
}

/// Matched characters and half-transpositions found by the Jaro scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct JaroCounts {
    matches: usize,
    transpositions: usize,
}

impl JaroCounts {
    fn jaro(&self, a_len: usize, b_len: usize) -> f64 {
        let m = self.matches as f64;
        let t = (self.transpositions / 2) as f64;
        (m / a_len as f64 + m / b_len as f64 + (m - t) / m) / 3.0
    }
}

/// Run the Jaro matching scan. Returns `None` when nothing matches.
fn jaro_counts<T: PartialEq>(a: &[T], b: &[T]) -> Option<JaroCounts> {
    let a_len = a.len();
    let b_len = b.len();
    if a_len == 0 || b_len == 0 {
        return None;
    }

    // Match window
    let match_distance = (a_len.max(b_len) / 2).saturating_sub(1);

    let mut a_matched: SmallVec<[bool; 64]> = smallvec::smallvec![false; a_len];
    let mut b_matched: SmallVec<[bool; 64]> = smallvec::smallvec![false; b_len];

    let mut matches = 0usize;
    for i in 0..a_len {
        let start = i.saturating_sub(match_distance);
        let end = (i + match_distance + 1).min(b_len);

        for j in start..end {
            if b_matched[j] || a[i] != b[j] {
                continue;
            }
            a_matched[i] = true;
            b_matched[j] = true;
            matches += 1;
            break;
        }
    }

    if matches == 0 {
        return None;
    }

    let mut transpositions = 0usize;
    let mut k = 0usize;
    for i in 0..a_len {
        if !a_matched[i] {
            continue;
        }
        while k < b_len && !b_matched[k] {
            k += 1;
        }
        if k >= b_len {
            break;
        }
        if a[i] != b[k] {
            transpositions += 1;
        }
        k += 1;
    }

    Some(JaroCounts {
        matches,
        transpositions,
    })
}

/// Calculate Jaro similarity between two strings.
/// Returns a value between 0.0 and 1.0; either side empty scores 0.0.
#[must_use]
pub fn jaro_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    if a.is_ascii() && b.is_ascii() {
        jaro_counts(a.as_bytes(), b.as_bytes()).map_or(0.0, |c| c.jaro(a.len(), b.len()))
    } else {
        let a_chars: SmallVec<[char; 64]> = a.chars().collect();
        let b_chars: SmallVec<[char; 64]> = b.chars().collect();
        jaro_counts(&a_chars, &b_chars).map_or(0.0, |c| c.jaro(a_chars.len(), b_chars.len()))
    }
}

/// Textbook Jaro-Winkler (prefix weight 0.1, prefix up to 4).
#[must_use]
pub fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
    JaroWinkler::standard().score(a, b)
}

/// Prefix-weighted similarity with long-string tolerance.
///
/// Jaro-Winkler as above, plus a correction that lifts long strings
/// sharing most of their characters (`"inconvene"` against
/// `"inconvenience"`). Normalized to [0, 1]; identical non-empty strings
/// score 1.0.
///
/// # Examples
/// ```
/// use fuzzyrank::algorithms::jaro::approx_string_similarity;
/// assert_eq!(approx_string_similarity("watson", "watson"), 1.0);
/// assert!(approx_string_similarity("jon", "john") > 0.9);
/// ```
#[must_use]
pub fn approx_string_similarity(a: &str, b: &str) -> f64 {
    JaroWinkler::default().score(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_jaro_basic() {
        assert!(approx_eq(jaro_similarity("", ""), 0.0));
        assert!(approx_eq(jaro_similarity("abc", "abc"), 1.0));
        assert!(approx_eq(jaro_similarity("abc", "xyz"), 0.0));
    }

    #[test]
    fn test_jaro_examples() {
        assert!(approx_eq(jaro_similarity("MARTHA", "MARHTA"), 0.944));
        assert!(approx_eq(jaro_similarity("DWAYNE", "DUANE"), 0.822));
    }

    #[test]
    fn test_jaro_winkler_examples() {
        assert!(approx_eq(jaro_winkler_similarity("MARTHA", "MARHTA"), 0.961));
        assert!(approx_eq(jaro_winkler_similarity("DWAYNE", "DUANE"), 0.84));
    }

    #[test]
    fn test_jaro_winkler_boost() {
        let jaro = jaro_similarity("MARTHA", "MARHTA");
        let jaro_winkler = jaro_winkler_similarity("MARTHA", "MARHTA");
        assert!(jaro_winkler > jaro);
    }

    #[test]
    fn test_no_boost_below_threshold() {
        // "ab" vs "ac": jaro 0.667, below 0.7, so the shared "a" adds nothing
        assert!(approx_eq(jaro_winkler_similarity("ab", "ac"), jaro_similarity("ab", "ac")));
    }

    #[test]
    fn test_long_tolerance_lifts_long_strings() {
        let standard = jaro_winkler_similarity("inconvene", "inconvenience");
        let tolerant = approx_string_similarity("inconvene", "inconvenience");
        assert!(approx_eq(standard, 0.9385));
        assert!(approx_eq(tolerant, 0.9538));
    }

    #[test]
    fn test_long_tolerance_ignores_short_strings() {
        assert!(approx_eq(
            approx_string_similarity("jon", "john"),
            jaro_winkler_similarity("jon", "john")
        ));
    }

    #[test]
    fn test_self_similarity() {
        for word in ["a", "sherlock", "inconvenience", "caf\u{00e9}"] {
            assert_eq!(approx_string_similarity(word, word), 1.0);
        }
    }

    #[test]
    fn test_empty_side_is_zero() {
        assert_eq!(approx_string_similarity("", "holmes"), 0.0);
        assert_eq!(approx_string_similarity("holmes", ""), 0.0);
    }

    #[test]
    fn test_unicode_path_matches_ascii_path() {
        let unicode = approx_string_similarity("caf\u{00e9}s", "caf\u{00e9}");
        let ascii = approx_string_similarity("cafes", "cafe");
        assert!(approx_eq(unicode, ascii));
    }

    #[test]
    fn test_scores_in_unit_range() {
        let pairs = [("dixon", "dicksonx"), ("jellyfish", "smellyfish"), ("a", "b")];
        for (a, b) in pairs {
            let score = approx_string_similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "{a} vs {b} = {score}");
        }
    }
}
