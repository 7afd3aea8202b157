//! Word tokenization
//!
//! Splits strings into lowercased word tokens before comparison. The same
//! tokenizer must be used for the query and for every candidate value,
//! otherwise token scores are not comparable.

use serde::{Deserialize, Serialize};

/// Default minimum token length (in characters).
pub const DEFAULT_MIN_LENGTH: usize = 2;

/// Stop-words dropped by [`Tokenizer::strict`].
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "in", "is", "it", "of",
    "on", "or", "the", "to", "was", "which", "would",
];

/// Splits text into normalized word tokens.
///
/// A word is a maximal run of alphanumeric characters or `_`; everything
/// else is a separator. Tokens are lowercased, then dropped when shorter
/// than `min_length` characters or listed in `stop_words`.
///
/// # Example
/// ```
/// use fuzzyrank::tokenize::Tokenizer;
///
/// let tokenizer = Tokenizer::default();
/// assert_eq!(tokenizer.tokenize("Hello, World!"), vec!["hello", "world"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tokenizer {
    /// Tokens with fewer characters than this are discarded
    pub min_length: usize,
    /// Lowercase words discarded after splitting
    pub stop_words: Vec<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            stop_words: Vec::new(),
        }
    }
}

impl Tokenizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggressive preset: words of four or more characters, English
    /// stop-words removed. Suited to long free-text attributes.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
            .with_min_length(4)
            .with_stop_words(ENGLISH_STOP_WORDS.iter().copied())
    }

    #[must_use]
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Replace the stop-word list. Words are lowercased on the way in.
    #[must_use]
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Tokenize `text`, preserving the order in which words appear.
    ///
    /// Duplicates are kept. An empty or all-separator input yields an empty
    /// vector.
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !is_word_char(c))
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .filter(|token| self.keep(token))
            .collect()
    }

    /// Tokenize `text` into a sorted, deduplicated token list.
    #[must_use]
    pub fn tokenize_unique(&self, text: &str) -> Vec<String> {
        let mut tokens = self.tokenize(text);
        tokens.sort_unstable();
        tokens.dedup();
        tokens
    }

    fn keep(&self, token: &str) -> bool {
        token.chars().count() >= self.min_length && !self.stop_words.iter().any(|w| w == token)
    }
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Concatenate tokens into one probe string, without separators.
#[must_use]
pub fn stringify_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens.iter().map(AsRef::as_ref).collect()
}

/// Split two token lists into their sorted intersection and the sorted
/// remainders of each side.
///
/// Returns `(common, query_only, string_only)`. Inputs are expected to be
/// deduplicated (see [`Tokenizer::tokenize_unique`]).
#[must_use]
pub fn sorted_intersect(query: &[String], string: &[String]) -> (Vec<String>, Vec<String>, Vec<String>) {
    let mut common: Vec<String> = query.iter().filter(|t| string.contains(t)).cloned().collect();
    let mut query_only: Vec<String> = query.iter().filter(|t| !common.contains(t)).cloned().collect();
    let mut string_only: Vec<String> = string.iter().filter(|t| !common.contains(t)).cloned().collect();

    common.sort_unstable();
    query_only.sort_unstable();
    string_only.sort_unstable();

    (common, query_only, string_only)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let tokenizer = Tokenizer::default();
        assert_eq!(
            tokenizer.tokenize("Sherlock Holmes, the detective!"),
            vec!["sherlock", "holmes", "the", "detective"]
        );
    }

    #[test]
    fn test_tokenize_drops_short_tokens() {
        let tokenizer = Tokenizer::default();
        // "a" and "I" are below the default minimum of 2
        assert_eq!(tokenizer.tokenize("I am a baker"), vec!["am", "baker"]);
        // three-character names survive
        assert_eq!(tokenizer.tokenize("Jon Doe"), vec!["jon", "doe"]);
    }

    #[test]
    fn test_tokenize_strict_preset() {
        let tokenizer = Tokenizer::strict();
        assert_eq!(
            tokenizer.tokenize("This is a string, and should be tokenized! 123"),
            vec!["this", "string", "should", "tokenized"]
        );
    }

    #[test]
    fn test_tokenize_stop_words_are_case_insensitive() {
        let tokenizer = Tokenizer::default().with_stop_words(["The", "OF"]);
        assert_eq!(
            tokenizer.tokenize("The Hound of the Baskervilles"),
            vec!["hound", "baskervilles"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        let tokenizer = Tokenizer::default();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("  ,;!  ").is_empty());
        assert!(tokenizer.tokenize_unique("").is_empty());
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let tokenizer = Tokenizer::default();
        let text = "new york mets vs atlanta braves";
        assert_eq!(tokenizer.tokenize(text), tokenizer.tokenize(text));
    }

    #[test]
    fn test_tokenize_unique_sorted() {
        let tokenizer = Tokenizer::default();
        assert_eq!(
            tokenizer.tokenize_unique("there there fishes hello"),
            vec!["fishes", "hello", "there"]
        );
    }

    #[test]
    fn test_underscore_is_word_char() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.tokenize("first_name:last-name"), vec!["first_name", "last", "name"]);
    }

    #[test]
    fn test_stringify_tokens() {
        assert_eq!(stringify_tokens(&["new", "york"]), "newyork");
        assert_eq!(stringify_tokens::<&str>(&[]), "");
    }

    #[test]
    fn test_sorted_intersect() {
        let query: Vec<String> = vec!["mets".into(), "new".into(), "york".into()];
        let string: Vec<String> = vec!["new".into(), "york".into(), "yankees".into()];
        let (common, query_only, string_only) = sorted_intersect(&query, &string);
        assert_eq!(common, vec!["new", "york"]);
        assert_eq!(query_only, vec!["mets"]);
        assert_eq!(string_only, vec!["yankees"]);
    }
}
