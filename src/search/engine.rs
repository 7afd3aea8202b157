//! Main SearchEngine implementation
//!
//! Ranks in-memory items against a free-text query:
//!
//! 1. resolve the configuration (all errors happen here)
//! 2. tokenize the query once
//! 3. score every configured attribute of every item into a [`Match`]
//! 4. drop invalid matches
//! 5. sort by aggregate weight descending, ties by input position
//! 6. truncate to the limit

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::config::{Scorer, SearchConfig, SearchOptions, SearchPlan, WeightPolicy};
use super::observer::SearchObserver;
use super::record::Searchable;
use super::scoring::{Match, MatchAccumulator, Observation};
use crate::algorithms::DistanceAlgorithm;
use crate::error::Result;
use crate::matchers::MatcherStrategy;
use crate::tokenize::Tokenizer;
use crate::PARALLEL_THRESHOLD;

/// One ranked item.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<'a, T> {
    /// The matched item
    pub item: &'a T,

    /// Position of the item in the searched slice
    pub index: usize,

    /// How the item matched
    pub matched: Match,
}

impl<T> SearchResult<'_, T> {
    pub fn score(&self) -> f64 {
        self.matched.score
    }

    pub fn weight(&self) -> f64 {
        self.matched.weight
    }
}

/// Summary of one result from the most recent search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub index: usize,
    pub key: String,
    pub score: f64,
    pub weight: f64,
}

impl<T> From<&SearchResult<'_, T>> for ResultSummary {
    fn from(result: &SearchResult<'_, T>) -> Self {
        Self {
            index: result.index,
            key: result.matched.winning_key.clone().unwrap_or_default(),
            score: result.matched.score,
            weight: result.matched.weight,
        }
    }
}

/// Fuzzy ranking engine over in-memory items.
///
/// The configuration is read-only once built; per-call changes go through
/// [`SearchOptions`].
///
/// # Example
///
/// ```rust
/// use fuzzyrank::search::record::Record;
/// use fuzzyrank::SearchEngine;
///
/// let people = vec![
///     Record::new().with_field("fname", "John").with_field("lname", "Doe"),
///     Record::new().with_field("fname", "Mary").with_field("lname", "Smith"),
/// ];
///
/// let engine = SearchEngine::with_keys(["fname", "lname"]);
/// let results = engine.search("jon", &people).unwrap();
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].index, 0);
/// ```
pub struct SearchEngine {
    config: SearchConfig,
    scorer: Option<Scorer>,
    observer: Option<Arc<dyn SearchObserver>>,
    last_results: RwLock<Vec<ResultSummary>>,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            scorer: None,
            observer: None,
            last_results: RwLock::new(Vec::new()),
        }
    }

    /// Engine with default settings over `keys`, most important first.
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(SearchConfig::new(keys))
    }

    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.config.limit = limit;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.config.weights = Some(weights);
        self
    }

    #[must_use]
    pub fn with_weight_policy(mut self, policy: WeightPolicy) -> Self {
        self.config.weight_policy = policy;
        self
    }

    /// Score token against token with `algorithm`.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: DistanceAlgorithm) -> Self {
        self.scorer = Some(Scorer::Tokens(algorithm));
        self
    }

    /// Score whole attribute values with `strategy`.
    #[must_use]
    pub fn with_matcher(mut self, strategy: MatcherStrategy) -> Self {
        self.scorer = Some(Scorer::Strategy(strategy));
        self
    }

    #[must_use]
    pub fn with_scorer(mut self, scorer: impl Into<Scorer>) -> Self {
        self.scorer = Some(scorer.into());
        self
    }

    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.config.tokenizer = tokenizer;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Rank `items` against `query` with the stored configuration.
    pub fn search<'a, T>(&self, query: &str, items: &'a [T]) -> Result<Vec<SearchResult<'a, T>>>
    where
        T: Searchable + Sync,
    {
        self.search_by(query, items, &SearchOptions::default(), searchable_attribute::<T>)
    }

    /// Rank `items` with call-local overrides.
    pub fn search_with<'a, T>(
        &self,
        query: &str,
        items: &'a [T],
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult<'a, T>>>
    where
        T: Searchable + Sync,
    {
        self.search_by(query, items, options, searchable_attribute::<T>)
    }

    /// Like [`SearchEngine::search`], returning only the items.
    pub fn find<'a, T>(&self, query: &str, items: &'a [T]) -> Result<Vec<&'a T>>
    where
        T: Searchable + Sync,
    {
        self.find_with(query, items, &SearchOptions::default())
    }

    pub fn find_with<'a, T>(
        &self,
        query: &str,
        items: &'a [T],
        options: &SearchOptions,
    ) -> Result<Vec<&'a T>>
    where
        T: Searchable + Sync,
    {
        Ok(self
            .search_with(query, items, options)?
            .into_iter()
            .map(|result| result.item)
            .collect())
    }

    /// Rank `items`, reading attributes through `accessor`.
    ///
    /// For item types that don't implement [`Searchable`].
    ///
    /// # Errors
    ///
    /// Any configuration error, before a single item is scored.
    pub fn search_by<'a, T, F>(
        &self,
        query: &str,
        items: &'a [T],
        options: &SearchOptions,
        accessor: F,
    ) -> Result<Vec<SearchResult<'a, T>>>
    where
        T: Sync,
        F: for<'x> Fn(&'x T, &str) -> Option<&'x str> + Sync,
    {
        let plan = self.config.resolve(options, self.scorer.as_ref())?;
        let observer = self.observer.as_deref();

        let query_text = query.to_lowercase();
        let query_tokens = plan.tokenizer.tokenize_unique(&query_text);

        debug!(
            query,
            items = items.len(),
            keys = ?plan.keys,
            scorer = plan.scorer.name(),
            threshold = plan.threshold,
            "Searching"
        );
        if let Some(observer) = observer {
            observer.on_search_started(query, items.len());
        }

        let score = |(index, item): (usize, &'a T)| -> Option<SearchResult<'a, T>> {
            let matched = score_item(&plan, &query_text, &query_tokens, item, &accessor);
            trace!(
                index,
                score = matched.score,
                weight = matched.weight,
                valid = matched.is_valid(),
                "Scored item"
            );
            if let Some(observer) = observer {
                observer.on_item_scored(index, &matched);
            }
            matched.is_valid().then_some(SearchResult {
                item,
                index,
                matched,
            })
        };

        // Both paths keep input order; the sort below breaks ties on it
        let mut results: Vec<SearchResult<'a, T>> =
            if plan.parallel && items.len() >= PARALLEL_THRESHOLD {
                items.par_iter().enumerate().filter_map(&score).collect()
            } else {
                items.iter().enumerate().filter_map(&score).collect()
            };

        results.sort_by(|a, b| {
            b.matched
                .weight
                .total_cmp(&a.matched.weight)
                .then(a.index.cmp(&b.index))
        });

        if let Some(limit) = plan.limit {
            results.truncate(limit);
        }

        if let Some(observer) = observer {
            for result in &results {
                observer.on_result_accepted(result.index, &result.matched);
            }
            observer.on_search_finished(results.len());
        }

        *self.last_results.write() = results.iter().map(ResultSummary::from).collect();

        debug!(results = results.len(), "Search finished");
        Ok(results)
    }

    /// Summaries of the most recent search's results.
    ///
    /// Overwritten by every successful search; searches never read it.
    pub fn last_results(&self) -> Vec<ResultSummary> {
        self.last_results.read().clone()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchEngine")
            .field("config", &self.config)
            .field("scorer", &self.scorer)
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

fn searchable_attribute<'x, T: Searchable>(item: &'x T, key: &str) -> Option<&'x str> {
    item.attribute(key)
}

/// Score every configured attribute of one item.
fn score_item<T, F>(
    plan: &SearchPlan,
    query_text: &str,
    query_tokens: &[String],
    item: &T,
    accessor: &F,
) -> Match
where
    F: for<'x> Fn(&'x T, &str) -> Option<&'x str>,
{
    let mut accumulator = MatchAccumulator::new(plan.threshold);

    for (key, &weight) in plan.keys.iter().zip(&plan.weights) {
        // Missing and blank attributes don't count against the item
        let Some(value) = accessor(item, key) else {
            continue;
        };
        if value.trim().is_empty() {
            continue;
        }

        let value = value.to_lowercase();
        let candidates = plan.tokenizer.tokenize_unique(&value);

        match &plan.scorer {
            Scorer::Tokens(algorithm) => {
                for candidate in &candidates {
                    for query_token in query_tokens {
                        accumulator.add(Observation {
                            key,
                            weight,
                            query_token,
                            candidate,
                            score: algorithm.similarity(query_token, candidate),
                        });
                    }
                }
            }
            Scorer::Strategy(strategy) => {
                let score = strategy.score_prepared(query_text, query_tokens, &value, &candidates);
                accumulator.add(Observation {
                    key,
                    weight,
                    query_token: query_text,
                    candidate: &value,
                    score,
                });
            }
        }
    }

    accumulator.finalize()
}
