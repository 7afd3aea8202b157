//! Search lifecycle hooks
//!
//! An observer is told what the engine is doing but can't change it: every
//! method takes shared references and returns nothing.

use tracing::{debug, trace};

use super::scoring::Match;

/// Receives notifications while a search runs.
///
/// All methods default to no-ops. With parallel scoring,
/// `on_item_scored` is called from rayon worker threads in no particular
/// order.
pub trait SearchObserver: Send + Sync {
    fn on_search_started(&self, _query: &str, _items: usize) {}

    /// Called for every item, valid or not
    fn on_item_scored(&self, _index: usize, _matched: &Match) {}

    /// Called for every result returned, in ranking order
    fn on_result_accepted(&self, _index: usize, _matched: &Match) {}

    fn on_search_finished(&self, _results: usize) {}
}

/// Forwards search events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_search_started(&self, query: &str, items: usize) {
        debug!(query, items, "Search started");
    }

    fn on_item_scored(&self, index: usize, matched: &Match) {
        trace!(
            index,
            key = matched.winning_key.as_deref().unwrap_or(""),
            score = matched.score,
            weight = matched.weight,
            valid = matched.is_valid(),
            "Item scored"
        );
    }

    fn on_result_accepted(&self, index: usize, matched: &Match) {
        debug!(
            index,
            key = matched.winning_key.as_deref().unwrap_or(""),
            score = matched.score,
            weight = matched.weight,
            "Result accepted"
        );
    }

    fn on_search_finished(&self, results: usize) {
        debug!(results, "Search finished");
    }
}
