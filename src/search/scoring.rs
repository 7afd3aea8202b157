//! Per-item aggregation of similarity observations
//!
//! A [`MatchAccumulator`] collects every `(attribute, candidate token, score)`
//! observation for one item, then [`MatchAccumulator::finalize`] folds them
//! into a single [`Match`]:
//!
//! 1. per attribute key, take the best score of each distinct candidate value
//! 2. sort those maxima ascending and take their rank-weighted mean
//!    (rank 1 for the lowest), so the strongest values dominate
//! 3. the winner is the key with the highest such score
//! 4. the aggregate weight is the weighted average of all key scores plus
//!    the winner's score
//!
//! `finalize` consumes the accumulator, so a finalized match can't be added
//! to and an unfinalized one can't be read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One similarity measurement between a query token and a candidate token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation<'a> {
    /// Attribute the candidate came from
    pub key: &'a str,
    /// Scaled weight of that attribute
    pub weight: f64,
    pub query_token: &'a str,
    pub candidate: &'a str,
    /// Similarity in [0, 1]
    pub score: f64,
}

/// Final score of one attribute key within a [`Match`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyScore {
    /// Attribute key
    pub key: String,

    /// Rank-weighted score (0.0 - 1.0)
    pub score: f64,

    /// Attribute weight
    pub weight: f64,
}

impl KeyScore {
    pub fn new(key: impl Into<String>, score: f64, weight: f64) -> Self {
        Self {
            key: key.into(),
            score: score.clamp(0.0, 1.0),
            weight: weight.max(0.0),
        }
    }

    /// Get the weighted score (score × weight)
    pub fn weighted_score(&self) -> f64 {
        self.score * self.weight
    }
}

/// Aggregate result of scoring one item against the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Attribute key with the highest score, if anything was observed
    pub winning_key: Option<String>,

    /// Score of the winning key (0.0 - 1.0)
    pub score: f64,

    /// Ranking weight: weighted key average plus the winning score
    pub weight: f64,

    /// Threshold the winning score is judged against
    pub threshold: f64,

    /// Per-key scores, in the order keys were first observed
    pub breakdown: Vec<KeyScore>,
}

impl Match {
    /// Match with no observations: zero score, zero weight, never valid.
    pub fn empty(threshold: f64) -> Self {
        Self {
            winning_key: None,
            score: 0.0,
            weight: 0.0,
            threshold,
            breakdown: Vec::new(),
        }
    }

    /// Whether the winning score reaches the threshold.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.winning_key.is_some() && self.score >= self.threshold
    }

    /// Score recorded for `key`, if it had any observations.
    pub fn key_score(&self, key: &str) -> Option<f64> {
        self.breakdown
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.score)
    }
}

#[derive(Debug)]
struct KeyEntry {
    key: String,
    weight: f64,
    /// candidate value -> every score it received
    values: BTreeMap<String, SmallVec<[f64; 4]>>,
}

impl KeyEntry {
    /// Rank-weighted mean of the per-value maxima.
    fn score(&self) -> f64 {
        let mut maxima: SmallVec<[f64; 16]> = self
            .values
            .values()
            .map(|scores| scores.iter().copied().fold(0.0f64, f64::max))
            .collect();
        maxima.sort_by(f64::total_cmp);

        let mut weighted = 0.0;
        let mut ranks = 0.0;
        for (rank, score) in maxima.iter().enumerate() {
            let rank = (rank + 1) as f64;
            weighted += rank * score;
            ranks += rank;
        }

        if ranks > 0.0 {
            weighted / ranks
        } else {
            0.0
        }
    }
}

/// Collects observations for one item.
///
/// Owned by a single scoring pass and discarded once finalized.
#[derive(Debug)]
pub struct MatchAccumulator {
    threshold: f64,
    keys: Vec<KeyEntry>,
}

impl MatchAccumulator {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            keys: Vec::new(),
        }
    }

    /// Record one observation.
    ///
    /// The first observation of a key fixes its weight and its position in
    /// the breakdown.
    pub fn add(&mut self, observation: Observation<'_>) {
        let position = match self.keys.iter().position(|entry| entry.key == observation.key) {
            Some(position) => position,
            None => {
                self.keys.push(KeyEntry {
                    key: observation.key.to_string(),
                    weight: observation.weight,
                    values: BTreeMap::new(),
                });
                self.keys.len() - 1
            }
        };

        let score = observation.score.clamp(0.0, 1.0);
        let values = &mut self.keys[position].values;
        match values.get_mut(observation.candidate) {
            Some(scores) => scores.push(score),
            None => {
                let mut scores = SmallVec::new();
                scores.push(score);
                values.insert(observation.candidate.to_string(), scores);
            }
        }
    }

    /// Number of observations recorded so far.
    pub fn len(&self) -> usize {
        self.keys
            .iter()
            .flat_map(|entry| entry.values.values())
            .map(|scores| scores.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Fold all observations into a [`Match`].
    pub fn finalize(self) -> Match {
        let mut breakdown: Vec<KeyScore> = Vec::with_capacity(self.keys.len());
        let mut winner: Option<usize> = None;

        for entry in &self.keys {
            let key_score = KeyScore::new(entry.key.as_str(), entry.score(), entry.weight);
            // Strictly greater: the first key in attribute order keeps ties
            let better = winner.map_or(true, |best| key_score.score > breakdown[best].score);
            if better {
                winner = Some(breakdown.len());
            }
            breakdown.push(key_score);
        }

        let Some(best) = winner else {
            return Match::empty(self.threshold);
        };

        let total_weight: f64 = breakdown.iter().map(|entry| entry.weight).sum();
        let total_weighted: f64 = breakdown.iter().map(KeyScore::weighted_score).sum();
        let average = if total_weight > 0.0 {
            total_weighted / total_weight
        } else {
            0.0
        };

        let score = breakdown[best].score;
        Match {
            winning_key: Some(breakdown[best].key.clone()),
            score,
            weight: average + score,
            threshold: self.threshold,
            breakdown,
        }
    }
}
