//! Matching-block character ratio (Ratcliff/Obershelp)
//!
//! Finds the longest common block of the two strings, then recurses into
//! the unmatched regions on its left and right. The ratio is
//! `2 * M / (len(a) + len(b))` where M is the total size of all blocks.
//!
//! # Complexity
//! - Time: O(m*n) per block search, O(m*n*k) overall for k blocks
//! - Space: O(n) for the block search rows

use super::Similarity;
use smallvec::SmallVec;

/// Character ratio calculator
///
/// Stateless calculator - all instances are equivalent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterRatio;

impl CharacterRatio {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Similarity for CharacterRatio {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        character_ratio(a, b)
    }

    fn name(&self) -> &'static str {
        "ratio"
    }
}

/// A matching block: `a[a_start..a_start + len] == b[b_start..b_start + len]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

/// Calculate the matching-block similarity ratio of two strings.
/// Returns a value between 0.0 and 1.0; two empty strings score 1.0.
///
/// # Examples
/// ```
/// use fuzzyrank::algorithms::ratio::character_ratio;
/// assert_eq!(character_ratio("holmes", "holmes"), 1.0);
/// assert_eq!(character_ratio("abcd", "bcde"), 0.75);
/// ```
#[must_use]
pub fn character_ratio(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let a_chars: SmallVec<[char; 64]> = a.chars().collect();
    let b_chars: SmallVec<[char; 64]> = b.chars().collect();
    character_ratio_chars(&a_chars, &b_chars)
}

/// Same as [`character_ratio`] over pre-collected char slices.
///
/// Used by the sliding-window matchers to score windows without allocating
/// a new string per window.
#[must_use]
pub fn character_ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched: usize = matching_blocks(a, b).iter().map(|block| block.len).sum();
    2.0 * matched as f64 / total as f64
}

/// Find all matching blocks between `a` and `b`, ordered by position.
#[must_use]
pub fn matching_blocks(a: &[char], b: &[char]) -> Vec<MatchingBlock> {
    let mut blocks = Vec::new();
    let mut pending: SmallVec<[(usize, usize, usize, usize); 16]> = SmallVec::new();
    pending.push((0, a.len(), 0, b.len()));

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let block = longest_match(a, b, a_lo, a_hi, b_lo, b_hi);
        if block.len == 0 {
            continue;
        }
        if a_lo < block.a_start && b_lo < block.b_start {
            pending.push((a_lo, block.a_start, b_lo, block.b_start));
        }
        let a_end = block.a_start + block.len;
        let b_end = block.b_start + block.len;
        if a_end < a_hi && b_end < b_hi {
            pending.push((a_end, a_hi, b_end, b_hi));
        }
        blocks.push(block);
    }

    blocks.sort_unstable_by_key(|block| (block.a_start, block.b_start));
    blocks
}

/// Longest common block within `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
///
/// Among blocks of maximal length, the one starting earliest in `a` wins,
/// then the one starting earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> MatchingBlock {
    let width = b_hi - b_lo;
    let mut prev: SmallVec<[usize; 64]> = smallvec::smallvec![0; width + 1];
    let mut curr: SmallVec<[usize; 64]> = smallvec::smallvec![0; width + 1];

    let mut best = MatchingBlock {
        a_start: a_lo,
        b_start: b_lo,
        len: 0,
    };

    for i in a_lo..a_hi {
        for j in b_lo..b_hi {
            let col = j - b_lo + 1;
            if a[i] == b[j] {
                curr[col] = prev[col - 1] + 1;
                if curr[col] > best.len {
                    best = MatchingBlock {
                        a_start: i + 1 - curr[col],
                        b_start: j + 1 - curr[col],
                        len: curr[col],
                    };
                }
            } else {
                curr[col] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}
