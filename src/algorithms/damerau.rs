//! Damerau-Levenshtein edit distance
//!
//! Counts insertions, deletions, substitutions and transpositions of
//! adjacent characters. The result is an unnormalized count and is kept
//! apart from the [0, 1] similarity scores used for ranking.
//!
//! # Memory
//!
//! The unrestricted distance keeps the whole cost grid, one cell per pair
//! of characters. Once the grid would exceed [`MAX_GRID_CELLS`] cells the
//! computation switches to [`optimal_string_alignment`], which only keeps
//! the last two rows. The two agree unless an optimal edit touches a
//! transposed pair again.

use super::EditDistance;
use ahash::AHashMap;
use smallvec::SmallVec;

/// Largest cost grid [`edit_distance`] allocates, in cells.
pub const MAX_GRID_CELLS: usize = 16 * 1024 * 1024;

type Chars = SmallVec<[char; 64]>;

/// Damerau-Levenshtein distance calculator
///
/// # Complexity
/// - Time: O(m*n) where m and n are string lengths
/// - Space: O(m*n) up to [`MAX_GRID_CELLS`], O(n) above it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamerauLevenshtein;

impl DamerauLevenshtein {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EditDistance for DamerauLevenshtein {
    fn distance(&self, a: &str, b: &str) -> usize {
        edit_distance(a, b)
    }

    fn name(&self) -> &'static str {
        "damerau_levenshtein"
    }
}

/// Minimum number of single-character insertions, deletions, substitutions
/// and adjacent transpositions turning `a` into `b`.
///
/// This is the unrestricted variant: a substring may be edited again after
/// a transposition.
///
/// # Examples
/// ```
/// use fuzzyrank::algorithms::damerau::edit_distance;
/// assert_eq!(edit_distance("holmes", "hlomes"), 1);
/// assert_eq!(edit_distance("ca", "abc"), 2);
/// ```
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let source: Chars = a.chars().collect();
    let target: Chars = b.chars().collect();
    if source.is_empty() || target.is_empty() {
        return source.len().max(target.len());
    }

    let cells = (source.len() + 2).saturating_mul(target.len() + 2);
    if cells > MAX_GRID_CELLS {
        return osa_distance(&source, &target);
    }

    CostGrid::new(source.len(), target.len()).fill(&source, &target)
}

/// Row-major cost grid padded with a border row and column.
///
/// Cell `(i + 1, j + 1)` holds the distance between the first `i`
/// characters of the source and the first `j` of the target. Row 0 and
/// column 0 hold a cost no path can beat, so transpositions reaching back
/// past the start are never chosen.
struct CostGrid {
    width: usize,
    cells: Vec<usize>,
}

impl CostGrid {
    fn new(rows: usize, cols: usize) -> Self {
        let width = cols + 2;
        let unreachable = rows + cols;
        let mut cells = vec![unreachable; (rows + 2) * width];

        for i in 0..=rows {
            cells[(i + 1) * width + 1] = i;
        }
        for j in 0..=cols {
            cells[width + j + 1] = j;
        }

        Self { width, cells }
    }

    fn at(&self, row: usize, col: usize) -> usize {
        self.cells[row * self.width + col]
    }

    fn fill(mut self, source: &[char], target: &[char]) -> usize {
        // Latest source row (1-based) holding each character
        let mut row_of: AHashMap<char, usize> = AHashMap::with_capacity(source.len());

        for (row, &s) in (1..).zip(source) {
            // Latest target column (1-based) in this row matching `s`
            let mut matched_col = 0usize;

            for (col, &t) in (1..).zip(target) {
                let swap_row = row_of.get(&t).copied().unwrap_or(0);
                let swap_col = matched_col;

                let substitution = if s == t {
                    matched_col = col;
                    self.at(row, col)
                } else {
                    self.at(row, col) + 1
                };
                let insertion = self.at(row + 1, col) + 1;
                let deletion = self.at(row, col + 1) + 1;
                // Delete what sits between the two swapped characters on
                // either side, then pay one for the swap itself
                let transposition =
                    self.at(swap_row, swap_col) + (row - swap_row) + (col - swap_col) - 1;

                self.cells[(row + 1) * self.width + col + 1] =
                    substitution.min(insertion).min(deletion).min(transposition);
            }

            row_of.insert(s, row);
        }

        self.cells[self.cells.len() - 1]
    }
}

/// Optimal string alignment distance (restricted Damerau-Levenshtein).
///
/// No substring is edited more than once, so `"ca" -> "abc"` costs 3 here
/// and 2 with [`edit_distance`].
#[must_use]
pub fn optimal_string_alignment(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let source: Chars = a.chars().collect();
    let target: Chars = b.chars().collect();
    osa_distance(&source, &target)
}

fn osa_distance(source: &[char], target: &[char]) -> usize {
    if source.is_empty() || target.is_empty() {
        return source.len().max(target.len());
    }

    let n = target.len();
    let mut two_back: SmallVec<[usize; 64]> = smallvec::smallvec![0; n + 1];
    let mut one_back: SmallVec<[usize; 64]> = (0..=n).collect();
    let mut current: SmallVec<[usize; 64]> = smallvec::smallvec![0; n + 1];

    for (i, &s) in source.iter().enumerate() {
        current[0] = i + 1;

        for (j, &t) in target.iter().enumerate() {
            let mut best = (one_back[j] + usize::from(s != t))
                .min(one_back[j + 1] + 1)
                .min(current[j] + 1);

            let swapped = i > 0 && j > 0 && s == target[j - 1] && source[i - 1] == t;
            if swapped {
                best = best.min(two_back[j - 1] + 1);
            }
            current[j + 1] = best;
        }

        // rotate: current becomes one_back, old one_back becomes two_back
        std::mem::swap(&mut two_back, &mut one_back);
        std::mem::swap(&mut one_back, &mut current);
    }

    one_back[n]
}
