//! Block-structured adjacency templates for the RANKING experiments.
//!
//! A template is an `n × n` matrix over [`Entry`] whose rows are the fixed
//! (offline) vertices and whose columns are the arriving (online) vertices.
//! The layout is fully determined by `(alpha, beta, n)` through
//! [`BlockStructure`]; [`generate`] materialises it once and trials work on
//! permuted copies.

use std::ops::{Range, RangeInclusive};

use tracing::debug;

use crate::{
    Result,
    error::{RankingError, TrialError},
    permutation::Permutation,
};

/// State of a single `(fixed, arriving)` cell.
///
/// Templates only contain [`Entry::Absent`] and [`Entry::Available`]; the
/// greedy matcher moves entries of a per-trial copy to [`Entry::Consumed`]
/// once their fixed vertex has been matched.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Entry {
    /// No edge between the two vertices.
    #[default]
    Absent,
    /// Edge present and the fixed vertex is still unmatched.
    Available,
    /// Edge whose fixed vertex has already been matched.
    Consumed,
}

impl Entry {
    /// Returns `true` only for [`Entry::Available`].
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_available(self) -> bool { matches!(self, Self::Available) }
}

/// Block boundaries derived from `(alpha, beta, n)`.
///
/// With `L = floor(alpha·n) − 1` and `U = floor(beta·n) − 1` the vertices are
/// split into `[0, L)`, `[L, U]` and `(U, n)`.
///
/// # Examples
/// ```
/// use ranking_core::BlockStructure;
///
/// let blocks = BlockStructure::new(0.5, 0.75, 4).expect("thresholds are valid");
/// assert_eq!(blocks.lower(), 1);
/// assert_eq!(blocks.upper(), 2);
/// assert_eq!(blocks.expected_edge_count(), 8);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct BlockStructure {
    n: usize,
    lower: usize,
    upper: usize,
}

impl BlockStructure {
    /// Computes the block boundaries, validating the thresholds first.
    ///
    /// # Errors
    /// Returns [`RankingError::InvalidThresholds`] unless
    /// `0 <= alpha < beta < 1` with both values finite, and
    /// [`RankingError::DegenerateBlocks`] when `n` is too small for
    /// `L >= 0`, `U >= L` and `U < n` to hold.
    pub fn new(alpha: f64, beta: f64, n: usize) -> Result<Self> {
        let ordered = alpha.is_finite()
            && beta.is_finite()
            && alpha >= 0.0
            && alpha < beta
            && beta < 1.0;
        if !ordered {
            return Err(RankingError::InvalidThresholds { alpha, beta });
        }

        let degenerate = || RankingError::DegenerateBlocks { n, alpha, beta };
        let lower = scaled_floor(alpha, n).checked_sub(1).ok_or_else(degenerate)?;
        let upper = scaled_floor(beta, n).checked_sub(1).ok_or_else(degenerate)?;
        if upper < lower || upper >= n {
            return Err(degenerate());
        }

        Ok(Self { n, lower, upper })
    }

    /// Returns the total number of vertices on each side.
    #[must_use]
    #[rustfmt::skip]
    pub const fn n(&self) -> usize { self.n }

    /// Returns `L`, the first vertex of the middle block.
    #[must_use]
    #[rustfmt::skip]
    pub const fn lower(&self) -> usize { self.lower }

    /// Returns `U`, the last vertex of the middle block.
    #[must_use]
    #[rustfmt::skip]
    pub const fn upper(&self) -> usize { self.upper }

    /// Vertices `[0, L)`.
    #[must_use]
    pub const fn first_block(&self) -> Range<usize> {
        0..self.lower
    }

    /// Vertices `[L, U]`.
    #[must_use]
    pub const fn middle_block(&self) -> RangeInclusive<usize> {
        self.lower..=self.upper
    }

    /// Vertices `(U, n)`.
    #[must_use]
    pub const fn last_block(&self) -> Range<usize> {
        (self.upper + 1)..self.n
    }

    /// Closed-form number of [`Entry::Available`] cells in the template.
    #[must_use]
    pub const fn expected_edge_count(&self) -> usize {
        let first = self.lower;
        let middle = self.upper - self.lower + 1;
        let last = self.n - self.upper - 1;
        (first + first * middle) + (middle + middle * last) + last
    }
}

fn scaled_floor(threshold: f64, n: usize) -> usize {
    // `threshold` is finite and non-negative, so the cast saturates rather
    // than wrapping.
    (threshold * n as f64).floor() as usize
}

/// Square matrix of [`Entry`] values stored column-major.
///
/// Each arriving vertex's column is one contiguous slice, which is the order
/// the greedy matcher scans in.
///
/// # Examples
/// ```
/// use ranking_core::{AdjacencyMatrix, Entry};
///
/// let matrix = AdjacencyMatrix::from_fn(2, |row, col| {
///     if row == col { Entry::Available } else { Entry::Absent }
/// });
/// assert_eq!(matrix.get(1, 1), Some(Entry::Available));
/// assert_eq!(matrix.get(0, 1), Some(Entry::Absent));
/// assert_eq!(matrix.get(2, 0), None);
/// assert_eq!(matrix.column(1), Some(&[Entry::Absent, Entry::Available][..]));
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AdjacencyMatrix {
    n: usize,
    entries: Vec<Entry>,
}

impl AdjacencyMatrix {
    /// Creates an `n × n` matrix with every cell [`Entry::Absent`].
    #[must_use]
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            entries: vec![Entry::Absent; n * n],
        }
    }

    /// Creates an `n × n` matrix by evaluating `cell(row, col)` for every cell.
    #[must_use]
    pub fn from_fn(n: usize, mut cell: impl FnMut(usize, usize) -> Entry) -> Self {
        let mut entries = Vec::with_capacity(n * n);
        for col in 0..n {
            entries.extend((0..n).map(|row| cell(row, col)));
        }
        Self { n, entries }
    }

    /// Returns the number of rows (and columns).
    #[must_use]
    #[rustfmt::skip]
    pub const fn n(&self) -> usize { self.n }

    /// Returns the cell at `(row, col)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Entry> {
        if row >= self.n || col >= self.n {
            return None;
        }
        self.entries.get(col * self.n + row).copied()
    }

    /// Returns the cells of `col`, ordered by row, or `None` when out of bounds.
    #[must_use]
    pub fn column(&self, col: usize) -> Option<&[Entry]> {
        if col >= self.n {
            return None;
        }
        let start = col * self.n;
        self.entries.get(start..start + self.n)
    }

    /// Iterates over the columns in arrival order.
    pub fn columns(&self) -> impl Iterator<Item = &[Entry]> {
        // `chunks_exact(0)` panics, and an empty matrix has no columns anyway.
        self.entries.chunks_exact(self.n.max(1))
    }

    /// Returns the cells of `row`, ordered by column. Empty when out of bounds.
    pub fn row_cells(&self, row: usize) -> impl Iterator<Item = Entry> + '_ {
        self.columns().filter_map(move |column| column.get(row).copied())
    }

    /// Counts the cells equal to `entry`.
    #[must_use]
    pub fn count(&self, entry: Entry) -> usize {
        self.entries.iter().filter(|&&cell| cell == entry).count()
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, entry: Entry) {
        debug_assert!(row < self.n && col < self.n, "cell ({row}, {col}) out of bounds");
        if row < self.n
            && let Some(cell) = self.entries.get_mut(col * self.n + row)
        {
            *cell = entry;
        }
    }

    pub(crate) fn column_mut(&mut self, col: usize) -> Option<&mut [Entry]> {
        if col >= self.n {
            return None;
        }
        let start = col * self.n;
        self.entries.get_mut(start..start + self.n)
    }

    /// Returns a private copy with rows reordered by `ranks` and columns by
    /// `arrivals`.
    ///
    /// Row `k` of the copy is row `ranks[k]` of `self`, and column `k` is
    /// column `arrivals[k]`. `self` is left untouched.
    ///
    /// # Errors
    /// Returns [`TrialError::PermutationLength`] when either permutation does
    /// not have exactly [`Self::n`] elements.
    ///
    /// # Examples
    /// ```
    /// use ranking_core::{AdjacencyMatrix, Entry, Permutation};
    ///
    /// let matrix = AdjacencyMatrix::from_fn(2, |row, col| {
    ///     if row == 0 && col == 1 { Entry::Available } else { Entry::Absent }
    /// });
    /// let swap = Permutation::from_images(vec![1, 0]).expect("swap is a bijection");
    /// let copy = matrix
    ///     .permuted(&swap, &swap)
    ///     .expect("permutations match the matrix size");
    /// assert_eq!(copy.get(1, 0), Some(Entry::Available));
    /// assert_eq!(matrix.get(0, 1), Some(Entry::Available));
    /// ```
    pub fn permuted(
        &self,
        ranks: &Permutation,
        arrivals: &Permutation,
    ) -> core::result::Result<Self, TrialError> {
        for permutation in [ranks, arrivals] {
            if permutation.len() != self.n {
                return Err(TrialError::PermutationLength {
                    expected: self.n,
                    got: permutation.len(),
                });
            }
        }

        let mut entries = Vec::with_capacity(self.entries.len());
        for &source_col in arrivals.as_slice() {
            let column = self.column(source_col).ok_or(TrialError::PermutationLength {
                expected: self.n,
                got: arrivals.len(),
            })?;
            // Permutation images are always < n, so every lookup hits.
            entries.extend(
                ranks
                    .as_slice()
                    .iter()
                    .map(|&row| column.get(row).copied().unwrap_or_default()),
            );
        }
        Ok(Self { n: self.n, entries })
    }
}

/// Builds the block-structured template for `(alpha, beta, n)`.
///
/// Every vertex has a self-loop; each vertex of `[0, L)` is also adjacent to
/// every vertex of `[L, U]`, and each vertex of `[L, U]` to every vertex of
/// `(U, n)`. All other cells are [`Entry::Absent`].
///
/// # Errors
/// Returns the validation errors of [`BlockStructure::new`]; no matrix is
/// allocated in that case.
///
/// # Examples
/// ```
/// use ranking_core::{Entry, generate};
///
/// let template = generate(0.5, 0.75, 4).expect("thresholds are valid");
/// let row0: Vec<bool> = (0..4)
///     .map(|col| template.get(0, col) == Some(Entry::Available))
///     .collect();
/// assert_eq!(row0, [true, true, true, false]);
/// ```
pub fn generate(alpha: f64, beta: f64, n: usize) -> Result<AdjacencyMatrix> {
    let blocks = BlockStructure::new(alpha, beta, n)?;
    let template = generate_from_blocks(&blocks);
    debug!(
        n,
        lower = blocks.lower(),
        upper = blocks.upper(),
        edges = blocks.expected_edge_count(),
        "generated block template"
    );
    Ok(template)
}

/// Builds the template for already-validated block boundaries.
#[must_use]
pub fn generate_from_blocks(blocks: &BlockStructure) -> AdjacencyMatrix {
    let mut template = AdjacencyMatrix::empty(blocks.n());
    for row in blocks.first_block() {
        template.set(row, row, Entry::Available);
        for col in blocks.middle_block() {
            template.set(row, col, Entry::Available);
        }
    }
    for row in blocks.middle_block() {
        template.set(row, row, Entry::Available);
        for col in blocks.last_block() {
            template.set(row, col, Entry::Available);
        }
    }
    for row in blocks.last_block() {
        template.set(row, row, Entry::Available);
    }
    template
}
