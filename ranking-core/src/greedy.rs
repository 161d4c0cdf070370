//! The RANKING greedy rule over a permuted adjacency matrix.
//!
//! Rows are fixed vertices ordered by rank (row 0 has the highest priority)
//! and columns are arriving vertices in arrival order. Each arriving vertex
//! is matched irrevocably to the highest-priority fixed vertex that is still
//! [`Entry::Available`] in its column.
//!
//! Columns are processed in one contiguous pass each. A matched row's
//! Available cells are moved to [`Entry::Consumed`] as later columns are
//! visited, which leaves the same final matrix as consuming the whole row
//! suffix at match time.

use crate::{
    cancellation::Cancellation,
    error::TrialError,
    graph::{AdjacencyMatrix, Entry},
};

/// Runs the greedy rule to completion and returns the number of matches.
///
/// Matched rows have every [`Entry::Available`] cell from the matching column
/// onward moved to [`Entry::Consumed`].
///
/// # Examples
/// ```
/// use ranking_core::{generate, greedy_match};
///
/// let mut matrix = generate(0.5, 0.75, 4).expect("thresholds are valid");
/// assert_eq!(greedy_match(&mut matrix), 4);
/// ```
pub fn greedy_match(matrix: &mut AdjacencyMatrix) -> usize {
    let mut matched = vec![false; matrix.n()];
    let mut matches = 0;
    for column in 0..matrix.n() {
        matches += usize::from(match_column(matrix, column, &mut matched));
    }
    matches
}

/// Runs the greedy rule, checking `cancellation` before each arriving vertex.
///
/// # Errors
/// Returns [`TrialError::Cancelled`] as soon as the token asks to stop. Only
/// the columns visited so far carry consumed markings in that case.
pub fn greedy_match_cancellable(
    matrix: &mut AdjacencyMatrix,
    cancellation: &Cancellation,
) -> Result<usize, TrialError> {
    let mut matched = vec![false; matrix.n()];
    let mut matches = 0;
    for column in 0..matrix.n() {
        if cancellation.should_stop() {
            return Err(TrialError::Cancelled);
        }
        matches += usize::from(match_column(matrix, column, &mut matched));
    }
    Ok(matches)
}

/// Matches `column` and consumes the cells of rows matched so far.
fn match_column(matrix: &mut AdjacencyMatrix, column: usize, matched: &mut [bool]) -> bool {
    let Some(cells) = matrix.column_mut(column) else {
        return false;
    };
    let mut found = false;
    for (cell, row_matched) in cells.iter_mut().zip(matched.iter_mut()) {
        if *cell != Entry::Available {
            continue;
        }
        if *row_matched {
            *cell = Entry::Consumed;
        } else if !found {
            *cell = Entry::Consumed;
            *row_matched = true;
            found = true;
        }
    }
    found
}

/// Recovers the `(row, column)` pairs matched by a completed greedy run,
/// ordered by row.
///
/// A matched row's first [`Entry::Consumed`] cell sits in the column it was
/// matched to, because consumption starts at that column. Rows without a
/// consumed cell were never matched.
#[must_use]
pub fn matched_pairs(matrix: &AdjacencyMatrix) -> Vec<(usize, usize)> {
    let mut first_consumed: Vec<Option<usize>> = vec![None; matrix.n()];
    for (col, cells) in matrix.columns().enumerate() {
        for (slot, &cell) in first_consumed.iter_mut().zip(cells) {
            if slot.is_none() && cell == Entry::Consumed {
                *slot = Some(col);
            }
        }
    }
    first_consumed
        .into_iter()
        .enumerate()
        .filter_map(|(row, col)| col.map(|col| (row, col)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use crate::{graph::generate, permutation::sample_permutation, test_utils::suite_proptest_config};

    fn matrix_from_bits(rows: &[&[u8]]) -> AdjacencyMatrix {
        AdjacencyMatrix::from_fn(rows.len(), |row, col| {
            match rows.get(row).and_then(|cells| cells.get(col)) {
                Some(1) => Entry::Available,
                _ => Entry::Absent,
            }
        })
    }

    /// Consumes the whole row suffix at match time, scanning cell by cell.
    fn eager_reference(matrix: &mut AdjacencyMatrix) -> usize {
        let n = matrix.n();
        let mut matches = 0;
        for col in 0..n {
            let Some(row) = (0..n).find(|&row| matrix.get(row, col) == Some(Entry::Available))
            else {
                continue;
            };
            for later in col..n {
                if matrix.get(row, later) == Some(Entry::Available) {
                    matrix.set(row, later, Entry::Consumed);
                }
            }
            matches += 1;
        }
        matches
    }

    #[rstest]
    fn identity_order_matches_every_vertex_of_four_vertex_template() {
        let mut matrix = generate(0.5, 0.75, 4).expect("thresholds are valid");
        assert_eq!(greedy_match(&mut matrix), 4);
        assert_eq!(matched_pairs(&matrix), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[rstest]
    fn higher_priority_row_wins_and_blocks_later_columns() {
        // Both arriving vertices only like fixed vertex 0; the second arrival
        // finds it consumed and falls back to row 1.
        let mut matrix = matrix_from_bits(&[&[1, 1], &[0, 1]]);
        assert_eq!(greedy_match(&mut matrix), 2);
        assert_eq!(matrix.get(0, 1), Some(Entry::Consumed));
        assert_eq!(matched_pairs(&matrix), vec![(0, 0), (1, 1)]);
    }

    #[rstest]
    fn column_without_available_row_stays_unmatched() {
        let mut matrix = matrix_from_bits(&[&[1, 1, 0], &[0, 0, 0], &[0, 0, 1]]);
        assert_eq!(greedy_match(&mut matrix), 2);
        let columns: Vec<usize> = matched_pairs(&matrix).into_iter().map(|(_, col)| col).collect();
        assert_eq!(columns, vec![0, 2]);
    }

    #[rstest]
    fn consumption_only_touches_available_cells_from_the_match_onward() {
        let mut matrix = matrix_from_bits(&[&[0, 1, 0, 1], &[1, 0, 0, 0], &[0; 4], &[0; 4]]);
        assert_eq!(greedy_match(&mut matrix), 2);
        assert_eq!(matrix.get(0, 0), Some(Entry::Absent));
        assert_eq!(matrix.get(0, 1), Some(Entry::Consumed));
        assert_eq!(matrix.get(0, 2), Some(Entry::Absent));
        assert_eq!(matrix.get(0, 3), Some(Entry::Consumed));
        assert_eq!(matrix.get(1, 0), Some(Entry::Consumed));
    }

    #[rstest]
    fn late_match_keeps_earlier_available_cells() {
        let mut matrix = matrix_from_bits(&[&[1, 0, 1], &[1, 0, 1], &[0, 0, 0]]);
        assert_eq!(greedy_match(&mut matrix), 2);
        assert_eq!(matrix.get(1, 0), Some(Entry::Available));
        assert_eq!(matched_pairs(&matrix), vec![(0, 0), (1, 2)]);
    }

    #[rstest]
    fn empty_matrix_yields_zero() {
        let mut matrix = AdjacencyMatrix::empty(0);
        assert_eq!(greedy_match(&mut matrix), 0);
        let mut absent = AdjacencyMatrix::empty(5);
        assert_eq!(greedy_match(&mut absent), 0);
        assert!(matched_pairs(&absent).is_empty());
    }

    #[rstest]
    fn cancelled_token_stops_before_first_column() {
        let mut matrix = generate(0.3, 0.7, 20).expect("thresholds are valid");
        let token = Cancellation::new();
        token.cancel();
        let err = greedy_match_cancellable(&mut matrix, &token).expect_err("token is cancelled");
        assert_eq!(err, TrialError::Cancelled);
        assert_eq!(matrix.count(Entry::Consumed), 0);
    }

    #[rstest]
    fn cancellable_variant_agrees_with_plain_run() {
        let template = generate(0.3, 0.7, 50).expect("thresholds are valid");
        let mut plain = template.clone();
        let mut cancellable = template;
        let expected = greedy_match(&mut plain);
        let got = greedy_match_cancellable(&mut cancellable, &Cancellation::new())
            .expect("token is live");
        assert_eq!(got, expected);
        assert_eq!(plain, cancellable);
    }

    proptest! {
        #![proptest_config(suite_proptest_config(128))]

        #[test]
        fn matching_is_consistent_with_consumed_markings(
            n in 4_usize..60,
            alpha_pct in 10_u32..50,
            gap_pct in 1_u32..49,
            seed in any::<u64>(),
        ) {
            let alpha = f64::from(alpha_pct) / 100.0;
            let beta = f64::from(alpha_pct + gap_pct) / 100.0;
            let Ok(template) = generate(alpha, beta, n) else {
                return Ok(());
            };
            let mut rng = SmallRng::seed_from_u64(seed);
            let ranks = sample_permutation(n, &mut rng);
            let arrivals = sample_permutation(n, &mut rng);
            let mut matrix = template.permuted(&ranks, &arrivals).expect("sizes match");

            let count = greedy_match(&mut matrix);
            prop_assert!(count <= n);

            let pairs = matched_pairs(&matrix);
            prop_assert_eq!(pairs.len(), count);
            let rows: HashSet<usize> = pairs.iter().map(|&(row, _)| row).collect();
            let columns: HashSet<usize> = pairs.iter().map(|&(_, col)| col).collect();
            prop_assert_eq!(rows.len(), count);
            prop_assert_eq!(columns.len(), count);
            prop_assert_eq!(matrix.count(Entry::Available) + matrix.count(Entry::Consumed),
                template.count(Entry::Available));
            let mut reference = template.permuted(&ranks, &arrivals).expect("sizes match");
            prop_assert_eq!(eager_reference(&mut reference), count);
            prop_assert_eq!(&reference, &matrix);

            // Every matched pair was an edge of the permuted graph.
            let original = template.permuted(&ranks, &arrivals).expect("sizes match");
            for (row, col) in pairs {
                prop_assert_eq!(original.get(row, col), Some(Entry::Available));
            }
        }
    }
}
