//! Adjacent-difference evaluation (stage 3).
//!
//! Every sorted candidate row is compared with the row immediately before
//! it: exact columns must be equal, tolerance columns must be within
//! tolerance. The first row has no predecessor and fails every test.
//!
//! Because each row is compared with its predecessor rather than with the
//! first member of its group, near-duplicates chain: for values
//! `0.1, 0.2, 0.3, 0.4` and `atol = 0.2` every row after the first is
//! flagged, even though `0.1` and `0.4` are further apart than `0.2`.

use rayon::prelude::*;

use super::tolerance::ResolvedTolerance;
use crate::table::Column;

/// Per-column comparison results for the sorted candidate rows.
///
/// One row per sorted candidate, one column per exact column followed by
/// one column per tolerance column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonMatrix {
    columns: Vec<String>,
    cells: Vec<bool>,
    rows: usize,
}

impl ComparisonMatrix {
    /// Number of rows (sorted candidates).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column labels, exact columns first.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Comparison results of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[must_use]
    pub fn row(&self, row: usize) -> &[bool] {
        let width = self.columns.len();
        &self.cells[row * width..(row + 1) * width]
    }

    /// Collapse to one flag per row: a row is a duplicate if every
    /// comparison in it passed. Row 0 is never a duplicate.
    #[must_use]
    pub fn collapse(&self) -> Vec<bool> {
        (0..self.rows)
            .map(|row| row > 0 && !self.columns.is_empty() && self.row(row).iter().all(|&ok| ok))
            .collect()
    }
}

/// Compare every sorted candidate row with its predecessor.
///
/// # Arguments
///
/// * `sorted` - Original row positions in sorted order
/// * `exact` - Exact columns
/// * `tolerance` - Tolerance columns
/// * `tol` - Validated tolerance, one bound per tolerance column
/// * `parallel` - Evaluate rows on the rayon thread pool
#[must_use]
pub fn compare_adjacent(
    sorted: &[usize],
    exact: &[&Column],
    tolerance: &[&Column],
    tol: &ResolvedTolerance,
    parallel: bool,
) -> ComparisonMatrix {
    let columns: Vec<String> = exact
        .iter()
        .chain(tolerance)
        .map(|c| c.name().to_string())
        .collect();
    let width = columns.len();
    let mut cells = vec![false; sorted.len() * width];

    if width > 0 {
        let fill = |(idx, row): (usize, &mut [bool])| {
            fill_row(row, sorted[idx - 1], sorted[idx], exact, tolerance, tol);
        };
        if parallel {
            cells.par_chunks_mut(width).enumerate().skip(1).for_each(fill);
        } else {
            cells.chunks_mut(width).enumerate().skip(1).for_each(fill);
        }
    }

    ComparisonMatrix {
        columns,
        cells,
        rows: sorted.len(),
    }
}

fn fill_row(
    out: &mut [bool],
    previous: usize,
    current: usize,
    exact: &[&Column],
    tolerance: &[&Column],
    tol: &ResolvedTolerance,
) {
    let (exact_out, tolerance_out) = out.split_at_mut(exact.len());
    for (slot, column) in exact_out.iter_mut().zip(exact) {
        let values = column.values();
        *slot = values[current].exact_eq(&values[previous]);
    }
    for (idx, (slot, column)) in tolerance_out.iter_mut().zip(tolerance).enumerate() {
        let values = column.values();
        *slot = tol.is_close(idx, &values[previous], &values[current]);
    }
}
