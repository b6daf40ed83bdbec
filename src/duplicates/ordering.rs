//! Candidate ordering (stage 2).
//!
//! Sorting the candidates by the exact columns and then the tolerance
//! columns makes likely duplicates row-adjacent, so stage 3 only has to
//! compare each row with its predecessor. The sort is stable: rows with
//! identical sort keys keep their original relative order.

use std::cmp::Ordering;

use crate::table::Column;

/// Sort candidate row positions by exact columns, then tolerance columns.
///
/// Exact columns use [`Value::key_cmp`](crate::table::Value::key_cmp)
/// (numbers, then text, then missing); tolerance columns use
/// [`Value::numeric_cmp`](crate::table::Value::numeric_cmp) (numbers
/// ascending, non-numeric last).
///
/// # Example
///
/// ```
/// use tabdupe::duplicates::sort_candidates;
/// use tabdupe::table::Column;
///
/// let a = Column::from_strs("A", &["d", "c", "d", "c"]);
/// let c = Column::from_f64("C", &[3.01, 1.01, 3.0, 1.0]);
///
/// let sorted = sort_candidates(&[0, 1, 2, 3], &[&a], &[&c]);
/// assert_eq!(sorted, vec![3, 1, 2, 0]);
/// ```
#[must_use]
pub fn sort_candidates(candidates: &[usize], exact: &[&Column], tolerance: &[&Column]) -> Vec<usize> {
    let mut sorted = candidates.to_vec();
    sorted.sort_by(|&a, &b| compare_rows(a, b, exact, tolerance));
    sorted
}

fn compare_rows(a: usize, b: usize, exact: &[&Column], tolerance: &[&Column]) -> Ordering {
    for column in exact {
        let values = column.values();
        match values[a].key_cmp(&values[b]) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    for column in tolerance {
        let values = column.values();
        match values[a].numeric_cmp(&values[b]) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    Ordering::Equal
}
