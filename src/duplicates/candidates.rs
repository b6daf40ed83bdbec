//! Exact-key candidate selection (stage 1).
//!
//! Rows can only be duplicates of one another if they agree on every exact
//! column, so the first stage keeps every row whose exact-key tuple occurs
//! at least twice in the table. All occurrences are kept, not just the
//! repeats. With no exact columns every row is a candidate.
//!
//! # Example
//!
//! ```
//! use tabdupe::duplicates::select_candidates;
//! use tabdupe::table::Column;
//!
//! let a = Column::from_strs("A", &["c", "c", "e", "d", "d"]);
//! let (rows, stats) = select_candidates(&[&a], a.len());
//!
//! assert_eq!(rows, vec![0, 1, 3, 4]);
//! assert_eq!(stats.key_groups, 2);
//! assert_eq!(stats.unique_rows, 1);
//! ```

use std::collections::HashMap;

use crate::table::{Column, KeyCell};

/// Statistics from candidate selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Rows that entered the stage
    pub total_rows: usize,
    /// Rows sharing their exact key with at least one other row
    pub candidate_rows: usize,
    /// Rows whose exact key is unique (eliminated)
    pub unique_rows: usize,
    /// Distinct exact keys that occur two or more times
    pub key_groups: usize,
}

impl GroupingStats {
    /// Percentage of rows eliminated by exact-key grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.unique_rows as f64 / self.total_rows as f64) * 100.0
        }
    }
}

/// Select the rows whose exact-column tuple occurs two or more times.
///
/// Returns the original row positions in ascending order together with
/// grouping statistics. Missing cells form a key like any other value.
///
/// # Arguments
///
/// * `exact` - The exact columns, in key order
/// * `rows` - Row count of the table the columns belong to
#[must_use]
pub fn select_candidates(exact: &[&Column], rows: usize) -> (Vec<usize>, GroupingStats) {
    if exact.is_empty() {
        let stats = GroupingStats {
            total_rows: rows,
            candidate_rows: rows,
            unique_rows: 0,
            key_groups: usize::from(rows > 1),
        };
        return ((0..rows).collect(), stats);
    }

    let mut counts: HashMap<Vec<KeyCell<'_>>, usize> = HashMap::new();
    for row in 0..rows {
        *counts.entry(row_key(exact, row)).or_insert(0) += 1;
    }

    let candidates: Vec<usize> = (0..rows)
        .filter(|&row| counts[&row_key(exact, row)] > 1)
        .collect();

    let stats = GroupingStats {
        total_rows: rows,
        candidate_rows: candidates.len(),
        unique_rows: rows - candidates.len(),
        key_groups: counts.values().filter(|&&n| n > 1).count(),
    };

    log::debug!(
        "Candidate selection: {} of {} rows share an exact key ({} groups)",
        stats.candidate_rows,
        stats.total_rows,
        stats.key_groups
    );

    (candidates, stats)
}

fn row_key<'a>(exact: &[&'a Column], row: usize) -> Vec<KeyCell<'a>> {
    exact.iter().map(|c| KeyCell(&c.values()[row])).collect()
}
