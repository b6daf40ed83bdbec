//! Duplicate finder: validation and pipeline orchestration.
//!
//! # Overview
//!
//! This module runs the duplicate detection pipeline:
//! 1. **Stage 1 - Candidate selection**: keep rows whose exact key repeats
//!    (see [`crate::duplicates::candidates`])
//! 2. **Stage 2 - Ordering**: stable sort by exact then tolerance columns
//! 3. **Stage 3 - Adjacent differences**: compare each row with its
//!    predecessor and collapse to one flag per row
//! 4. **Stage 4 - Projection**: reindex the flags onto the original table
//!
//! # Example
//!
//! ```
//! use tabdupe::duplicates::{duplicates_allclose, Tolerance};
//! use tabdupe::table::{Column, Table};
//!
//! let table = Table::from_columns(vec![
//!     Column::from_strs("A", &["c", "c", "e", "d", "d"]),
//!     Column::from_strs("B", &["a", "a", "c", "a", "a"]),
//!     Column::from_f64("C", &[1.0, 1.01, 2.0, 3.0, 3.01]),
//! ])
//! .unwrap();
//!
//! let flags = duplicates_allclose(&table, &["A", "B"], &["C"], &Tolerance::absolute(0.02)).unwrap();
//! assert_eq!(flags, [false, true, false, false, true]);
//! ```

use std::time::{Duration, Instant};

use super::adjacent::compare_adjacent;
use super::candidates::{select_candidates, GroupingStats};
use super::flags::DuplicateFlags;
use super::ordering::sort_candidates;
use super::projection::project_flags;
use super::tolerance::{ResolvedTolerance, Tolerance};
use crate::table::{Column, Table};

/// Row count above which stage 3 runs on the rayon pool when parallelism
/// is enabled.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 50_000;

/// Minimum Jaro-Winkler similarity for a column name suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Errors that can occur during duplicate finding.
///
/// All variants are configuration errors: they are raised before any
/// stage runs and no partial result is produced.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FinderError {
    /// A referenced column does not exist in the table.
    #[error("Unknown column '{column}'{}", suggestion_hint(.suggestion))]
    UnknownColumn {
        /// The name that was not found
        column: String,
        /// Closest existing column name, if any is similar enough
        suggestion: Option<String>,
    },

    /// A column was listed as both exact and tolerance.
    #[error("Column '{0}' is listed as both an exact and a tolerance column")]
    OverlappingColumn(String),

    /// Neither exact nor tolerance columns were given.
    #[error("At least one exact or tolerance column is required")]
    NoColumns,

    /// A per-column tolerance array has the wrong length.
    #[error("{parameter} has {actual} values but there are {expected} tolerance columns")]
    ToleranceLengthMismatch {
        /// `atol` or `rtol`
        parameter: &'static str,
        /// Number of tolerance columns
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },

    /// A tolerance value is negative, infinite or NaN.
    #[error("{parameter} must be a non-negative finite number, got {value}")]
    InvalidTolerance {
        /// `atol` or `rtol`
        parameter: &'static str,
        /// The offending value
        value: f64,
    },

    /// A flag vector does not match the table it is applied to.
    #[error("Flag vector has {actual} entries but the table has {expected} rows")]
    FlagLengthMismatch {
        /// Table row count
        expected: usize,
        /// Flag count
        actual: usize,
    },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{s}'?)"))
        .unwrap_or_default()
}

/// Configuration for the duplicate finder.
#[derive(Debug, Clone, PartialEq)]
pub struct FinderConfig {
    /// Closeness parameters for tolerance columns.
    pub tolerance: Tolerance,
    /// Allow stage 3 to run on the rayon thread pool.
    pub parallel: bool,
    /// Minimum number of candidate rows before parallelism kicks in.
    pub parallel_threshold: usize,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            parallel: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl FinderConfig {
    /// Set the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enable or disable parallel evaluation.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the parallel row threshold.
    #[must_use]
    pub fn with_parallel_threshold(mut self, rows: usize) -> Self {
        self.parallel_threshold = rows;
        self
    }
}

/// Summary statistics from a duplicate detection run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionSummary {
    /// Rows in the input table
    pub total_rows: usize,
    /// Rows sharing their exact key with another row
    pub candidate_rows: usize,
    /// Exact keys that occur two or more times
    pub key_groups: usize,
    /// Rows flagged as duplicates
    pub duplicate_rows: usize,
    /// Whether stage 3 ran in parallel
    pub parallel: bool,
    /// Wall time of the whole pipeline
    pub duration: Duration,
}

impl DetectionSummary {
    /// Rows kept by keep-first deduplication.
    #[must_use]
    pub fn kept_rows(&self) -> usize {
        self.total_rows - self.duplicate_rows
    }

    /// Percentage of rows flagged as duplicates.
    #[must_use]
    pub fn duplicate_percentage(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.duplicate_rows as f64 / self.total_rows as f64) * 100.0
        }
    }
}

/// Duplicate finder that validates a column selection and runs the
/// four-stage pipeline.
///
/// # Example
///
/// ```
/// use tabdupe::duplicates::{DuplicateFinder, FinderConfig, Tolerance};
/// use tabdupe::table::{Column, Table};
///
/// let table = Table::from_columns(vec![Column::from_f64("C", &[0.1, 0.2, 0.3, 0.4])]).unwrap();
///
/// let finder = DuplicateFinder::new(FinderConfig::default().with_tolerance(Tolerance::absolute(0.2)));
/// let (flags, summary) = finder.find(&table, &[] as &[&str], &["C"]).unwrap();
///
/// assert_eq!(flags, [false, true, true, true]);
/// assert_eq!(summary.duplicate_rows, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The finder's configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Flag rows that duplicate an earlier row.
    ///
    /// # Arguments
    ///
    /// * `table` - The table to inspect (not modified)
    /// * `exact_columns` - Columns compared for exact equality
    /// * `tolerance_columns` - Columns compared within tolerance
    ///
    /// # Returns
    ///
    /// A tuple of:
    /// - `DuplicateFlags` - One flag per row, in original order
    /// - `DetectionSummary` - Statistics about the run
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - A column does not exist in the table
    /// - A column is both exact and tolerance
    /// - Both column lists are empty
    /// - A tolerance array has the wrong length or a bad value
    ///
    /// A table with no rows always yields empty flags.
    pub fn find<E, T>(
        &self,
        table: &Table,
        exact_columns: &[E],
        tolerance_columns: &[T],
    ) -> Result<(DuplicateFlags, DetectionSummary), FinderError>
    where
        E: AsRef<str>,
        T: AsRef<str>,
    {
        let start_time = Instant::now();

        if table.is_empty() {
            log::debug!("Empty table, nothing to compare");
            return Ok((DuplicateFlags::default(), DetectionSummary::default()));
        }

        let selection = Selection::resolve(table, exact_columns, tolerance_columns)?;
        let tol = self.config.tolerance.resolve(selection.tolerance.len())?;

        log::info!(
            "Finding duplicates in {} rows ({} exact, {} tolerance columns, {} mode)",
            table.row_count(),
            selection.exact.len(),
            selection.tolerance.len(),
            self.config.tolerance.mode
        );

        let (candidates, grouping) = select_candidates(&selection.exact, table.row_count());
        let parallel = self.config.parallel && candidates.len() >= self.config.parallel_threshold;
        let flags = run_stages(&selection, &candidates, &tol, table.row_count(), parallel);

        let summary = build_summary(&grouping, &flags, parallel, start_time.elapsed());
        log::info!(
            "Flagged {} of {} rows as duplicates in {:?}",
            summary.duplicate_rows,
            summary.total_rows,
            summary.duration
        );

        Ok((flags, summary))
    }
}

/// Flag rows that duplicate an earlier row under exact equality on
/// `exact_columns` and closeness on `tolerance_columns`.
///
/// Equivalent to [`DuplicateFinder::find`] with default settings and the
/// given tolerance, without the summary.
///
/// # Errors
///
/// See [`DuplicateFinder::find`].
pub fn duplicates_allclose<E, T>(
    table: &Table,
    exact_columns: &[E],
    tolerance_columns: &[T],
    tolerance: &Tolerance,
) -> Result<DuplicateFlags, FinderError>
where
    E: AsRef<str>,
    T: AsRef<str>,
{
    let finder = DuplicateFinder::new(FinderConfig::default().with_tolerance(tolerance.clone()));
    finder
        .find(table, exact_columns, tolerance_columns)
        .map(|(flags, _)| flags)
}

/// Remove flagged rows, keeping the first occurrence of each duplicate
/// chain.
///
/// # Errors
///
/// Returns [`FinderError::FlagLengthMismatch`] if the flags were not
/// computed for a table of this size.
pub fn drop_duplicates(table: &Table, flags: &DuplicateFlags) -> Result<Table, FinderError> {
    if flags.len() != table.row_count() {
        return Err(FinderError::FlagLengthMismatch {
            expected: table.row_count(),
            actual: flags.len(),
        });
    }
    Ok(table.take_rows(&flags.kept_rows()))
}

/// Exact and tolerance columns looked up in a table.
struct Selection<'a> {
    exact: Vec<&'a Column>,
    tolerance: Vec<&'a Column>,
}

impl<'a> Selection<'a> {
    fn resolve<E, T>(table: &'a Table, exact: &[E], tolerance: &[T]) -> Result<Self, FinderError>
    where
        E: AsRef<str>,
        T: AsRef<str>,
    {
        if exact.is_empty() && tolerance.is_empty() {
            return Err(FinderError::NoColumns);
        }

        if let Some(name) = exact
            .iter()
            .map(AsRef::as_ref)
            .find(|e| tolerance.iter().any(|t| t.as_ref() == *e))
        {
            return Err(FinderError::OverlappingColumn(name.to_string()));
        }

        Ok(Self {
            exact: lookup(table, exact)?,
            tolerance: lookup(table, tolerance)?,
        })
    }
}

fn lookup<'a, S: AsRef<str>>(table: &'a Table, names: &[S]) -> Result<Vec<&'a Column>, FinderError> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            table.column(name).ok_or_else(|| FinderError::UnknownColumn {
                column: name.to_string(),
                suggestion: suggest_column(table, name),
            })
        })
        .collect()
}

/// Closest column name by Jaro-Winkler similarity.
fn suggest_column(table: &Table, name: &str) -> Option<String> {
    table
        .column_names()
        .map(|candidate| (candidate, strsim::jaro_winkler(name, candidate)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate.to_string())
}

fn run_stages(
    selection: &Selection<'_>,
    candidates: &[usize],
    tol: &ResolvedTolerance,
    total_rows: usize,
    parallel: bool,
) -> DuplicateFlags {
    let sorted = sort_candidates(candidates, &selection.exact, &selection.tolerance);
    log::debug!("Sorted {} candidate rows", sorted.len());

    let matrix = compare_adjacent(&sorted, &selection.exact, &selection.tolerance, tol, parallel);
    let row_flags = matrix.collapse();
    log::debug!(
        "Adjacent comparison over {} columns ({})",
        matrix.columns().len(),
        if parallel { "parallel" } else { "sequential" }
    );

    DuplicateFlags::new(project_flags(&sorted, &row_flags, total_rows))
}

fn build_summary(
    grouping: &GroupingStats,
    flags: &DuplicateFlags,
    parallel: bool,
    duration: Duration,
) -> DetectionSummary {
    DetectionSummary {
        total_rows: grouping.total_rows,
        candidate_rows: grouping.candidate_rows,
        key_groups: grouping.key_groups,
        duplicate_rows: flags.duplicate_count(),
        parallel,
        duration,
    }
}
