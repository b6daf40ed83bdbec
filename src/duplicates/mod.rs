//! Tolerance-aware duplicate detection.
//!
//! This module provides functionality for:
//! - Exact-key candidate selection (Stage 1)
//! - Stable ordering of candidates (Stage 2)
//! - Adjacent-difference evaluation (Stage 3)
//! - Projection of flags onto the original table (Stage 4)
//!
//! [`duplicates_allclose`] and [`DuplicateFinder`] run all four stages; the
//! stage functions are public so each can be used and tested on its own.

pub mod adjacent;
pub mod candidates;
pub mod finder;
pub mod flags;
pub mod ordering;
pub mod projection;
pub mod tolerance;

pub use adjacent::{compare_adjacent, ComparisonMatrix};
pub use candidates::{select_candidates, GroupingStats};
pub use finder::{
    drop_duplicates, duplicates_allclose, DetectionSummary, DuplicateFinder, FinderConfig,
    FinderError, DEFAULT_PARALLEL_THRESHOLD,
};
pub use flags::DuplicateFlags;
pub use ordering::sort_candidates;
pub use projection::project_flags;
pub use tolerance::{Bound, ResolvedTolerance, Tolerance, ToleranceMode, DEFAULT_ATOL, DEFAULT_RTOL};
