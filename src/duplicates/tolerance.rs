//! Tolerance parameters for the closeness test.
//!
//! A [`Tolerance`] carries an absolute bound (`atol`), a relative bound
//! (`rtol`) and the [`ToleranceMode`] that decides how they are combined.
//! Either bound may be a single scalar applied to every tolerance column or
//! one value per tolerance column.

use serde::{Deserialize, Serialize};

use super::finder::FinderError;
use crate::table::Value;

/// Default absolute tolerance.
pub const DEFAULT_ATOL: f64 = 1e-10;

/// Default relative tolerance (only used in [`ToleranceMode::Affine`]).
pub const DEFAULT_RTOL: f64 = 1e-10;

/// How the difference between adjacent rows is compared to the bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceMode {
    /// `|diff| <= atol`
    #[default]
    Absolute,
    /// `|diff| <= atol + rtol * |value|`, where `value` is the current row
    Affine,
}

impl std::fmt::Display for ToleranceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToleranceMode::Absolute => write!(f, "absolute"),
            ToleranceMode::Affine => write!(f, "affine"),
        }
    }
}

/// A tolerance bound: one scalar, or one value per tolerance column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    /// Same bound for every column
    Scalar(f64),
    /// One bound per tolerance column, in column order
    PerColumn(Vec<f64>),
}

impl Bound {
    /// Expand to one value per column, checking shape and sign.
    fn resolve(&self, parameter: &'static str, columns: usize) -> Result<Vec<f64>, FinderError> {
        let values = match self {
            Bound::Scalar(v) => vec![*v; columns.max(1)],
            Bound::PerColumn(values) => {
                if values.len() != columns {
                    return Err(FinderError::ToleranceLengthMismatch {
                        parameter,
                        expected: columns,
                        actual: values.len(),
                    });
                }
                values.clone()
            }
        };

        if let Some(&value) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(FinderError::InvalidTolerance { parameter, value });
        }

        Ok(values)
    }
}

impl From<f64> for Bound {
    fn from(v: f64) -> Self {
        Bound::Scalar(v)
    }
}

impl From<Vec<f64>> for Bound {
    fn from(values: Vec<f64>) -> Self {
        Bound::PerColumn(values)
    }
}

impl From<&[f64]> for Bound {
    fn from(values: &[f64]) -> Self {
        Bound::from(values.to_vec())
    }
}

/// Closeness parameters.
///
/// # Example
///
/// ```
/// use tabdupe::duplicates::{Tolerance, ToleranceMode};
///
/// let tol = Tolerance::absolute(0.02);
/// assert_eq!(tol.mode, ToleranceMode::Absolute);
///
/// let per_column = Tolerance::default()
///     .with_atol(vec![0.1, 0.2])
///     .with_rtol(1e-6)
///     .with_mode(ToleranceMode::Affine);
/// assert_eq!(per_column.mode, ToleranceMode::Affine);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Absolute bound
    pub atol: Bound,
    /// Relative bound
    pub rtol: Bound,
    /// Combination rule
    pub mode: ToleranceMode,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            atol: Bound::Scalar(DEFAULT_ATOL),
            rtol: Bound::Scalar(DEFAULT_RTOL),
            mode: ToleranceMode::Absolute,
        }
    }
}

impl Tolerance {
    /// Purely absolute tolerance with a scalar bound.
    #[must_use]
    pub fn absolute(atol: f64) -> Self {
        Self::default().with_atol(atol)
    }

    /// Set the absolute bound.
    #[must_use]
    pub fn with_atol(mut self, atol: impl Into<Bound>) -> Self {
        self.atol = atol.into();
        self
    }

    /// Set the relative bound.
    #[must_use]
    pub fn with_rtol(mut self, rtol: impl Into<Bound>) -> Self {
        self.rtol = rtol.into();
        self
    }

    /// Set the combination rule.
    #[must_use]
    pub fn with_mode(mut self, mode: ToleranceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate against the number of tolerance columns.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::ToleranceLengthMismatch`] if a per-column
    /// bound has the wrong length and [`FinderError::InvalidTolerance`] for
    /// negative or non-finite values.
    pub fn resolve(&self, columns: usize) -> Result<ResolvedTolerance, FinderError> {
        Ok(ResolvedTolerance {
            atol: self.atol.resolve("atol", columns)?,
            rtol: self.rtol.resolve("rtol", columns)?,
            mode: self.mode,
        })
    }
}

/// Validated tolerance with one bound per tolerance column.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTolerance {
    atol: Vec<f64>,
    rtol: Vec<f64>,
    mode: ToleranceMode,
}

impl ResolvedTolerance {
    /// Whether `current` is within tolerance of `previous` for the
    /// tolerance column at `column`.
    ///
    /// Non-numeric cells and non-finite differences are never close.
    #[must_use]
    pub fn is_close(&self, column: usize, previous: &Value, current: &Value) -> bool {
        let (Some(prev), Some(cur)) = (previous.as_f64(), current.as_f64()) else {
            return false;
        };
        let diff = (cur - prev).abs();
        match self.mode {
            ToleranceMode::Absolute => diff <= self.atol[column],
            ToleranceMode::Affine => diff <= self.atol[column] + self.rtol[column] * cur.abs(),
        }
    }
}
