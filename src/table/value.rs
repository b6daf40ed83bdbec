//! Cell values and their equality/ordering rules.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single table cell.
///
/// Numbers are kept as `f64` regardless of whether they came from an
/// integer or a float literal. `Missing` stands in for empty cells, JSON
/// `null` and NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Numeric cell
    Number(f64),
    /// Text / categorical cell
    Text(String),
    /// Empty or not-a-number cell
    Missing,
}

impl Value {
    /// Parse a raw text cell.
    ///
    /// Empty strings and NaN literals become `Missing`, anything that parses
    /// as `f64` becomes `Number`, the rest is kept as `Text`.
    ///
    /// # Example
    ///
    /// ```
    /// use tabdupe::table::Value;
    ///
    /// assert_eq!(Value::parse("1.5"), Value::Number(1.5));
    /// assert_eq!(Value::parse("abc"), Value::Text("abc".to_string()));
    /// assert_eq!(Value::parse(""), Value::Missing);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_nan() => Self::Missing,
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(raw.to_string()),
        }
    }

    /// Build a value from a float, mapping NaN to `Missing`.
    #[must_use]
    pub fn number(n: f64) -> Self {
        if n.is_nan() {
            Self::Missing
        } else {
            Self::Number(n)
        }
    }

    /// The numeric content, if any.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether this cell is missing.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Exact row-to-row equality.
    ///
    /// Numbers are equal only when their bit patterns match. `Missing` never
    /// equals anything, including another `Missing`.
    #[must_use]
    pub fn exact_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }

    /// Total order used when sorting exact columns: numbers, then text,
    /// then missing.
    #[must_use]
    pub fn key_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Order used when sorting tolerance columns: numbers ascending, every
    /// non-numeric value after all numbers and equal to each other.
    ///
    /// Numbers compare by value, so `-0.0` and `0.0` are equal here and a
    /// stable sort keeps their input order. NaN counts as non-numeric.
    #[must_use]
    pub fn numeric_cmp(&self, other: &Self) -> Ordering {
        let numeric = |v: &Self| v.as_f64().filter(|n| !n.is_nan());
        match (numeric(self), numeric(other)) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Missing => 2,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Missing => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Missing, Into::into)
    }
}

/// Grouping key wrapper: missing values compare equal to each other and
/// numbers compare by bit pattern.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeyCell<'a>(pub(crate) &'a Value);

impl PartialEq for KeyCell<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self.0, other.0) {
            (Value::Missing, Value::Missing) => true,
            (a, b) => a.exact_eq(b),
        }
    }
}

impl Eq for KeyCell<'_> {}

impl std::hash::Hash for KeyCell<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self.0 {
            Value::Number(n) => {
                0u8.hash(state);
                n.to_bits().hash(state);
            }
            Value::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            }
            Value::Missing => 2u8.hash(state),
        }
    }
}
