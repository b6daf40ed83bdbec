//! In-memory columnar table.
//!
//! A [`Table`] is an ordered list of uniquely named [`Column`]s of equal
//! length. Row order defines the row index reported back by the duplicate
//! finder; it has no other meaning.
//!
//! # Example
//!
//! ```
//! use tabdupe::table::{Column, Table, Value};
//!
//! let table = Table::from_columns(vec![
//!     Column::new("A", vec!["c".into(), "c".into(), "e".into()]),
//!     Column::from_f64("C", &[1.0, 1.01, 2.0]),
//! ])
//! .unwrap();
//!
//! assert_eq!(table.row_count(), 3);
//! assert_eq!(table.column("C").unwrap().values()[1], Value::Number(1.01));
//! ```

mod value;

pub use value::Value;
pub(crate) use value::KeyCell;

use thiserror::Error;

/// Errors raised while building a table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// A column's length differs from the table's row count.
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        /// Offending column
        column: String,
        /// Row count of the table
        expected: usize,
        /// Row count of the column
        actual: usize,
    },

    /// Two columns share a name.
    #[error("Duplicate column name: '{0}'")]
    DuplicateColumn(String),

    /// A row was pushed with the wrong number of cells.
    #[error("Row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        /// Zero-based index of the offending row
        row: usize,
        /// Number of columns
        expected: usize,
        /// Number of cells supplied
        actual: usize,
    },
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Create a column from a name and its cells.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Create a numeric column. NaN entries become [`Value::Missing`].
    #[must_use]
    pub fn from_f64(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().copied().map(Value::from).collect())
    }

    /// Create a text column.
    #[must_use]
    pub fn from_strs(name: impl Into<String>, values: &[&str]) -> Self {
        Self::new(name, values.iter().copied().map(Value::from).collect())
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column cells in row order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered collection of equal-length, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Create an empty table (no columns, no rows).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if the columns differ in length or two
    /// columns share a name.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TableError> {
        let mut table = Self::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Build a table from a header and row-major cells.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] on duplicate header names or ragged rows.
    pub fn from_rows<I>(header: Vec<String>, rows: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = Vec<Value>>,
    {
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); header.len()];
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != header.len() {
                return Err(TableError::RowWidth {
                    row: idx,
                    expected: header.len(),
                    actual: row.len(),
                });
            }
            for (cells, value) in columns.iter_mut().zip(row) {
                cells.push(value);
            }
        }
        Self::from_columns(
            header
                .into_iter()
                .zip(columns)
                .map(|(name, values)| Column::new(name, values))
                .collect(),
        )
    }

    /// Append a column.
    ///
    /// The first column fixes the row count.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] on a length mismatch or a duplicate name.
    pub fn push_column(&mut self, column: Column) -> Result<(), TableError> {
        if self.column(column.name()).is_some() {
            return Err(TableError::DuplicateColumn(column.name().to_string()));
        }
        if self.columns.is_empty() {
            self.rows = column.len();
        } else if column.len() != self.rows {
            return Err(TableError::LengthMismatch {
                column: column.name().to_string(),
                expected: self.rows,
                actual: column.len(),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Builder-style variant of [`Table::push_column`].
    ///
    /// # Errors
    ///
    /// See [`Table::push_column`].
    pub fn with_column(mut self, column: Column) -> Result<Self, TableError> {
        self.push_column(column)?;
        Ok(self)
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// All columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Cells of one row, in column order.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &Value> {
        assert!(row < self.rows, "row {row} out of bounds ({})", self.rows);
        self.columns.iter().map(move |c| &c.values[row])
    }

    /// A new table holding only the given rows, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    #[must_use]
    pub fn take_rows(&self, rows: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), rows.iter().map(|&r| c.values[r].clone()).collect()))
            .collect();
        Self {
            columns,
            rows: rows.len(),
        }
    }
}
