//! CSV output formatter for duplicate detection results.
//!
//! Writes the input table back out as CSV. Two shapes are supported:
//!
//! - annotated: every input row, plus a trailing `duplicates` column
//!   holding `true`/`false`
//! - dropped: only the rows that were not flagged, without the extra column
//!
//! Missing cells are written as empty fields.
//!
//! # Example
//!
//! ```
//! use tabdupe::duplicates::DuplicateFlags;
//! use tabdupe::output::csv::CsvOutput;
//! use tabdupe::table::{Column, Table};
//!
//! let table = Table::from_columns(vec![Column::from_f64("x", &[1.0, 1.0])]).unwrap();
//! let flags = DuplicateFlags::new(vec![false, true]);
//!
//! let csv = CsvOutput::new(&table, &flags).to_string().unwrap();
//! assert_eq!(csv, "x,duplicates\n1,false\n1,true\n");
//! ```

use std::io;

use thiserror::Error;

use crate::duplicates::DuplicateFlags;
use crate::table::Table;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The flag vector does not cover the table.
    #[error("Flag vector has {actual} entries but the table has {expected} rows")]
    LengthMismatch {
        /// Rows in the table
        expected: usize,
        /// Entries in the flag vector
        actual: usize,
    },
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    table: &'a Table,
    flags: &'a DuplicateFlags,
    drop: bool,
}

impl<'a> CsvOutput<'a> {
    /// Create a formatter that writes the annotated table.
    #[must_use]
    pub fn new(table: &'a Table, flags: &'a DuplicateFlags) -> Self {
        Self {
            table,
            flags,
            drop: false,
        }
    }

    /// Write only unflagged rows and omit the `duplicates` column.
    #[must_use]
    pub fn with_drop(mut self, drop: bool) -> Self {
        self.drop = drop;
        self
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing fails or the flags do not match
    /// the table.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        if self.flags.len() != self.table.row_count() {
            return Err(CsvOutputError::LengthMismatch {
                expected: self.table.row_count(),
                actual: self.flags.len(),
            });
        }

        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header: Vec<&str> = self.table.column_names().collect();
        if !self.drop {
            header.push(DuplicateFlags::NAME);
        }
        csv_writer.write_record(&header)?;

        for (row, flagged) in self.flags.iter().enumerate() {
            if self.drop && flagged {
                continue;
            }
            let mut record: Vec<String> = self.table.row(row).map(ToString::to_string).collect();
            if !self.drop {
                record.push(flagged.to_string());
            }
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
