//! CSV table reader.
//!
//! The first record is the header. Every cell is parsed with
//! [`Value::parse`]: empty cells are missing, numeric text becomes a
//! number, anything else stays text.

use std::io;

use super::InputError;
use crate::table::{Table, Value};

/// Read a CSV document into a table.
///
/// # Errors
///
/// Returns [`InputError::Csv`] for malformed CSV (including ragged rows)
/// and [`InputError::Table`] for duplicate header names.
pub fn read_csv<R: io::Read>(reader: R) -> Result<Table, InputError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let header: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(Value::parse).collect::<Vec<_>>());
    }

    log::debug!("Parsed {} CSV records with {} columns", rows.len(), header.len());
    Ok(Table::from_rows(header, rows)?)
}
