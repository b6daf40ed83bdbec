//! Table loaders.
//!
//! This module reads tables from files:
//! - CSV with a header row
//! - JSON, either an array of records or a single record; nested records
//!   are flattened into dotted column names
//!
//! # Example
//!
//! ```no_run
//! use tabdupe::input::load_table;
//! use std::path::Path;
//!
//! let table = load_table(Path::new("records.csv"), None).unwrap();
//! println!("{} rows, {} columns", table.row_count(), table.column_count());
//! ```

pub mod csv;
pub mod json;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::{Table, TableError};

/// Errors that can occur while loading a table.
#[derive(Debug, Error)]
pub enum InputError {
    /// I/O error while opening or reading a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON record is not an object.
    #[error("Record {index} is not a JSON object")]
    NotARecord {
        /// Zero-based record index
        index: usize,
    },

    /// The file extension does not name a supported format.
    #[error("Cannot infer input format from '{0}' (use .csv or .json, or pass --input-format)")]
    UnknownFormat(String),

    /// The loaded cells do not form a valid table.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Comma-separated values with a header row
    Csv,
    /// JSON records
    Json,
}

impl InputFormat {
    /// Infer the format from a file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`InputError::UnknownFormat`] for anything but `.csv` and
    /// `.json`.
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(InputError::UnknownFormat(path.display().to_string())),
        }
    }
}

/// Load a table from a file.
///
/// # Arguments
///
/// * `path` - File to read
/// * `format` - Explicit format; inferred from the extension when `None`
///
/// # Errors
///
/// Returns [`InputError`] if the file cannot be read, is malformed, or its
/// format cannot be determined.
pub fn load_table(path: &Path, format: Option<InputFormat>) -> Result<Table, InputError> {
    let format = match format {
        Some(format) => format,
        None => InputFormat::from_path(path)?,
    };

    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let reader = BufReader::new(file);

    let table = match format {
        InputFormat::Csv => self::csv::read_csv(reader)?,
        InputFormat::Json => self::json::read_json(reader)?,
    };

    log::info!(
        "Loaded {} rows and {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}
