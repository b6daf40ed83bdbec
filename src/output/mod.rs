//! Output formatters for duplicate detection results.
//!
//! This module provides different output formats:
//! - JSON for automation and scripting
//! - CSV for spreadsheet import, either annotated or deduplicated
//! - plain flags, one per line, for shell pipelines
//!
//! # Example
//!
//! ```
//! use tabdupe::duplicates::DuplicateFinder;
//! use tabdupe::error::ExitCode;
//! use tabdupe::output::json::JsonOutput;
//! use tabdupe::table::{Column, Table};
//!
//! let table = Table::from_columns(vec![
//!     Column::from_strs("A", &["c", "c"]),
//!     Column::from_f64("C", &[1.0, 1.0]),
//! ])
//! .unwrap();
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (flags, summary) = finder.find(&table, &["A"], &["C"]).unwrap();
//!
//! let output = JsonOutput::new(&flags, &summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod flags;
pub mod json;

// Re-export main types
pub use csv::CsvOutput;
pub use flags::FlagsOutput;
pub use json::JsonOutput;
