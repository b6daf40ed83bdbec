//! Command-line interface definitions for tabdupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI has global options (verbosity, color, config) and two subcommands:
//! `find` for duplicate detection and `flatten` for turning nested JSON into
//! dotted keys.
//!
//! # Example
//!
//! ```bash
//! # Flag rows that share A and B and whose C values are within 0.02
//! tabdupe find data.csv --exact A,B --tolerance C --atol 0.02
//!
//! # Write the deduplicated table
//! tabdupe find data.csv -e A,B -t C --atol 0.02 --output csv --drop --destination clean.csv
//!
//! # Per-column tolerances, relative mode
//! tabdupe find data.json -t x,y --atol 0.1,0.5 --rtol 0.01 --mode affine
//!
//! # Flatten a nested JSON document
//! tabdupe flatten --input nested.json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::duplicates::ToleranceMode;
use crate::input::InputFormat;

/// Tolerance-aware duplicate row detection for tabular data.
///
/// tabdupe flags rows that repeat an earlier row: exact columns must match
/// exactly, tolerance columns may differ by up to a configurable tolerance.
#[derive(Debug, Parser)]
#[command(name = "tabdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Named profile from the configuration file
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for tabdupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Flag duplicate rows in a CSV or JSON table
    Find(FindArgs),
    /// Flatten a nested JSON document into dotted keys
    Flatten(FlattenArgs),
}

/// Arguments for the find subcommand.
#[derive(Debug, Args)]
pub struct FindArgs {
    /// Table to check (CSV with a header row, or JSON records)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Columns that must match exactly (comma-separated)
    #[arg(short, long = "exact", value_name = "COLS", value_delimiter = ',')]
    pub exact: Vec<String>,

    /// Columns compared within tolerance (comma-separated)
    #[arg(short, long = "tolerance", value_name = "COLS", value_delimiter = ',')]
    pub tolerance: Vec<String>,

    /// Absolute tolerance: one value, or one per tolerance column
    #[arg(long, value_name = "V", value_delimiter = ',', value_parser = parse_tolerance)]
    pub atol: Vec<f64>,

    /// Relative tolerance for --mode affine: one value, or one per tolerance column
    #[arg(long, value_name = "V", value_delimiter = ',', value_parser = parse_tolerance)]
    pub rtol: Vec<f64>,

    /// How tolerance columns are compared
    #[arg(long, value_enum)]
    pub mode: Option<ToleranceMode>,

    /// Input format (inferred from the file extension by default)
    #[arg(long, value_enum)]
    pub input_format: Option<InputFormat>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// With --output csv, write only the rows that are kept
    #[arg(long)]
    pub drop: bool,

    /// Write results to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub destination: Option<PathBuf>,

    /// Compare adjacent rows in parallel on large tables
    #[arg(long, overrides_with = "no_parallel")]
    pub parallel: bool,

    /// Compare adjacent rows sequentially
    #[arg(long, overrides_with = "parallel")]
    pub no_parallel: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the flatten subcommand.
#[derive(Debug, Args)]
pub struct FlattenArgs {
    /// JSON document to flatten; without it an empty object is produced
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Directory for --write (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Print the flattened document (default)
    #[arg(long, overrides_with = "no_print")]
    pub print: bool,

    /// Do not print the flattened document
    #[arg(long, overrides_with = "print")]
    pub no_print: bool,

    /// Write the flattened document to <DIR>/<stem>.flat.json
    #[arg(long)]
    pub write: bool,
}

impl FlattenArgs {
    /// Whether the flattened document goes to stdout.
    #[must_use]
    pub fn should_print(&self) -> bool {
        !self.no_print
    }
}

/// Output format for find results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Flags, flagged row positions and a summary as JSON
    #[default]
    Json,
    /// The input table with a `duplicates` column (or without flagged rows, with --drop)
    Csv,
    /// One true/false per line
    Flags,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Flags => write!(f, "flags"),
        }
    }
}

/// Parse a tolerance value.
///
/// # Examples
///
/// ```
/// use tabdupe::cli::parse_tolerance;
///
/// assert_eq!(parse_tolerance("0.02").unwrap(), 0.02);
/// assert_eq!(parse_tolerance("1e-10").unwrap(), 1e-10);
/// assert!(parse_tolerance("-1").is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, not a number, negative, or not
/// finite.
pub fn parse_tolerance(s: &str) -> Result<f64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Tolerance cannot be empty".to_string());
    }

    let value: f64 = s
        .parse()
        .map_err(|_| format!("Invalid number: '{s}'"))?;

    if !value.is_finite() {
        return Err(format!("Tolerance must be finite: '{s}'"));
    }
    if value < 0.0 {
        return Err("Tolerance cannot be negative".to_string());
    }
    Ok(value)
}
