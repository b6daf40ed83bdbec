//! JSON output formatter for duplicate detection results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [false, true, false, false, true],
//!   "duplicate_rows": [1, 4],
//!   "summary": {
//!     "total_rows": 5,
//!     "candidate_rows": 4,
//!     "key_groups": 2,
//!     "duplicate_rows": 2,
//!     "kept_rows": 3,
//!     "parallel": false,
//!     "duration_ms": 0,
//!     "exit_code": 0,
//!     "exit_code_name": "TD000"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DetectionSummary, DuplicateFlags};
use crate::error::ExitCode;

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Rows in the input table
    pub total_rows: usize,
    /// Rows sharing their exact key with another row
    pub candidate_rows: usize,
    /// Exact keys that occur two or more times
    pub key_groups: usize,
    /// Rows flagged as duplicates
    pub duplicate_rows: usize,
    /// Rows kept by keep-first deduplication
    pub kept_rows: usize,
    /// Whether the comparison stage ran in parallel
    pub parallel: bool,
    /// Duration of the detection in milliseconds
    pub duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "TD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a detection summary and an exit code.
    #[must_use]
    pub fn from_detection_summary(summary: &DetectionSummary, exit_code: ExitCode) -> Self {
        Self {
            total_rows: summary.total_rows,
            candidate_rows: summary.candidate_rows,
            key_groups: summary.key_groups,
            duplicate_rows: summary.duplicate_rows,
            kept_rows: summary.kept_rows(),
            parallel: summary.parallel,
            duration_ms: summary.duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// One flag per input row
    pub duplicates: DuplicateFlags,
    /// Positions of the flagged rows
    pub duplicate_rows: Vec<usize>,
    /// Detection summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from flags, summary and exit code.
    ///
    /// # Example
    ///
    /// ```
    /// use tabdupe::duplicates::{DetectionSummary, DuplicateFlags};
    /// use tabdupe::error::ExitCode;
    /// use tabdupe::output::json::JsonOutput;
    ///
    /// let flags = DuplicateFlags::new(vec![false, true]);
    /// let output = JsonOutput::new(&flags, &DetectionSummary::default(), ExitCode::Success);
    /// assert_eq!(output.duplicate_rows, vec![1]);
    /// ```
    #[must_use]
    pub fn new(flags: &DuplicateFlags, summary: &DetectionSummary, exit_code: ExitCode) -> Self {
        Self {
            duplicates: flags.clone(),
            duplicate_rows: flags.duplicate_rows(),
            summary: JsonSummary::from_detection_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - The writer to output to (e.g., stdout)
    /// * `pretty` - Whether to pretty-print the output
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
