//! Flattening of nested JSON structures into dotted-key maps.
//!
//! Every leaf of the input is stored under the path leading to it, with
//! path segments joined by `.`. Array indices are path segments too. Empty
//! objects and empty arrays are leaves and are kept as they are.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tabdupe::flatten::flatten;
//!
//! let flat = flatten(&json!({
//!     "calc": { "size": { "a": [0, 1] }, "script": "relax" }
//! }));
//!
//! assert_eq!(flat["calc.size.a.0"], json!(0));
//! assert_eq!(flat["calc.size.a.1"], json!(1));
//! assert_eq!(flat["calc.script"], json!("relax"));
//! ```

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

/// Path separator used in flattened keys.
pub const SEPARATOR: &str = ".";

/// Errors that can occur while reading a structure to flatten.
#[derive(Debug, Error)]
pub enum FlattenError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flatten a nested structure into a map keyed by dotted paths.
///
/// `null` at the root yields an empty map; any other scalar at the root is
/// stored under the empty key.
#[must_use]
pub fn flatten(value: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    if !value.is_null() {
        let mut path = Vec::new();
        walk(value, &mut path, &mut out);
    }
    out
}

/// Parse a JSON document and flatten it.
///
/// # Errors
///
/// Returns [`FlattenError::Json`] if `input` is not valid JSON.
pub fn flatten_str(input: &str) -> Result<Map<String, Value>, FlattenError> {
    let value: Value = serde_json::from_str(input)?;
    Ok(flatten(&value))
}

/// Read a JSON file and flatten it.
///
/// # Errors
///
/// Returns [`FlattenError`] if the file cannot be read or parsed.
pub fn flatten_file(path: &Path) -> Result<Map<String, Value>, FlattenError> {
    let content = fs::read_to_string(path).map_err(|source| FlattenError::Io {
        path: path.display().to_string(),
        source,
    })?;
    flatten_str(&content)
}

fn walk(value: &Value, path: &mut Vec<String>, out: &mut Map<String, Value>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                path.push(key.clone());
                walk(child, path, out);
                path.pop();
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (idx, child) in items.iter().enumerate() {
                path.push(idx.to_string());
                walk(child, path, out);
                path.pop();
            }
        }
        leaf => {
            out.insert(path.join(SEPARATOR), leaf.clone());
        }
    }
}
