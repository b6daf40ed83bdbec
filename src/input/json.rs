//! JSON records reader.
//!
//! Accepts either an array of objects (one row per object) or a single
//! object (one row). Each record is flattened with [`crate::flatten`], so
//! nested fields become dotted column names. The column set is the union
//! of all record keys in first-seen order; keys absent from a record are
//! missing in that row.

use std::collections::HashMap;
use std::io;

use serde_json::{Map, Value as Json};

use super::InputError;
use crate::flatten::flatten;
use crate::table::{Column, Table, Value};

/// Read a JSON document of records into a table.
///
/// # Errors
///
/// Returns [`InputError::Json`] for invalid JSON and
/// [`InputError::NotARecord`] when the document (or an array element) is
/// not an object.
pub fn read_json<R: io::Read>(reader: R) -> Result<Table, InputError> {
    let document: Json = serde_json::from_reader(reader)?;
    let records = match document {
        Json::Array(items) => items,
        obj @ Json::Object(_) => vec![obj],
        _ => return Err(InputError::NotARecord { index: 0 }),
    };

    let flat: Vec<Map<String, Json>> = records
        .iter()
        .enumerate()
        .map(|(index, record)| match record {
            // An empty record adds a row but no columns
            Json::Object(fields) if fields.is_empty() => Ok(Map::new()),
            Json::Object(_) => Ok(flatten(record)),
            _ => Err(InputError::NotARecord { index }),
        })
        .collect::<Result<_, _>>()?;

    records_to_table(&flat)
}

/// Build a table from flattened records.
///
/// # Errors
///
/// Never fails for well-formed records; errors only surface from table
/// construction.
pub fn records_to_table(records: &[Map<String, Json>]) -> Result<Table, InputError> {
    let mut names: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for record in records {
        for key in record.keys() {
            if !positions.contains_key(key) {
                positions.insert(key.clone(), names.len());
                names.push(key.clone());
            }
        }
    }

    let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(records.len()); names.len()];
    for record in records {
        for (name, cells) in names.iter().zip(columns.iter_mut()) {
            cells.push(record.get(name).map_or(Value::Missing, cell_from_json));
        }
    }

    log::debug!("Parsed {} JSON records into {} columns", records.len(), names.len());
    Ok(Table::from_columns(
        names
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )?)
}

fn cell_from_json(value: &Json) -> Value {
    match value {
        Json::Null => Value::Missing,
        Json::Number(n) => n.as_f64().map_or(Value::Missing, Value::from),
        Json::String(s) => Value::Text(s.clone()),
        other => Value::Text(other.to_string()),
    }
}
