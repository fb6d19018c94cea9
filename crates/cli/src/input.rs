//! Loading predicates, records and schemas from command-line inputs.

use std::path::Path;

use nearmiss_core::{Predicate, Record, Schema};
use tracing::debug;

pub(crate) fn parse_predicate(text: &str) -> Result<Predicate, String> {
    Predicate::parse(text).map_err(|e| format!("error: invalid predicate: {}", e))
}

fn read_json(path: &Path, what: &str) -> Result<serde_json::Value, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|_| format!("error: {} file not found: {}", what, path.display()))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("error: invalid JSON in {}: {}", path.display(), e))
}

/// A records file holds a JSON array of objects, or a single object.
pub(crate) fn load_records(path: &Path) -> Result<Vec<Record>, String> {
    let doc = read_json(path, "records")?;
    let items = match &doc {
        serde_json::Value::Array(items) => items.iter().collect(),
        serde_json::Value::Object(_) => vec![&doc],
        other => {
            return Err(format!(
                "error: {} must contain an array of record objects, found {}",
                path.display(),
                json_kind(other)
            ))
        }
    };
    let records = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            Record::from_json(item)
                .map_err(|e| format!("error: record {} in {}: {}", i, path.display(), e))
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!(path = %path.display(), count = records.len(), "records loaded");
    Ok(records)
}

pub(crate) fn load_schema(path: &Path) -> Result<Schema, String> {
    let doc = read_json(path, "schema")?;
    serde_json::from_value(doc)
        .map_err(|e| format!("error: invalid schema in {}: {}", path.display(), e))
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
