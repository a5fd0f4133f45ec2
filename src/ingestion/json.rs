//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Nested fields are supported using dot paths in schema field names (e.g. `store.id`).
//! Only schema fields are ingested; other keys are ignored.

use std::fs;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Schema, Value};

use super::cells::{parse_typed_value, CellOptions};

/// Ingest JSON into an in-memory `DataSet`.
pub fn ingest_json_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &CellOptions,
) -> IngestionResult<DataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text, schema, options)
}

/// Ingest JSON from an in-memory string into a [`DataSet`].
pub fn ingest_json_from_str(
    input: &str,
    schema: &Schema,
    options: &CellOptions,
) -> IngestionResult<DataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => ingest_json_values(&items, schema, options),
            serde_json::Value::Object(_) => ingest_json_values(&[v], schema, options),
            _ => Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for line in trimmed.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            values.push(serde_json::from_str::<serde_json::Value>(line)?);
        }
        ingest_json_values(&values, schema, options)
    }
}

fn ingest_json_values(
    values: &[serde_json::Value],
    schema: &Schema,
    options: &CellOptions,
) -> IngestionResult<DataSet> {
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(values.len());

    for (idx0, v) in values.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = v.as_object().ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!("row {row_num} is not a json object"),
        })?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let jv = get_by_dot_path(obj, &field.name).ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("row {row_num} missing required field '{}'", field.name),
            })?;
            row.push(convert_json_value(row_num, &field.name, &field.data_type, jv, options)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn get_by_dot_path<'a>(
    root: &'a serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Option<&'a serde_json::Value> {
    // Keys like "Store ID" are looked up verbatim before trying nested segments.
    if let Some(v) = root.get(path) {
        return Some(v);
    }

    let mut segments = path.split('.');
    let mut current: &serde_json::Value = root.get(segments.next()?)?;
    for segment in segments {
        match current {
            serde_json::Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

fn convert_json_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    v: &serde_json::Value,
    options: &CellOptions,
) -> IngestionResult<Value> {
    let type_err = |message: &str| IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw: v.to_string(),
        message: message.to_string(),
    };

    match v {
        serde_json::Value::Null => Ok(Value::Null),
        // Strings go through the same text parser as CSV cells.
        serde_json::Value::String(s) => parse_typed_value(row, column, data_type, s, options),
        serde_json::Value::Number(n) => match data_type {
            DataType::Float64 => n.as_f64().map(Value::Float64).ok_or_else(|| type_err("expected number")),
            DataType::Int64 => n
                .as_i64()
                .map(Value::Int64)
                .ok_or_else(|| type_err("expected integer number")),
            // Numeric identifiers (e.g. store ids) are kept as their textual form.
            DataType::Utf8 => Ok(Value::Utf8(n.to_string())),
            DataType::Date => Err(type_err("unexpected number")),
        },
        serde_json::Value::Bool(_) => Err(type_err("unexpected bool")),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            Err(type_err("expected a scalar value"))
        }
    }
}
