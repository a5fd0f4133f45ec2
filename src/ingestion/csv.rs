//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

use super::cells::{parse_typed_value, CellOptions};

/// Ingest a comma-separated file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ).
/// - Each value is parsed according to the schema field type.
/// - Columns outside the schema are kept as text when
///   [`CellOptions::keep_extra_columns`] is set.
pub fn ingest_csv_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &CellOptions,
) -> IngestionResult<DataSet> {
    ingest_delimited_from_path(path, b',', schema, options)
}

/// Same as [`ingest_csv_from_path`] with an explicit field delimiter (e.g. `b'\t'`).
pub fn ingest_delimited_from_path(
    path: impl AsRef<Path>,
    delimiter: u8,
    schema: &Schema,
    options: &CellOptions,
) -> IngestionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema, options)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
    options: &CellOptions,
) -> IngestionResult<DataSet> {
    let headers = rdr.headers()?.clone();

    for field in &schema.fields {
        if !headers.iter().any(|h| h.trim() == field.name) {
            return Err(IngestionError::SchemaMismatch {
                message: format!(
                    "missing required column '{field}'. headers={:?}",
                    headers.iter().collect::<Vec<_>>(),
                    field = field.name
                ),
            });
        }
    }

    // Output fields paired with their source column index.
    let layout: Vec<(Field, usize)> = if options.keep_extra_columns {
        headers
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                let name = h.trim();
                let data_type = schema
                    .fields
                    .iter()
                    .find(|f| f.name == name)
                    .map(|f| f.data_type.clone())
                    .unwrap_or(DataType::Utf8);
                (Field::new(name, data_type), idx)
            })
            .collect()
    } else {
        schema
            .fields
            .iter()
            .filter_map(|f| {
                headers
                    .iter()
                    .position(|h| h.trim() == f.name)
                    .map(|idx| (f.clone(), idx))
            })
            .collect()
    };

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(layout.len());
        for (field, csv_idx) in &layout {
            let raw = record.get(*csv_idx).unwrap_or("");
            row.push(parse_typed_value(
                user_row,
                &field.name,
                &field.data_type,
                raw,
                options,
            )?);
        }
        rows.push(row);
    }

    let out_schema = Schema::new(layout.into_iter().map(|(f, _)| f).collect());
    Ok(DataSet::new(out_schema, rows))
}
