//! Typed cell parsing shared by the CSV and JSON readers.

use chrono::NaiveDate;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataType, Value};

/// ISO-8601 calendar date, the default date column format.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// How raw text cells are turned into typed [`Value`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellOptions {
    /// `chrono` format string used for every [`DataType::Date`] column.
    pub date_format: String,
    /// Carry columns that are not in the schema through as [`DataType::Utf8`].
    ///
    /// When enabled the output schema follows the source column order; otherwise it follows the
    /// requested schema order and unknown columns are dropped.
    pub keep_extra_columns: bool,
}

impl Default for CellOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            keep_extra_columns: true,
        }
    }
}

/// Parse one raw cell. Empty (after trimming) cells become [`Value::Null`].
pub(crate) fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    raw: &str,
    options: &CellOptions,
) -> IngestionResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_err = |message: String| IngestionError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map_err(|e| parse_err(e.to_string()))
            .and_then(|v| {
                if v.is_finite() {
                    Ok(Value::Float64(v))
                } else {
                    Err(parse_err("expected a finite number".to_string()))
                }
            }),
        DataType::Date => NaiveDate::parse_from_str(trimmed, &options.date_format)
            .map(Value::Date)
            .map_err(|e| parse_err(format!("{e} (expected format '{}')", options.date_format))),
    }
}
