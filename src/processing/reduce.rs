//! Reduction operations for [`crate::types::DataSet`].

use crate::types::{DataSet, DataType, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Arithmetic mean of numeric values, ignoring nulls. Always `Float64`.
    Mean,
    /// Minimum numeric or date value, ignoring nulls.
    Min,
    /// Maximum numeric or date value, ignoring nulls.
    Max,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Sum`/`Mean`/`Min`/`Max`, returns `Some(Value::Null)` if there are no non-null values
///   (or the column type does not support the op, e.g. `Sum` over dates).
/// - For `Count`, always returns `Some(Value::Int64(row_count))`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;
    let data_type = &dataset.schema.fields.get(idx)?.data_type;

    if op == ReduceOp::Count {
        return Some(Value::Int64(dataset.row_count() as i64));
    }

    Some(match data_type {
        DataType::Int64 => {
            let values = dataset.rows.iter().filter_map(|row| match row.get(idx) {
                Some(Value::Int64(v)) => Some(*v),
                _ => None,
            });
            reduce_ints(values, op)
        }
        DataType::Float64 => {
            let values = dataset.rows.iter().filter_map(|row| match row.get(idx) {
                Some(Value::Float64(v)) => Some(*v),
                _ => None,
            });
            reduce_floats(values, op)
        }
        DataType::Date => {
            let mut values = dataset.rows.iter().filter_map(|row| row.get(idx).and_then(Value::as_date));
            let out = match op {
                ReduceOp::Min => values.min(),
                ReduceOp::Max => values.max(),
                _ => None,
            };
            out.map(Value::Date).unwrap_or(Value::Null)
        }
        DataType::Utf8 => Value::Null,
    })
}

fn reduce_ints(values: impl Iterator<Item = i64>, op: ReduceOp) -> Value {
    let mut n = 0usize;
    let mut acc: Option<i64> = None;
    for v in values {
        n += 1;
        acc = Some(match (op, acc) {
            (_, None) => v,
            (ReduceOp::Sum | ReduceOp::Mean, Some(a)) => a + v,
            (ReduceOp::Min, Some(a)) => a.min(v),
            (ReduceOp::Max, Some(a)) => a.max(v),
            (ReduceOp::Count, Some(a)) => a,
        });
    }
    match (op, acc) {
        (_, None) => Value::Null,
        (ReduceOp::Mean, Some(sum)) => Value::Float64(sum as f64 / n as f64),
        (_, Some(a)) => Value::Int64(a),
    }
}

fn reduce_floats(values: impl Iterator<Item = f64>, op: ReduceOp) -> Value {
    let mut n = 0usize;
    let mut acc: Option<f64> = None;
    for v in values {
        n += 1;
        acc = Some(match (op, acc) {
            (_, None) => v,
            (ReduceOp::Sum | ReduceOp::Mean, Some(a)) => a + v,
            (ReduceOp::Min, Some(a)) => a.min(v),
            (ReduceOp::Max, Some(a)) => a.max(v),
            (ReduceOp::Count, Some(a)) => a,
        });
    }
    match (op, acc) {
        (_, None) => Value::Null,
        (ReduceOp::Mean, Some(sum)) => Value::Float64(sum / n as f64),
        (_, Some(a)) => Value::Float64(a),
    }
}
