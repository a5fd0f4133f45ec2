//! Row mapping for [`crate::types::DataSet`].

use crate::types::{DataSet, Value};

/// Returns a new [`DataSet`] by applying `mapper` to every row.
///
/// This is a convenience wrapper around [`DataSet::map_rows`].
///
/// # Panics
///
/// Panics if `mapper` returns rows with a different length than the schema field count.
pub fn map<F>(dataset: &DataSet, mapper: F) -> DataSet
where
    F: FnMut(&[Value]) -> Vec<Value>,
{
    dataset.map_rows(mapper)
}

/// Rewrite the text cells of the given columns in place of the originals.
///
/// Non-text cells (including nulls) are left as they are.
pub fn map_text_columns<F>(dataset: &DataSet, columns: &[usize], mut rewrite: F) -> DataSet
where
    F: FnMut(&str) -> String,
{
    map(dataset, |row| {
        row.iter()
            .enumerate()
            .map(|(idx, cell)| match cell {
                Value::Utf8(s) if columns.contains(&idx) => Value::Utf8(rewrite(s)),
                other => other.clone(),
            })
            .collect()
    })
}
