//! Row filtering for [`crate::types::DataSet`].

use crate::types::{DataSet, Value};

/// Returns a new [`DataSet`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`DataSet::filter_rows`]; surviving rows keep their
/// original relative order.
pub fn filter<F>(dataset: &DataSet, predicate: F) -> DataSet
where
    F: FnMut(&[Value]) -> bool,
{
    dataset.filter_rows(predicate)
}

#[cfg(test)]
mod tests {
    use super::filter;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("Store ID", DataType::Utf8),
            Field::new("Units Sold", DataType::Float64),
        ]);

        let rows = vec![
            vec![Value::Utf8("S1".to_string()), Value::Float64(8.0)],
            vec![Value::Utf8("S2".to_string()), Value::Float64(4.0)],
            vec![Value::Utf8("S1".to_string()), Value::Float64(1.0)],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn filter_keeps_matching_rows_in_order() {
        let ds = sample_dataset();
        let store_idx = ds.schema.index_of("Store ID").unwrap();

        let out = filter(&ds, |row| row[store_idx].as_str() == Some("S1"));

        assert_eq!(out.schema, ds.schema);
        assert_eq!(
            out.rows,
            vec![
                vec![Value::Utf8("S1".to_string()), Value::Float64(8.0)],
                vec![Value::Utf8("S1".to_string()), Value::Float64(1.0)],
            ]
        );
        // Original unchanged
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn filter_can_return_empty_dataset() {
        let ds = sample_dataset();
        let out = filter(&ds, |_| false);
        assert_eq!(out.schema, ds.schema);
        assert!(out.rows.is_empty());
    }
}
