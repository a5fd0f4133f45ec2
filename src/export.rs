//! CSV export of the currently filtered rows.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts: one header
//! row with the table's column names, then one record per filtered row, columns in table order.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::dashboard::filtered_subset;
use crate::error::ExportError;
use crate::filters::FilterState;
use crate::sales::SalesTable;
use crate::types::DataSet;

/// File name offered for the downloaded export.
pub const EXPORT_FILENAME: &str = "filtered_table_data.csv";

/// A named, downloadable CSV document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write the artifact into `dir` under its file name; returns the full path.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let path = dir.as_ref().join(&self.filename);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Filter `table` with `state` (same predicate as the dashboard views) and serialize the
/// result as [`EXPORT_FILENAME`].
pub fn export_csv(table: &SalesTable, state: &FilterState) -> Result<ExportArtifact, ExportError> {
    let subset = filtered_subset(table, state);
    let mut bytes = Vec::new();
    write_csv(&subset, &mut bytes)?;
    Ok(ExportArtifact {
        filename: EXPORT_FILENAME.to_string(),
        content_type: "text/csv",
        bytes,
    })
}

/// Serialize any dataset as CSV: header row, then one record per row. Nulls become empty
/// cells and dates are written as `YYYY-MM-DD`.
pub fn write_csv<W: Write>(dataset: &DataSet, out: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(|cell| cell.to_cell()))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::write_csv;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    #[test]
    fn write_csv_quotes_and_formats_cells() {
        let ds = DataSet::new(
            Schema::new(vec![
                Field::new("Region", DataType::Utf8),
                Field::new("Date", DataType::Date),
                Field::new("Price", DataType::Float64),
            ]),
            vec![
                vec![
                    Value::Utf8("North, East".to_string()),
                    Value::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
                    Value::Float64(9.5),
                ],
                vec![Value::Null, Value::Date(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()), Value::Float64(20.0)],
            ],
        );

        let mut out = Vec::new();
        write_csv(&ds, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Region,Date,Price\n\"North, East\",2024-01-02,9.5\n,2024-01-03,20\n"
        );
    }
}
