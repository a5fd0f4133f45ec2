//! The sales table: a loaded, normalized, immutable [`DataSet`] plus typed access to the
//! columns the dashboard reads.
//!
//! A [`SalesTable`] is built once at startup and then shared read-only (usually behind an
//! `Arc`) by every session. Loading is all-or-nothing: any problem with the source is
//! returned as an [`IngestionError`] and no table is produced.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{IngestionError, IngestionResult};
use crate::filters::{DateRange, GroupBy};
use crate::ingestion::{IngestionOptions, IngestionRequest};
use crate::processing::{map_text_columns, reduce, ReduceOp};
use crate::types::{DataSet, DataType, Field, Schema, Value};

pub const STORE_ID: &str = "Store ID";
pub const PRODUCT_ID: &str = "Product ID";
pub const CATEGORY: &str = "Category";
pub const REGION: &str = "Region";
pub const DATE: &str = "Date";
pub const DEMAND: &str = "Demand";
pub const PRICE: &str = "Price";
pub const UNITS_SOLD: &str = "Units Sold";
pub const UNITS_ORDERED: &str = "Units Ordered";

/// The required columns of a sales source. Sources may carry more columns; they are kept.
pub fn sales_schema() -> Schema {
    Schema::new(vec![
        Field::new(STORE_ID, DataType::Utf8),
        Field::new(PRODUCT_ID, DataType::Utf8),
        Field::new(CATEGORY, DataType::Utf8),
        Field::new(REGION, DataType::Utf8),
        Field::new(DATE, DataType::Date),
        Field::new(DEMAND, DataType::Float64),
        Field::new(PRICE, DataType::Float64),
        Field::new(UNITS_SOLD, DataType::Float64),
        Field::new(UNITS_ORDERED, DataType::Float64),
    ])
}

/// Positions of the required columns inside the table's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesColumns {
    pub store_id: usize,
    pub product_id: usize,
    pub category: usize,
    pub region: usize,
    pub date: usize,
    pub demand: usize,
    pub price: usize,
    pub units_sold: usize,
    pub units_ordered: usize,
}

impl SalesColumns {
    fn resolve(schema: &Schema) -> IngestionResult<Self> {
        let find = |name: &str, accepts: &[DataType]| -> IngestionResult<usize> {
            let idx = schema.index_of(name).ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!(
                    "missing required column '{name}'. columns={:?}",
                    schema.field_names().collect::<Vec<_>>()
                ),
            })?;
            let actual = &schema.fields[idx].data_type;
            if accepts.contains(actual) {
                Ok(idx)
            } else {
                Err(IngestionError::SchemaMismatch {
                    message: format!("column '{name}' has type {actual:?}, expected one of {accepts:?}"),
                })
            }
        };
        let text = [DataType::Utf8];
        let number = [DataType::Float64, DataType::Int64];

        Ok(Self {
            store_id: find(STORE_ID, &text)?,
            product_id: find(PRODUCT_ID, &text)?,
            category: find(CATEGORY, &text)?,
            region: find(REGION, &text)?,
            date: find(DATE, &[DataType::Date])?,
            demand: find(DEMAND, &number)?,
            price: find(PRICE, &number)?,
            units_sold: find(UNITS_SOLD, &number)?,
            units_ordered: find(UNITS_ORDERED, &number)?,
        })
    }
}

/// Immutable, normalized sales dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesTable {
    data: DataSet,
    columns: SalesColumns,
    dates: DateRange,
}

impl SalesTable {
    /// Load and normalize a sales source (CSV, TSV or JSON; see [`IngestionOptions`]).
    ///
    /// The configured observer hears about the load once the table has been validated, so a
    /// rejected dataset is reported as a failure.
    pub fn load(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<Self> {
        let request = IngestionRequest {
            path: path.as_ref().to_path_buf(),
            schema: sales_schema(),
            options: options.clone(),
        };
        request.run_validated(|data, format| Self::validate(data, format.first_data_row()))
    }

    /// Validate and normalize an already-ingested dataset.
    ///
    /// Category and Region are trimmed and title-cased; every row must carry a date; the
    /// dataset must have at least one row.
    ///
    /// Row numbers in errors count data rows from 1.
    pub fn from_dataset(data: DataSet) -> IngestionResult<Self> {
        Self::validate(data, 1)
    }

    /// `first_row` is the number reported for the first data row.
    fn validate(data: DataSet, first_row: usize) -> IngestionResult<Self> {
        let columns = SalesColumns::resolve(&data.schema)?;

        for (idx0, row) in data.rows.iter().enumerate() {
            let cell = row.get(columns.date);
            if cell.and_then(Value::as_date).is_none() {
                return Err(IngestionError::ParseError {
                    row: idx0 + first_row,
                    column: DATE.to_string(),
                    raw: cell.map(Value::to_cell).unwrap_or_default(),
                    message: "a calendar date is required".to_string(),
                });
            }
        }

        let data = map_text_columns(&data, &[columns.category, columns.region], title_case);

        let bound = |op| match reduce(&data, DATE, op) {
            Some(Value::Date(d)) => Ok(d),
            _ => Err(IngestionError::EmptyDataset {
                source_name: "sales table".to_string(),
            }),
        };
        let dates = DateRange::spanning(bound(ReduceOp::Min)?, bound(ReduceOp::Max)?);

        Ok(Self { data, columns, dates })
    }

    /// The underlying dataset (all columns, source order).
    pub fn dataset(&self) -> &DataSet {
        &self.data
    }

    pub fn columns(&self) -> &SalesColumns {
        &self.columns
    }

    /// Column names in table order; this is the header of the table view and the export.
    pub fn column_names(&self) -> Vec<String> {
        self.data.schema.field_names().map(str::to_owned).collect()
    }

    pub fn row_count(&self) -> usize {
        self.data.row_count()
    }

    /// Earliest and latest date present; the default date filter.
    pub fn date_bounds(&self) -> DateRange {
        self.dates
    }

    /// Typed view over one row of this table (or of a subset sharing its schema).
    pub fn row<'a>(&'a self, cells: &'a [Value]) -> SalesRow<'a> {
        SalesRow {
            columns: &self.columns,
            cells,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = SalesRow<'_>> {
        self.data.rows.iter().map(|cells| self.row(cells))
    }

    /// Sorted, distinct store ids (options of the store selector, without the "All" entry).
    pub fn stores(&self) -> Vec<String> {
        distinct_sorted(self.rows().map(|r| r.store_id()))
    }

    pub fn products(&self) -> Vec<String> {
        distinct_sorted(self.rows().map(|r| r.product_id()))
    }

    pub fn categories(&self) -> Vec<String> {
        distinct_sorted(self.rows().map(|r| r.category()))
    }

    pub fn regions(&self) -> Vec<String> {
        distinct_sorted(self.rows().map(|r| r.region()))
    }
}

/// Typed accessors over a row's cells.
#[derive(Debug, Clone, Copy)]
pub struct SalesRow<'a> {
    columns: &'a SalesColumns,
    cells: &'a [Value],
}

impl<'a> SalesRow<'a> {
    pub fn store_id(&self) -> Option<&'a str> {
        self.text(self.columns.store_id)
    }

    pub fn product_id(&self) -> Option<&'a str> {
        self.text(self.columns.product_id)
    }

    pub fn category(&self) -> Option<&'a str> {
        self.text(self.columns.category)
    }

    pub fn region(&self) -> Option<&'a str> {
        self.text(self.columns.region)
    }

    /// Value of the chart grouping column.
    pub fn group(&self, group_by: GroupBy) -> Option<&'a str> {
        match group_by {
            GroupBy::Category => self.category(),
            GroupBy::Region => self.region(),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.cells.get(self.columns.date).and_then(Value::as_date)
    }

    pub fn demand(&self) -> Option<f64> {
        self.number(self.columns.demand)
    }

    pub fn price(&self) -> Option<f64> {
        self.number(self.columns.price)
    }

    pub fn units_sold(&self) -> Option<f64> {
        self.number(self.columns.units_sold)
    }

    pub fn units_ordered(&self) -> Option<f64> {
        self.number(self.columns.units_ordered)
    }

    /// All cells, in table column order.
    pub fn cells(&self) -> &'a [Value] {
        self.cells
    }

    fn text(&self, idx: usize) -> Option<&'a str> {
        self.cells.get(idx).and_then(Value::as_str)
    }

    fn number(&self, idx: usize) -> Option<f64> {
        self.cells.get(idx).and_then(Value::as_f64)
    }
}

/// Trim, then title-case: a letter is uppercased when it follows a non-letter (or starts the
/// string) and lowercased otherwise. `" north-EAST "` becomes `"North-East"`.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_is_letter = false;
    for ch in raw.trim().chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

pub(crate) fn distinct_sorted<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    values
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
