//! The view aggregator.
//!
//! [`aggregate`] turns `(table, filter state)` into a [`DerivedView`]. It is pure, never
//! fails, and recomputes everything from the full table on each call: an empty subset is not
//! an error, it produces the empty KPIs, "No Data" charts and an empty table.
//!
//! ```rust
//! use sales_dashboard::dashboard::aggregate;
//! use sales_dashboard::filters::{FilterState, Selection};
//! use sales_dashboard::sales::{sales_schema, SalesTable};
//! use sales_dashboard::types::{DataSet, Value};
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let row = |store: &str, units: f64| vec![
//!     Value::Utf8(store.to_string()), Value::Utf8("P1".to_string()),
//!     Value::Utf8("toys".to_string()), Value::Utf8("north".to_string()),
//!     Value::Date(day), Value::Float64(1.0), Value::Float64(2.0),
//!     Value::Float64(units), Value::Float64(1.0),
//! ];
//! let table = SalesTable::from_dataset(DataSet::new(
//!     sales_schema(),
//!     vec![row("S1", 3.0), row("S2", 4.0)],
//! )).unwrap();
//!
//! let state = FilterState::unrestricted(&table).with_store(Selection::only("S2"));
//! let view = aggregate(&table, &state);
//! assert_eq!(view.kpis.total_units_sold, 4);
//! assert_eq!(view.kpis.most_sold_category.as_deref(), Some("Toys"));
//! ```

pub mod charts;
pub mod kpis;
pub mod table;

use serde::Serialize;

use crate::filters::FilterState;
use crate::processing::filter;
use crate::sales::SalesTable;
use crate::types::DataSet;

pub use charts::{Bar, BarChart, Charts, LineChart, Series, SeriesPoint, NO_DATA_TITLE};
pub use kpis::{KpiCards, Kpis, NOT_APPLICABLE};
pub use table::{Tab, TablePage, TableView, DEFAULT_PAGE_SIZE};

/// Every derived output for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    pub kpis: Kpis,
    pub charts: Charts,
    /// The filtered subset itself, all columns, original order.
    pub table: TableView,
}

impl DerivedView {
    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }
}

/// Rows of `table` matching every filter in `state`, original order, all columns.
pub fn filtered_subset(table: &SalesTable, state: &FilterState) -> DataSet {
    filter(table.dataset(), |cells| state.matches(&table.row(cells)))
}

/// Compute the full [`DerivedView`] for `state`.
pub fn aggregate(table: &SalesTable, state: &FilterState) -> DerivedView {
    let subset = filtered_subset(table, state);
    DerivedView {
        kpis: Kpis::compute(table, &subset),
        charts: Charts::compute(table, &subset, state.group_by),
        table: TableView::from_subset(subset),
    }
}
