//! `sales-dashboard` backs an interactive sales analytics dashboard: a sales dataset is loaded
//! once into an immutable in-memory [`sales::SalesTable`], and every user interaction
//! recomputes KPIs, chart datasets and a paginated raw-data table from it.
//!
//! ## Data flow
//!
//! ```text
//! control change ─▶ Session::apply ─▶ resolve_regions (only if a governing field changed)
//!                                  └▶ Kpis / Charts / TableView (only outputs whose inputs changed)
//! ```
//!
//! Every derived output is a pure function of `(table, filter state)`; nothing is cached
//! between cycles. An empty filtered subset is not an error: it yields [`dashboard::Kpis::empty`],
//! "No Data" charts and an empty table.
//!
//! ## Quick example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sales_dashboard::dashboard::aggregate;
//! use sales_dashboard::filters::{FilterState, Selection};
//! use sales_dashboard::ingestion::IngestionOptions;
//! use sales_dashboard::sales::SalesTable;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Fatal at startup if the file is missing, malformed or empty.
//! let table = Arc::new(SalesTable::load("sales_data.csv", &IngestionOptions::default())?);
//!
//! let state = FilterState::unrestricted(&table).with_store(Selection::only("S001"));
//! let view = aggregate(&table, &state);
//! println!("{}", view.kpis.cards().total_revenue);
//!
//! let csv = sales_dashboard::export::export_csv(&table, &state)?;
//! csv.write_to(".")?; // filtered_table_data.csv
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: CSV/TSV/JSON loading into a [`types::DataSet`], with load observers
//! - [`types`]: schema + in-memory dataset types
//! - [`processing`]: filter/map/reduce over datasets
//! - [`sales`]: the normalized sales table and typed row access
//! - [`filters`]: filter state, selections, the dependent region resolver
//! - [`dashboard`]: the view aggregator (KPIs, charts, table)
//! - [`export`]: CSV export of the filtered rows
//! - [`session`]: per-user filter state with dependency-driven recomputation
//! - [`error`]: error types

pub mod app;
pub mod cli;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod filters;
pub mod ingestion;
pub mod processing;
pub mod sales;
pub mod session;
pub mod types;

pub use error::{AppError, ExportError, IngestionError, IngestionResult, SessionError};
