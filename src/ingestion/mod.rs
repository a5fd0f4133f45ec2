//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - performs ingestion into an in-memory [`crate::types::DataSet`]
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Sales dashboards usually go one level higher and call [`crate::sales::SalesTable::load`],
//! which also normalizes the text columns.
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]

pub mod cells;
pub mod csv;
pub mod json;
pub mod observability;
pub mod unified;

pub use cells::{CellOptions, DEFAULT_DATE_FORMAT};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    StdErrObserver,
};
pub use unified::{ingest_and_validate, ingest_from_path, IngestionFormat, IngestionOptions, IngestionRequest};
