//! In-memory data transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion.
//! It is intentionally simple and purely in-memory; the dashboard aggregator is built from
//! these pieces.
//!
//! - [`filter()`]: row filtering by predicate
//! - [`map()`] / [`map_text_columns()`]: row mapping by user function
//! - [`reduce()`]: common reductions (count/sum/mean/min/max)
//!
//! ## Example: filter → reduce
//!
//! ```rust
//! use sales_dashboard::processing::{filter, reduce, ReduceOp};
//! use sales_dashboard::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("Store ID", DataType::Utf8),
//!     Field::new("Demand", DataType::Float64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("S1".to_string()), Value::Float64(10.0)],
//!         vec![Value::Utf8("S2".to_string()), Value::Float64(20.0)],
//!         vec![Value::Utf8("S1".to_string()), Value::Null],
//!     ],
//! );
//!
//! let store_idx = ds.schema.index_of("Store ID").unwrap();
//! let s1 = filter(&ds, |row| row[store_idx].as_str() == Some("S1"));
//!
//! // Nulls are ignored.
//! let sum = reduce(&s1, "Demand", ReduceOp::Sum).unwrap();
//! assert_eq!(sum, Value::Float64(10.0));
//! ```

pub mod filter;
pub mod map;
pub mod reduce;

pub use filter::filter;
pub use map::{map, map_text_columns};
pub use reduce::{reduce, ReduceOp};
