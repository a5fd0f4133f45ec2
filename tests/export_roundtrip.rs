use std::path::PathBuf;

use sales_dashboard::dashboard::filtered_subset;
use sales_dashboard::export::{export_csv, EXPORT_FILENAME};
use sales_dashboard::filters::{FilterState, Selection};
use sales_dashboard::ingestion::IngestionOptions;
use sales_dashboard::sales::SalesTable;
use sales_dashboard::IngestionError;

fn scenario_table() -> SalesTable {
    SalesTable::load("tests/fixtures/scenario.csv", &IngestionOptions::default()).unwrap()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sales_dashboard_{name}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn exported_rows_reload_to_the_same_subset() {
    let table = scenario_table();
    let state = FilterState::unrestricted(&table).with_store(Selection::only("StoreA"));

    let artifact = export_csv(&table, &state).unwrap();
    assert_eq!(artifact.content_type, "text/csv");

    let dir = scratch_dir("roundtrip");
    let path = artifact.write_to(&dir).unwrap();
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(EXPORT_FILENAME));

    let reloaded = SalesTable::load(&path, &IngestionOptions::default()).unwrap();
    let expected = filtered_subset(&table, &state);
    assert_eq!(reloaded.column_names(), table.column_names());
    assert_eq!(reloaded.dataset().rows, expected.rows);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn export_header_follows_table_columns() {
    let table = scenario_table();
    let artifact = export_csv(&table, &FilterState::unrestricted(&table)).unwrap();
    let text = String::from_utf8(artifact.bytes).unwrap();

    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Date,Store ID,Product ID,Category,Region,Units Sold,Units Ordered,Demand,Price,Weather Condition")
    );
    assert_eq!(lines.next(), Some("2024-01-01,StoreA,ProdX,Electronics,North,8,9,10,5,Sunny"));
    assert_eq!(lines.count(), 2);
}

#[test]
fn empty_subset_exports_header_only() {
    let table = scenario_table();
    let state = FilterState::unrestricted(&table)
        .with_store(Selection::only("StoreB"))
        .with_product(Selection::only("ProdY"));

    let artifact = export_csv(&table, &state).unwrap();
    let text = String::from_utf8(artifact.bytes.clone()).unwrap();
    assert_eq!(text.lines().count(), 1);

    // A header-only file is not a loadable dataset.
    let dir = scratch_dir("empty_export");
    let path = artifact.write_to(&dir).unwrap();
    let err = SalesTable::load(&path, &IngestionOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::EmptyDataset { .. }));

    let _ = std::fs::remove_dir_all(&dir);
}
