use chrono::NaiveDate;
use sales_dashboard::ingestion::json::{ingest_json_from_path, ingest_json_from_str};
use sales_dashboard::ingestion::CellOptions;
use sales_dashboard::sales::sales_schema;
use sales_dashboard::types::{DataType, Field, Schema, Value};

#[test]
fn ingest_json_array_from_path_happy_path() {
    let ds = ingest_json_from_path("tests/fixtures/scenario.json", &sales_schema(), &CellOptions::default()).unwrap();

    assert_eq!(ds.row_count(), 3);
    assert_eq!(ds.schema, sales_schema());
    assert_eq!(ds.rows[0][0], Value::Utf8("StoreA".to_string()));
    assert_eq!(ds.rows[0][2], Value::Utf8("electronics".to_string()));
    assert_eq!(ds.rows[0][4], Value::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
    assert_eq!(ds.rows[2][6], Value::Float64(20.0));
}

#[test]
fn ingest_json_ndjson_happy_path() {
    let input = r#"
{"Store ID":"S1","Product ID":"P1","Category":"Toys","Region":"North","Date":"2024-01-01","Demand":10,"Price":2.5,"Units Sold":8,"Units Ordered":10}
{"Store ID":"S2","Product ID":"P1","Category":"Toys","Region":"East","Date":"2024-01-02","Demand":12,"Price":2.5,"Units Sold":11,"Units Ordered":12}
"#;
    let ds = ingest_json_from_str(input, &sales_schema(), &CellOptions::default()).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.rows[1][3], Value::Utf8("East".to_string()));
}

#[test]
fn numeric_ids_are_kept_as_text() {
    let schema = Schema::new(vec![Field::new("Store ID", DataType::Utf8)]);
    let ds = ingest_json_from_str(r#"[{"Store ID": 17}]"#, &schema, &CellOptions::default()).unwrap();
    assert_eq!(ds.rows[0][0], Value::Utf8("17".to_string()));
}

#[test]
fn nested_fields_resolve_by_dot_path() {
    let schema = Schema::new(vec![Field::new("store.id", DataType::Utf8)]);
    let ds = ingest_json_from_str(r#"[{"store": {"id": "S9"}}]"#, &schema, &CellOptions::default()).unwrap();
    assert_eq!(ds.rows[0][0], Value::Utf8("S9".to_string()));
}

#[test]
fn ingest_json_errors_on_missing_field() {
    let input = r#"[{"Store ID":"S1","Product ID":"P1","Category":"Toys","Region":"North","Date":"2024-01-01","Demand":10,"Price":2.5,"Units Sold":8}]"#;
    let err = ingest_json_from_str(input, &sales_schema(), &CellOptions::default()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required field 'Units Ordered'"));
}

#[test]
fn ingest_json_errors_on_type_mismatch() {
    let input = r#"[{"Store ID":"S1","Product ID":"P1","Category":"Toys","Region":"North","Date":"2024-01-01","Demand":true,"Price":2.5,"Units Sold":8,"Units Ordered":10}]"#;
    let err = ingest_json_from_str(input, &sales_schema(), &CellOptions::default()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value"));
    assert!(msg.contains("column 'Demand'"));
}

#[test]
fn ingest_json_errors_on_empty_input() {
    let err = ingest_json_from_str("  \n", &sales_schema(), &CellOptions::default()).unwrap_err();
    assert!(err.to_string().contains("json input is empty"));
}
