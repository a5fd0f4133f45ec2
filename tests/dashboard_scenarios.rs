use chrono::NaiveDate;
use sales_dashboard::dashboard::{aggregate, filtered_subset, Charts, Kpis, NO_DATA_TITLE};
use sales_dashboard::filters::{resolve_regions, DateRange, FilterState, Governor, GroupBy, Selection};
use sales_dashboard::ingestion::IngestionOptions;
use sales_dashboard::sales::SalesTable;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn scenario_table() -> SalesTable {
    SalesTable::load("tests/fixtures/scenario.csv", &IngestionOptions::default()).unwrap()
}

fn sales_table() -> SalesTable {
    SalesTable::load("tests/fixtures/sales.csv", &IngestionOptions::default()).unwrap()
}

#[test]
fn loader_normalizes_labels_and_finds_date_bounds() {
    let table = scenario_table();

    assert_eq!(table.row_count(), 3);
    assert_eq!(table.categories(), vec!["Clothing", "Electronics"]);
    assert_eq!(table.regions(), vec!["North", "South"]);
    assert_eq!(table.stores(), vec!["StoreA", "StoreB"]);
    assert_eq!(table.date_bounds(), DateRange::new(day(1), day(3)).unwrap());
}

#[test]
fn all_rows_across_full_date_range() {
    let table = scenario_table();
    let view = aggregate(&table, &FilterState::unrestricted(&table));

    let kpis = &view.kpis;
    assert_eq!(kpis.row_count, 3);
    assert_eq!(kpis.total_demand, 17);
    assert_eq!(kpis.total_units_sold, 13);
    assert_eq!(kpis.total_units_ordered, 16);
    assert_eq!(kpis.total_revenue, 100.0);
    assert_eq!(kpis.average_price, 11.67);
    assert_eq!(kpis.most_sold_category.as_deref(), Some("Electronics"));

    let cards = kpis.cards();
    assert_eq!(cards.total_revenue, "$100.00");
    assert_eq!(cards.average_price, "$11.67");
    assert_eq!(cards.most_sold_category, "Electronics");
}

#[test]
fn single_day_range_keeps_only_that_day() {
    let table = scenario_table();
    let state = FilterState::unrestricted(&table).with_date_range(DateRange::single(day(3)));
    let view = aggregate(&table, &state);

    assert_eq!(view.kpis.row_count, 1);
    assert_eq!(view.kpis.total_demand, 2);
    assert_eq!(view.kpis.total_units_ordered, 2);
    assert_eq!(view.kpis.most_sold_category.as_deref(), Some("Clothing"));
    assert_eq!(view.table.rows.len(), 1);
}

#[test]
fn no_matching_rows_yields_empty_state_view() {
    let table = scenario_table();
    let state = FilterState::unrestricted(&table)
        .with_store(Selection::only("StoreB"))
        .with_product(Selection::only("ProdY"));
    let view = aggregate(&table, &state);

    assert!(view.is_empty());
    assert_eq!(view.kpis, Kpis::empty());
    assert_eq!(view.charts, Charts::no_data());
    assert_eq!(view.charts.line.title, NO_DATA_TITLE);
    assert_eq!(view.charts.bar.title, NO_DATA_TITLE);
    assert!(view.table.rows.is_empty());

    let cards = view.kpis.cards();
    assert_eq!(cards.total_demand, "0");
    assert_eq!(cards.total_revenue, "$0");
    assert_eq!(cards.average_price, "$0");
    assert_eq!(cards.most_sold_category, "N/A");
}

#[test]
fn charts_group_units_sold_by_category() {
    let table = scenario_table();
    let view = aggregate(&table, &FilterState::unrestricted(&table));

    let line = &view.charts.line;
    assert_eq!(line.title, "Units Sold Over Time by Category");
    assert_eq!(line.legend_title.as_deref(), Some("Category"));
    let names: Vec<&str> = line.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Clothing", "Electronics"]);
    let electronics: Vec<(NaiveDate, f64)> = line.series[1].points.iter().map(|p| (p.date, p.units_sold)).collect();
    assert_eq!(electronics, vec![(day(1), 8.0), (day(2), 4.0)]);

    let bar = &view.charts.bar;
    assert_eq!(bar.title, "Total Units Sold by Category");
    assert_eq!(bar.y_label.as_deref(), Some("Units Sold"));
    let bars: Vec<(&str, f64)> = bar.bars.iter().map(|b| (b.group.as_str(), b.units_sold)).collect();
    assert_eq!(bars, vec![("Clothing", 1.0), ("Electronics", 12.0)]);
}

#[test]
fn charts_can_group_by_region() {
    let table = scenario_table();
    let state = FilterState::unrestricted(&table).with_group_by(GroupBy::Region);
    let charts = aggregate(&table, &state).charts;

    assert_eq!(charts.bar.title, "Total Units Sold by Region");
    let bars: Vec<(&str, f64)> = charts.bar.bars.iter().map(|b| (b.group.as_str(), b.units_sold)).collect();
    assert_eq!(bars, vec![("North", 9.0), ("South", 4.0)]);
}

#[test]
fn table_keeps_every_column_in_source_order() {
    let table = scenario_table();
    let state = FilterState::unrestricted(&table).with_region(Selection::only("North"));
    let view = aggregate(&table, &state);

    assert_eq!(view.table.columns, table.column_names());
    assert_eq!(view.table.columns.first().map(String::as_str), Some("Date"));
    assert_eq!(view.table.columns.last().map(String::as_str), Some("Weather Condition"));
    let stores: Vec<String> = view.table.rows.iter().map(|r| r[1].to_cell()).collect();
    assert_eq!(stores, vec!["StoreA", "StoreB"]);
}

#[test]
fn aggregation_is_pure_and_idempotent() {
    let table = sales_table();
    let state = FilterState::unrestricted(&table)
        .with_category(Selection::only("Toys"))
        .with_date_range(DateRange::new(day(2), day(5)).unwrap());

    let first = aggregate(&table, &state);
    let second = aggregate(&table, &state);
    assert_eq!(first, second);
    assert_eq!(first.kpis.row_count, 3);
    assert_eq!(first.kpis.total_units_sold, 30);
    assert_eq!(table.row_count(), 12);
}

#[test]
fn subset_is_the_same_predicate_for_every_output() {
    let table = sales_table();
    let state = FilterState::unrestricted(&table).with_store(Selection::only("S1"));
    let subset = filtered_subset(&table, &state);
    let view = aggregate(&table, &state);

    assert_eq!(subset.row_count(), 5);
    assert_eq!(view.kpis.row_count, subset.row_count());
    assert_eq!(view.table.rows, subset.rows);
}

#[test]
fn json_source_aggregates_like_csv() {
    let csv = scenario_table();
    let json = SalesTable::load("tests/fixtures/scenario.json", &IngestionOptions::default()).unwrap();

    assert_eq!(
        aggregate(&json, &FilterState::unrestricted(&json)).kpis,
        aggregate(&csv, &FilterState::unrestricted(&csv)).kpis
    );
}

#[test]
fn resolved_regions_are_sorted_distinct_and_present() {
    let table = sales_table();
    let all_regions = table.regions();

    for category in table.categories() {
        let state = FilterState::unrestricted(&table).with_category(Selection::only(category.as_str()));
        let opts = resolve_regions(&table, Governor::Category, &state);

        let mut sorted = opts.options.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(opts.options, sorted);
        assert!(opts.options.iter().all(|r| all_regions.contains(r)));
        assert_eq!(opts.default.as_ref(), opts.options.first());
        assert!(table
            .rows()
            .filter(|r| r.category() == Some(category.as_str()))
            .all(|r| r.region().is_none_or(|region| opts.options.iter().any(|o| o == region))));
    }

    let garden = FilterState::unrestricted(&table).with_category(Selection::only("Garden"));
    assert_eq!(resolve_regions(&table, Governor::Category, &garden).options, vec!["North", "West"]);
}

#[test]
fn store_product_governor_with_no_rows_has_no_default() {
    let table = sales_table();
    let state = FilterState::unrestricted(&table)
        .with_store(Selection::only("S1"))
        .with_product(Selection::only("P9"));
    let opts = resolve_regions(&table, Governor::StoreProduct, &state);

    assert!(opts.options.is_empty());
    assert_eq!(opts.default, None);
    assert_eq!(opts.default_selection(), Selection::NoValue);

    let s1_p1 = FilterState::unrestricted(&table)
        .with_store(Selection::only("S1"))
        .with_product(Selection::only("P1"));
    assert_eq!(resolve_regions(&table, Governor::StoreProduct, &s1_p1).options, vec!["North", "South"]);
}
