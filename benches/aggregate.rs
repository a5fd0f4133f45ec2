use std::sync::Arc;

use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sales_dashboard::dashboard::aggregate;
use sales_dashboard::filters::{FilterState, Governor, Selection};
use sales_dashboard::sales::{sales_schema, SalesTable};
use sales_dashboard::session::{FilterChange, Session, SessionOptions};
use sales_dashboard::types::{DataSet, Value};

const CATEGORIES: [&str; 5] = ["Toys", "Books", "Garden", "Clothing", "Electronics"];
const REGIONS: [&str; 4] = ["North", "South", "East", "West"];

fn build_table(rows: usize) -> SalesTable {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default();
    let data = (0..rows)
        .map(|i| {
            let date = start.checked_add_days(Days::new((i % 730) as u64)).unwrap_or(start);
            vec![
                Value::Utf8(format!("S{:03}", i % 20)),
                Value::Utf8(format!("P{:04}", i % 200)),
                Value::Utf8(CATEGORIES[i % CATEGORIES.len()].to_string()),
                Value::Utf8(REGIONS[(i / 7) % REGIONS.len()].to_string()),
                Value::Date(date),
                Value::Float64((i % 150) as f64),
                Value::Float64(10.0 + (i % 90) as f64 * 0.5),
                Value::Float64((i % 120) as f64),
                Value::Float64((i % 130) as f64),
            ]
        })
        .collect();
    SalesTable::from_dataset(DataSet::new(sales_schema(), data)).unwrap()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for rows in [10_000usize, 100_000] {
        let table = build_table(rows);
        let all = FilterState::unrestricted(&table);
        let narrow = all
            .clone()
            .with_store(Selection::only("S007"))
            .with_category(Selection::only("Garden"));

        group.bench_with_input(BenchmarkId::new("unrestricted", rows), &rows, |b, _| {
            b.iter(|| black_box(aggregate(&table, black_box(&all))))
        });
        group.bench_with_input(BenchmarkId::new("store_and_category", rows), &rows, |b, _| {
            b.iter(|| black_box(aggregate(&table, black_box(&narrow))))
        });
    }
    group.finish();
}

fn bench_session_cycle(c: &mut Criterion) {
    let table = Arc::new(build_table(100_000));
    let mut session = Session::new(
        Arc::clone(&table),
        SessionOptions {
            governor: Some(Governor::Category),
            ..Default::default()
        },
    );

    let mut flip = false;
    c.bench_function("session/category_change", |b| {
        b.iter(|| {
            flip = !flip;
            let category = if flip { "Toys" } else { "Books" };
            let update = session
                .apply([FilterChange::Category(Selection::only(category))])
                .unwrap();
            black_box(update);
        })
    });
}

criterion_group!(benches, bench_aggregate, bench_session_cycle);
criterion_main!(benches);
