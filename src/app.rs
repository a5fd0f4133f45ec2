//! Top-level application orchestration for the `sales-dashboard` binary.
//!
//! `src/main.rs` is intentionally tiny; this module:
//! - parses CLI arguments
//! - loads the dataset once (fatal on any load error)
//! - opens a session and applies the requested filters as one batch
//! - prints the requested view as JSON, or writes the export

use std::sync::Arc;

use clap::Parser;
use serde::Serialize;

use crate::cli::{Cli, Command, ExportArgs, FilterArgs, SourceArgs, SummaryArgs, TableArgs, ViewArgs};
use crate::dashboard::{Charts, KpiCards, Kpis};
use crate::error::AppError;
use crate::filters::{DateRange, FilterState, GroupBy, RegionOptions, Selection};
use crate::ingestion::{
    CellOptions, CompositeObserver, FileObserver, IngestionObserver, IngestionOptions, IngestionSeverity,
    StdErrObserver,
};
use crate::sales::{title_case, SalesTable};
use crate::session::{FilterChange, Session, SessionOptions, StdErrSessionObserver};

/// Entry point for the `sales-dashboard` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Regions(args) => handle_regions(args),
        Command::Table(args) => handle_table(args),
        Command::Export(args) => handle_export(args),
    }
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    filters: &'a FilterState,
    cards: KpiCards,
    kpis: Kpis,
    charts: Charts,
}

#[derive(Serialize)]
struct RegionsOutput<'a> {
    filters: &'a FilterState,
    all_regions: Vec<String>,
    governed: Option<&'a RegionOptions>,
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let mut session = open_session(&args.view, SessionOptions::default())?;
    session.apply([FilterChange::GroupBy(GroupBy::from(args.group_by))])?;

    let update = session.snapshot();
    let kpis = update.kpis.unwrap_or_else(Kpis::empty);
    let out = SummaryOutput {
        filters: session.state(),
        cards: kpis.cards(),
        kpis,
        charts: update.charts.unwrap_or_else(Charts::no_data),
    };
    print_json(&out)
}

fn handle_regions(args: ViewArgs) -> Result<(), AppError> {
    let session = open_session(&args, SessionOptions::default())?;
    let out = RegionsOutput {
        filters: session.state(),
        all_regions: session.table().regions(),
        governed: session.region_options(),
    };
    print_json(&out)
}

fn handle_table(args: TableArgs) -> Result<(), AppError> {
    let options = SessionOptions {
        page_size: args.page_size,
        ..Default::default()
    };
    let session = open_session(&args.view, options)?;
    print_json(&session.table_page(args.page.saturating_sub(1)))
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let session = open_session(&args.view, SessionOptions::default())?;
    let artifact = session.export()?;
    let path = artifact.write_to(&args.out_dir)?;
    println!("wrote {} ({} bytes)", path.display(), artifact.bytes.len());
    Ok(())
}

fn open_session(args: &ViewArgs, mut options: SessionOptions) -> Result<Session, AppError> {
    let table = Arc::new(load_table(&args.source)?);

    options.governor = args.filters.governor.map(Into::into);
    if args.source.verbose {
        options.observer = Some(Arc::new(StdErrSessionObserver));
    }

    let mut session = Session::new(Arc::clone(&table), options);
    session.apply(filter_changes(&args.filters, &table)?)?;
    Ok(session)
}

fn load_table(args: &SourceArgs) -> Result<SalesTable, AppError> {
    let mut observers: Vec<Arc<dyn IngestionObserver>> = Vec::new();
    if args.verbose {
        observers.push(Arc::new(StdErrObserver));
    }
    if let Some(path) = &args.log_file {
        observers.push(Arc::new(FileObserver::new(path)));
    }

    let options = IngestionOptions {
        format: args.format.map(Into::into),
        cells: CellOptions {
            date_format: args.date_format.clone(),
            ..Default::default()
        },
        observer: (!observers.is_empty())
            .then(|| Arc::new(CompositeObserver::new(observers)) as Arc<dyn IngestionObserver>),
        alert_at_or_above: IngestionSeverity::Critical,
        ..Default::default()
    };

    Ok(SalesTable::load(&args.data, &options)?)
}

/// Translate CLI flags into one batch of changes. Category and region values are
/// normalized the same way the loader normalizes the data.
fn filter_changes(args: &FilterArgs, table: &SalesTable) -> Result<Vec<FilterChange>, AppError> {
    let mut changes = Vec::new();
    if let Some(store) = &args.store {
        changes.push(FilterChange::Store(Selection::from_option_label(store)));
    }
    if let Some(product) = &args.product {
        changes.push(FilterChange::Product(Selection::from_option_label(product)));
    }
    if let Some(category) = &args.category {
        changes.push(FilterChange::Category(Selection::from_option_label(&title_case(category))));
    }
    if let Some(region) = &args.region {
        changes.push(FilterChange::Region(Selection::from_option_label(&title_case(region))));
    }
    if args.from.is_some() || args.to.is_some() {
        let bounds = table.date_bounds();
        let range = DateRange::new(
            args.from.unwrap_or(bounds.start()),
            args.to.unwrap_or(bounds.end()),
        )?;
        changes.push(FilterChange::DateRange(range));
    }
    Ok(changes)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::new(5, format!("failed to render output: {e}")))?;
    println!("{text}");
    Ok(())
}
