//! Command-line parsing for the `sales-dashboard` binary.
//!
//! Argument parsing and command dispatch stay separate from the filtering/aggregation code:
//! everything here is mapped onto library option structs in [`crate::app`].

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::filters::{GroupBy, Governor};
use crate::ingestion::{IngestionFormat, DEFAULT_DATE_FORMAT};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sales-dashboard", version, about = "Filter, aggregate and export a sales dataset")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print KPI cards and chart datasets for the filtered rows as JSON.
    Summary(SummaryArgs),
    /// Print the region options (and default) for the governing selection as JSON.
    Regions(ViewArgs),
    /// Print one page of the filtered data table as JSON.
    Table(TableArgs),
    /// Write the filtered rows to `filtered_table_data.csv`.
    Export(ExportArgs),
}

/// Where the dataset comes from and how to log.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Sales dataset (CSV, TSV or JSON).
    #[arg(short = 'd', long, default_value = "sales_data.csv")]
    pub data: PathBuf,

    /// Force the input format instead of inferring it from the extension.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// `chrono` format of the Date column.
    #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,

    /// Log load and recompute events to stderr.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Append load events to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Filter selections. Omitted selectors keep their session default.
#[derive(Debug, Args, Clone)]
pub struct FilterArgs {
    /// Store ID, or "All".
    #[arg(long)]
    pub store: Option<String>,

    /// Product ID, or "All".
    #[arg(long)]
    pub product: Option<String>,

    /// Category (matched after title-casing, e.g. "electronics" → "Electronics").
    #[arg(long)]
    pub category: Option<String>,

    /// Region (must be one of the governed options when --governor is set).
    #[arg(long)]
    pub region: Option<String>,

    /// First day of the date range (YYYY-MM-DD); defaults to the earliest date in the data.
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the date range (YYYY-MM-DD); defaults to the latest date in the data.
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Filter the region options depend on.
    #[arg(long, value_enum)]
    pub governor: Option<GovernorArg>,
}

#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Column the charts are grouped by.
    #[arg(long, value_enum, default_value_t = GroupByArg::Category)]
    pub group_by: GroupByArg,
}

#[derive(Debug, Args, Clone)]
pub struct TableArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page.
    #[arg(long, default_value_t = crate::dashboard::DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Directory the CSV is written into.
    #[arg(short = 'o', long, default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Tsv,
    Json,
}

impl From<FormatArg> for IngestionFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => IngestionFormat::Csv,
            FormatArg::Tsv => IngestionFormat::Tsv,
            FormatArg::Json => IngestionFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupByArg {
    Category,
    Region,
}

impl From<GroupByArg> for GroupBy {
    fn from(g: GroupByArg) -> Self {
        match g {
            GroupByArg::Category => GroupBy::Category,
            GroupByArg::Region => GroupBy::Region,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GovernorArg {
    Category,
    StoreProduct,
}

impl From<GovernorArg> for Governor {
    fn from(g: GovernorArg) -> Self {
        match g {
            GovernorArg::Category => Governor::Category,
            GovernorArg::StoreProduct => Governor::StoreProduct,
        }
    }
}
