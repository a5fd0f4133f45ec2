//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_from_path`], which ingests a file into an in-memory
//! [`crate::types::DataSet`] using a provided [`crate::types::Schema`].
//!
//! - If [`IngestionOptions::format`] is `None`, the ingestion format is inferred from the file
//!   extension.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Schema};

use super::cells::CellOptions;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::{csv, json};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values (delimiter overridable via [`IngestionOptions::delimiter`]).
    Csv,
    /// Tab-separated values.
    Tsv,
    /// JSON array-of-objects or NDJSON.
    Json,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            "json" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }

    /// Row number the readers give the first data record in error messages: the file line
    /// for delimited text (the header is line 1), the record index for JSON.
    pub fn first_data_row(self) -> usize {
        match self {
            Self::Csv | Self::Tsv => 2,
            Self::Json => 1,
        }
    }

    fn default_delimiter(self) -> u8 {
        match self {
            Self::Tsv => b'\t',
            Self::Csv | Self::Json => b',',
        }
    }
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Field delimiter for delimited formats. `None` uses the format's default.
    pub delimiter: Option<u8>,
    /// Cell parsing rules (date format, extra column handling).
    pub cells: CellOptions,
    /// Treat a source with zero data rows as a failure.
    pub require_rows: bool,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("delimiter", &self.delimiter.map(char::from))
            .field("cells", &self.cells)
            .field("require_rows", &self.require_rows)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            delimiter: None,
            cells: CellOptions::default(),
            require_rows: true,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Unified ingestion entry point for path-based sources.
///
/// - If `options.format` is `None`, format is inferred from the file extension.
/// - With `options.require_rows` set (the default), an empty source fails with
///   [`IngestionError::EmptyDataset`].
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row count stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use sales_dashboard::ingestion::{
///     ingest_from_path, IngestionOptions, IngestionSeverity, StdErrObserver,
/// };
/// use sales_dashboard::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), sales_dashboard::IngestionError> {
/// let schema = Schema::new(vec![
///     Field::new("Store ID", DataType::Utf8),
///     Field::new("Date", DataType::Date),
/// ]);
///
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(StdErrObserver::default())),
///     alert_at_or_above: IngestionSeverity::Critical,
///     ..Default::default()
/// };
///
/// let ds = ingest_from_path("sales_data.csv", &schema, &opts)?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &IngestionOptions,
) -> IngestionResult<DataSet> {
    ingest_and_validate(path, schema, options, |ds, _| Ok(ds))
}

/// Like [`ingest_from_path`], with a `validate` step that runs on the parsed dataset before
/// the outcome is reported. A validation error is reported to the observer like any other
/// load failure, so `on_success` is only sent for data the caller accepted.
///
/// `validate` also receives the resolved format (see [`IngestionFormat::first_data_row`]).
pub fn ingest_and_validate<T, F>(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &IngestionOptions,
    validate: F,
) -> IngestionResult<T>
where
    F: FnOnce(DataSet, IngestionFormat) -> IngestionResult<T>,
{
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = IngestionContext {
        path: path.to_path_buf(),
        format: fmt,
    };

    let result = match fmt {
        IngestionFormat::Csv | IngestionFormat::Tsv => csv::ingest_delimited_from_path(
            path,
            options.delimiter.unwrap_or(fmt.default_delimiter()),
            schema,
            &options.cells,
        ),
        IngestionFormat::Json => json::ingest_json_from_path(path, schema, &options.cells),
    }
    .and_then(|ds| {
        if options.require_rows && ds.row_count() == 0 {
            Err(IngestionError::EmptyDataset {
                source_name: path.display().to_string(),
            })
        } else {
            Ok(ds)
        }
    })
    .and_then(|ds| {
        let rows = ds.row_count();
        validate(ds, fmt).map(|out| (out, rows))
    });

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok((_, rows)) => obs.on_success(&ctx, IngestionStats { rows: *rows }),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result.map(|(out, _)| out)
}

fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::Json(err) if err.is_io() => IngestionSeverity::Critical,
        IngestionError::Json(_) => IngestionSeverity::Error,
        IngestionError::SchemaMismatch { .. } => IngestionSeverity::Error,
        IngestionError::ParseError { .. } => IngestionSeverity::Error,
        IngestionError::EmptyDataset { .. } => IngestionSeverity::Error,
    }
}

fn infer_format_from_path(path: &Path) -> IngestionResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| IngestionError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

/// Owned ingestion request, handy when the load is configured in one place (CLI flags, a
/// config file) and executed in another.
#[derive(Clone)]
pub struct IngestionRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Schema to validate/parse values into.
    pub schema: Schema,
    /// Options controlling ingestion.
    pub options: IngestionOptions,
}

impl fmt::Debug for IngestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionRequest")
            .field("path", &self.path)
            .field("schema_fields", &self.schema.fields.len())
            .field("options", &self.options)
            .finish()
    }
}

impl IngestionRequest {
    /// Execute the request by calling [`ingest_from_path`].
    pub fn run(&self) -> IngestionResult<DataSet> {
        ingest_from_path(&self.path, &self.schema, &self.options)
    }

    /// Execute the request by calling [`ingest_and_validate`].
    pub fn run_validated<T, F>(&self, validate: F) -> IngestionResult<T>
    where
        F: FnOnce(DataSet, IngestionFormat) -> IngestionResult<T>,
    {
        ingest_and_validate(&self.path, &self.schema, &self.options, validate)
    }
}

#[cfg(test)]
mod tests {
    use super::IngestionFormat;

    #[test]
    fn format_inference_is_case_insensitive() {
        assert_eq!(IngestionFormat::from_extension("CSV"), Some(IngestionFormat::Csv));
        assert_eq!(IngestionFormat::from_extension("tsv"), Some(IngestionFormat::Tsv));
        assert_eq!(IngestionFormat::from_extension("ndjson"), Some(IngestionFormat::Json));
        assert_eq!(IngestionFormat::from_extension("parquet"), None);
    }

    #[test]
    fn first_data_row_follows_reader_numbering() {
        assert_eq!(IngestionFormat::Csv.first_data_row(), 2);
        assert_eq!(IngestionFormat::Tsv.first_data_row(), 2);
        assert_eq!(IngestionFormat::Json.first_data_row(), 1);
    }
}
