use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion functions.
///
/// Every variant is fatal at startup: a dashboard must not serve views over a partially
/// loaded dataset.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON ingestion error (malformed document).
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not conform to the provided schema (missing required fields/columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// The source parsed cleanly but contained no rows.
    #[error("dataset is empty: {source_name}")]
    EmptyDataset { source_name: String },
}

/// Rejected filter input. The session state is left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("region '{region}' is not valid for the current selection (options={options:?})")]
    UnknownRegion { region: String, options: Vec<String> },
}

/// Error type returned by the CSV export serializer.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error surfaced by the `sales-dashboard` binary, carrying its process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<IngestionError> for AppError {
    fn from(e: IngestionError) -> Self {
        AppError::new(2, format!("failed to load dataset: {e}"))
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::new(3, e.to_string())
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        AppError::new(4, format!("export failed: {e}"))
    }
}
