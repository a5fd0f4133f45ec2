//! Load outcome reporting.
//!
//! Dataset loading happens once per process, so the hooks here are the only record of what
//! was loaded (or why startup was refused).

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::IngestionError;

use super::unified::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// The source was reachable but rejected (bad header, bad cell, no rows).
    Error,
    /// The source could not be read at all (missing file, permissions, I/O).
    Critical,
}

/// Context about a load attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// The input path used for ingestion.
    pub path: PathBuf,
    /// Format used for ingestion.
    pub format: IngestionFormat,
}

/// Stats reported on a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of ingested rows.
    pub rows: usize,
}

/// Observer interface for load outcomes.
pub trait IngestionObserver: Send + Sync {
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when a failure meets the alert threshold. Defaults to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans callbacks out to several observers, in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers.iter().for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers.iter().for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Logs load events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestionObserver for StdErrObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        eprintln!("[load][ok] {}", describe(ctx, &format!("rows={}", stats.rows)));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!("[load][{severity:?}] {}", describe(ctx, &format!("err={error}")));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!("[ALERT][load][{severity:?}] {}", describe(ctx, &format!("err={error}")));
    }
}

/// Appends load events to a local log file. Writes are best-effort.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, kind: &str, ctx: &IngestionContext, detail: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {kind} {}", unix_ts(), describe(ctx, detail));
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append_line("ok", ctx, &format!("rows={}", stats.rows));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line("fail", ctx, &format!("severity={severity:?} err={error}"));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line("ALERT", ctx, &format!("severity={severity:?} err={error}"));
    }
}

fn describe(ctx: &IngestionContext, detail: &str) -> String {
    format!("format={:?} path={} {detail}", ctx.format, ctx.path.display())
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
