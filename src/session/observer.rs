use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::filters::{FieldSet, Governor};

use super::Output;

/// Events emitted while a session processes filter changes.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A batch of filter changes was accepted.
    ChangesApplied { changed: FieldSet },
    /// The dependent region options were recomputed.
    RegionsResolved { governor: Governor, options: usize },
    /// One derived output was recomputed from `rows` filtered rows.
    OutputRecomputed { output: Output, rows: usize },
}

/// Observer hook for session events.
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

/// A simple stderr logger for session events.
#[derive(Debug, Default)]
pub struct StdErrSessionObserver;

impl SessionObserver for StdErrSessionObserver {
    fn on_event(&self, event: &SessionEvent) {
        eprintln!("[session] {event:?}");
    }
}

/// Running counters for one session.
#[derive(Debug, Default)]
pub struct SessionMetrics {
    cycles: AtomicU64,
    region_resolutions: AtomicU64,
    kpi_recomputes: AtomicU64,
    chart_recomputes: AtomicU64,
    table_recomputes: AtomicU64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, event: &SessionEvent) {
        let counter = match event {
            SessionEvent::ChangesApplied { .. } => &self.cycles,
            SessionEvent::RegionsResolved { .. } => &self.region_resolutions,
            SessionEvent::OutputRecomputed { output, .. } => match output {
                Output::Kpis => &self.kpi_recomputes,
                Output::Charts => &self.chart_recomputes,
                Output::Table => &self.table_recomputes,
            },
        };
        let _ = counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> SessionMetricsSnapshot {
        SessionMetricsSnapshot {
            cycles: self.cycles.load(Ordering::SeqCst),
            region_resolutions: self.region_resolutions.load(Ordering::SeqCst),
            kpi_recomputes: self.kpi_recomputes.load(Ordering::SeqCst),
            chart_recomputes: self.chart_recomputes.load(Ordering::SeqCst),
            table_recomputes: self.table_recomputes.load(Ordering::SeqCst),
        }
    }
}

/// Immutable snapshot of [`SessionMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionMetricsSnapshot {
    pub cycles: u64,
    pub region_resolutions: u64,
    pub kpi_recomputes: u64,
    pub chart_recomputes: u64,
    pub table_recomputes: u64,
}

impl fmt::Display for SessionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cycles={}, region_resolutions={}, recomputes(kpis={}, charts={}, table={})",
            self.cycles,
            self.region_resolutions,
            self.kpi_recomputes,
            self.chart_recomputes,
            self.table_recomputes
        )
    }
}
