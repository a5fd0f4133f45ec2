//! Per-user dashboard sessions.
//!
//! A [`Session`] owns one [`FilterState`] over a shared, read-only `Arc<SalesTable>`. Filter
//! changes arrive in batches through [`Session::apply`]; the session then
//!
//! 1. applies the batch atomically (or rejects it with a [`SessionError`], leaving the state
//!    untouched),
//! 2. re-resolves the dependent region options if a governing field changed, resetting the
//!    region to the new default unless the batch set it explicitly,
//! 3. recomputes only the [`Output`]s whose declared dependencies intersect the changed
//!    fields.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use sales_dashboard::filters::{Governor, Selection};
//! use sales_dashboard::sales::{sales_schema, SalesTable};
//! use sales_dashboard::session::{FilterChange, Session, SessionOptions};
//! use sales_dashboard::types::{DataSet, Value};
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let row = |category: &str, region: &str| vec![
//!     Value::Utf8("S1".to_string()), Value::Utf8("P1".to_string()),
//!     Value::Utf8(category.to_string()), Value::Utf8(region.to_string()),
//!     Value::Date(day), Value::Float64(1.0), Value::Float64(2.0),
//!     Value::Float64(3.0), Value::Float64(1.0),
//! ];
//! let table = SalesTable::from_dataset(DataSet::new(
//!     sales_schema(),
//!     vec![row("Toys", "South"), row("Toys", "North"), row("Books", "West")],
//! )).unwrap();
//!
//! let mut session = Session::new(
//!     Arc::new(table),
//!     SessionOptions { governor: Some(Governor::Category), ..Default::default() },
//! );
//! // The first category is preselected and its first region is the default.
//! assert_eq!(session.state().category, Selection::only("Books"));
//! assert_eq!(session.state().region, Selection::only("West"));
//!
//! let update = session.apply([FilterChange::Category(Selection::only("Toys"))]).unwrap();
//! assert_eq!(update.region_options.unwrap().options, vec!["North", "South"]);
//! assert_eq!(session.state().region, Selection::only("North"));
//! ```

mod observer;

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dashboard::{filtered_subset, Charts, Kpis, Tab, TablePage, TableView, DEFAULT_PAGE_SIZE};
use crate::error::{ExportError, SessionError};
use crate::export::{export_csv, ExportArtifact};
use crate::filters::{
    resolve_regions, DateRange, FieldSet, FilterField, FilterState, GroupBy, Governor, RegionOptions, Selection,
};
use crate::sales::SalesTable;
use crate::types::DataSet;

pub use observer::{SessionEvent, SessionMetrics, SessionMetricsSnapshot, SessionObserver, StdErrSessionObserver};

/// Session configuration.
#[derive(Clone)]
pub struct SessionOptions {
    /// Filter the region selector depends on; `None` makes region a free filter.
    pub governor: Option<Governor>,
    /// Rows per data table page.
    pub page_size: usize,
    /// Optional observer for session events.
    pub observer: Option<Arc<dyn SessionObserver>>,
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("governor", &self.governor)
            .field("page_size", &self.page_size)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            governor: None,
            page_size: DEFAULT_PAGE_SIZE,
            observer: None,
        }
    }
}

/// A derived output with a declared set of input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Output {
    Kpis,
    Charts,
    Table,
}

impl Output {
    pub const ALL: [Output; 3] = [Output::Kpis, Output::Charts, Output::Table];

    /// Filter fields this output reads.
    pub fn dependencies(self) -> FieldSet {
        let rows = FieldSet::of(&[
            FilterField::Store,
            FilterField::Product,
            FilterField::Category,
            FilterField::Region,
            FilterField::DateRange,
        ]);
        match self {
            Output::Kpis => rows,
            Output::Charts => rows.with(FilterField::GroupBy),
            Output::Table => rows.with(FilterField::Tab),
        }
    }
}

/// One user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Store(Selection),
    Product(Selection),
    Category(Selection),
    Region(Selection),
    DateRange(DateRange),
    GroupBy(GroupBy),
    Tab(Tab),
}

impl FilterChange {
    /// Date range change; fails if `start > end`.
    pub fn dates(start: NaiveDate, end: NaiveDate) -> Result<Self, SessionError> {
        DateRange::new(start, end).map(FilterChange::DateRange)
    }

    pub fn field(&self) -> FilterField {
        match self {
            FilterChange::Store(_) => FilterField::Store,
            FilterChange::Product(_) => FilterField::Product,
            FilterChange::Category(_) => FilterField::Category,
            FilterChange::Region(_) => FilterField::Region,
            FilterChange::DateRange(_) => FilterField::DateRange,
            FilterChange::GroupBy(_) => FilterField::GroupBy,
            FilterChange::Tab(_) => FilterField::Tab,
        }
    }
}

/// Outputs recomputed by one cycle; `None` means "unchanged, keep what is rendered".
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ViewUpdate {
    pub region_options: Option<RegionOptions>,
    pub kpis: Option<Kpis>,
    pub charts: Option<Charts>,
    pub table: Option<TableView>,
}

impl ViewUpdate {
    pub fn is_empty(&self) -> bool {
        self.region_options.is_none() && self.kpis.is_none() && self.charts.is_none() && self.table.is_none()
    }
}

/// Filter state of one user over a shared table.
pub struct Session {
    table: Arc<SalesTable>,
    state: FilterState,
    tab: Tab,
    regions: Option<RegionOptions>,
    options: SessionOptions,
    metrics: Arc<SessionMetrics>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("rows", &self.table.row_count())
            .field("state", &self.state)
            .field("tab", &self.tab)
            .field("regions", &self.regions)
            .field("options", &self.options)
            .finish()
    }
}

impl Session {
    /// Start a session with every filter open. With a [`Governor::Category`] governor the
    /// first category is preselected (category is single-select there); with any governor the
    /// region starts at the resolver's default.
    pub fn new(table: Arc<SalesTable>, options: SessionOptions) -> Self {
        let mut state = FilterState::unrestricted(&table);
        if options.governor == Some(Governor::Category) {
            if let Some(first) = table.categories().into_iter().next() {
                state.category = Selection::Only(first);
            }
        }

        let mut session = Self {
            table,
            state,
            tab: Tab::default(),
            regions: None,
            options,
            metrics: Arc::new(SessionMetrics::new()),
        };
        if let Some(governor) = session.options.governor {
            let opts = resolve_regions(&session.table, governor, &session.state);
            session.state.region = opts.default_selection();
            session.emit(SessionEvent::RegionsResolved {
                governor,
                options: opts.options.len(),
            });
            session.regions = Some(opts);
        }
        session
    }

    pub fn table(&self) -> &Arc<SalesTable> {
        &self.table
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Current region options, when a governor is configured.
    pub fn region_options(&self) -> Option<&RegionOptions> {
        self.regions.as_ref()
    }

    pub fn metrics(&self) -> Arc<SessionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Every output, for the initial render.
    pub fn snapshot(&self) -> ViewUpdate {
        self.recompute(FieldSet::all(), self.regions.clone())
    }

    /// Apply a batch of changes and recompute the affected outputs.
    pub fn apply(&mut self, changes: impl IntoIterator<Item = FilterChange>) -> Result<ViewUpdate, SessionError> {
        let mut next = self.state.clone();
        let mut tab = self.tab;
        let mut changed = FieldSet::empty();
        let mut explicit_region = None;

        for change in changes {
            let field = change.field();
            let differs = match change {
                FilterChange::Store(s) => replace(&mut next.store, s),
                FilterChange::Product(s) => replace(&mut next.product, s),
                FilterChange::Category(s) => replace(&mut next.category, s),
                FilterChange::Region(s) => {
                    explicit_region = Some(s.clone());
                    replace(&mut next.region, s)
                }
                FilterChange::DateRange(r) => replace(&mut next.date_range, r),
                FilterChange::GroupBy(g) => replace(&mut next.group_by, g),
                FilterChange::Tab(t) => replace(&mut tab, t),
            };
            if differs {
                changed.insert(field);
            }
        }

        let mut resolved = None;
        if let Some(governor) = self.options.governor {
            if changed.intersects(governor.fields()) {
                let opts = resolve_regions(&self.table, governor, &next);
                if explicit_region.is_none() {
                    let region = opts.default_selection();
                    if replace(&mut next.region, region) {
                        changed.insert(FilterField::Region);
                    }
                }
                resolved = Some((governor, opts));
            }

            if let Some(region) = &explicit_region {
                let current = resolved.as_ref().map(|(_, o)| o).or(self.regions.as_ref());
                if !current.is_some_and(|o| o.permits(region)) {
                    return Err(SessionError::UnknownRegion {
                        region: region.to_string(),
                        options: current.map(|o| o.options.clone()).unwrap_or_default(),
                    });
                }
            }
        }

        self.state = next;
        self.tab = tab;
        let region_options = match resolved {
            Some((governor, opts)) => {
                self.emit(SessionEvent::RegionsResolved {
                    governor,
                    options: opts.options.len(),
                });
                self.regions = Some(opts.clone());
                Some(opts)
            }
            None => None,
        };
        self.emit(SessionEvent::ChangesApplied { changed });

        Ok(self.recompute(changed, region_options))
    }

    /// CSV export of the rows matching the current filters.
    pub fn export(&self) -> Result<ExportArtifact, ExportError> {
        export_csv(&self.table, &self.state)
    }

    /// One page of the data table for the current filters (zero-based `index`).
    pub fn table_page(&self, index: usize) -> TablePage {
        TableView::from_subset(filtered_subset(&self.table, &self.state)).page(index, self.options.page_size)
    }

    fn recompute(&self, changed: FieldSet, region_options: Option<RegionOptions>) -> ViewUpdate {
        let mut update = ViewUpdate {
            region_options,
            ..Default::default()
        };

        let mut subset: Option<DataSet> = None;
        for output in Output::ALL {
            if !output.dependencies().intersects(changed) {
                continue;
            }
            let rows = match output {
                Output::Kpis => {
                    let rows = subset.get_or_insert_with(|| filtered_subset(&self.table, &self.state));
                    update.kpis = Some(Kpis::compute(&self.table, rows));
                    rows.row_count()
                }
                Output::Charts => {
                    let rows = subset.get_or_insert_with(|| filtered_subset(&self.table, &self.state));
                    update.charts = Some(Charts::compute(&self.table, rows, self.state.group_by));
                    rows.row_count()
                }
                Output::Table => {
                    let view = match self.tab {
                        Tab::DataTable => TableView::from_subset(
                            subset
                                .take()
                                .unwrap_or_else(|| filtered_subset(&self.table, &self.state)),
                        ),
                        Tab::Dashboard => TableView::inactive(),
                    };
                    let rows = view.row_count();
                    update.table = Some(view);
                    rows
                }
            };
            self.emit(SessionEvent::OutputRecomputed { output, rows });
        }
        update
    }

    fn emit(&self, event: SessionEvent) {
        self.metrics.record(&event);
        if let Some(obs) = self.options.observer.as_ref() {
            obs.on_event(&event);
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
