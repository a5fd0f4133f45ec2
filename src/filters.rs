//! Filter state and the dependent region resolver.
//!
//! [`FilterState`] is the only input (besides the table) of every derived view. The region
//! selector is special: when a [`Governor`] is configured, its valid values are recomputed by
//! [`resolve_regions`] from the rows matching the governing filter.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::SessionError;
use crate::sales::{distinct_sorted, SalesRow, SalesTable};

/// Value of a categorical selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selection {
    /// Do not restrict on this field.
    #[default]
    All,
    /// Keep rows whose value equals this one.
    Only(String),
    /// The governing filter left no valid value; matches no row.
    NoValue,
}

impl Selection {
    pub fn only(value: impl Into<String>) -> Self {
        Selection::Only(value.into())
    }

    /// Parse a selector value where the literal `"All"` is the sentinel.
    pub fn from_option_label(label: &str) -> Self {
        if label == "All" {
            Selection::All
        } else {
            Selection::Only(label.to_string())
        }
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => value == Some(wanted.as_str()),
            Selection::NoValue => false,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("All"),
            Selection::Only(v) => f.write_str(v),
            Selection::NoValue => f.write_str("(none)"),
        }
    }
}

/// Inclusive calendar-date bounds with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SessionError> {
        if start > end {
            return Err(SessionError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The smallest range covering both dates, whatever their order.
    pub fn spanning(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Categorical column the charts are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum GroupBy {
    #[default]
    Category,
    Region,
}

impl GroupBy {
    /// Display label, also the column name.
    pub fn label(self) -> &'static str {
        match self {
            GroupBy::Category => crate::sales::CATEGORY,
            GroupBy::Region => crate::sales::REGION,
        }
    }
}

/// Current selection values of every user-adjustable filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub store: Selection,
    pub product: Selection,
    pub category: Selection,
    pub region: Selection,
    pub date_range: DateRange,
    pub group_by: GroupBy,
}

impl FilterState {
    /// Everything selected: all categorical filters on "All", dates spanning the table.
    pub fn unrestricted(table: &SalesTable) -> Self {
        Self {
            store: Selection::All,
            product: Selection::All,
            category: Selection::All,
            region: Selection::All,
            date_range: table.date_bounds(),
            group_by: GroupBy::default(),
        }
    }

    pub fn with_store(mut self, store: Selection) -> Self {
        self.store = store;
        self
    }

    pub fn with_product(mut self, product: Selection) -> Self {
        self.product = product;
        self
    }

    pub fn with_category(mut self, category: Selection) -> Self {
        self.category = category;
        self
    }

    pub fn with_region(mut self, region: Selection) -> Self {
        self.region = region;
        self
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = group_by;
        self
    }

    /// Row predicate: every categorical selection plus the inclusive date range.
    pub fn matches(&self, row: &SalesRow<'_>) -> bool {
        self.store.matches(row.store_id())
            && self.product.matches(row.product_id())
            && self.category.matches(row.category())
            && self.region.matches(row.region())
            && row.date().is_some_and(|d| self.date_range.contains(d))
    }
}

/// Filter whose value decides which regions may be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Governor {
    /// Regions present among rows of the selected category.
    Category,
    /// Regions present among rows of the selected store and product.
    StoreProduct,
}

impl Governor {
    /// Filter fields whose change re-resolves the region options.
    pub fn fields(self) -> FieldSet {
        match self {
            Governor::Category => FieldSet::of(&[FilterField::Category]),
            Governor::StoreProduct => FieldSet::of(&[FilterField::Store, FilterField::Product]),
        }
    }

    fn matches(self, state: &FilterState, row: &SalesRow<'_>) -> bool {
        match self {
            Governor::Category => state.category.matches(row.category()),
            Governor::StoreProduct => {
                state.store.matches(row.store_id()) && state.product.matches(row.product_id())
            }
        }
    }
}

/// Region options for the current governing selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionOptions {
    /// Sorted, distinct regions of the governing subset.
    pub options: Vec<String>,
    /// First option, or `None` when the governing subset has no regions.
    pub default: Option<String>,
}

impl RegionOptions {
    /// The selection a dependent region filter takes when these options are (re)computed.
    pub fn default_selection(&self) -> Selection {
        match &self.default {
            Some(region) => Selection::Only(region.clone()),
            None => Selection::NoValue,
        }
    }

    /// Whether `selection` is allowed while these options are current.
    pub fn permits(&self, selection: &Selection) -> bool {
        match selection {
            Selection::Only(region) => self.options.contains(region),
            Selection::NoValue => self.options.is_empty(),
            Selection::All => false,
        }
    }
}

/// Regions present among rows matching the governing filter, sorted and de-duplicated, with
/// the first one as default. Null regions are skipped. Only the governing fields of `state`
/// are consulted.
pub fn resolve_regions(table: &SalesTable, governor: Governor, state: &FilterState) -> RegionOptions {
    let options = distinct_sorted(
        table
            .rows()
            .filter(|row| governor.matches(state, row))
            .map(|row| row.region()),
    );
    let default = options.first().cloned();
    RegionOptions { options, default }
}

/// Identifies one input of the derived views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FilterField {
    Store,
    Product,
    Category,
    Region,
    DateRange,
    GroupBy,
    /// Active presentation tab (dashboard vs. data table).
    Tab,
}

impl FilterField {
    pub const ALL: [FilterField; 7] = [
        FilterField::Store,
        FilterField::Product,
        FilterField::Category,
        FilterField::Region,
        FilterField::DateRange,
        FilterField::GroupBy,
        FilterField::Tab,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Small set of [`FilterField`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct FieldSet(u8);

impl FieldSet {
    pub const fn empty() -> Self {
        FieldSet(0)
    }

    pub fn all() -> Self {
        Self::of(&FilterField::ALL)
    }

    pub fn of(fields: &[FilterField]) -> Self {
        fields.iter().fold(Self::empty(), |set, f| set.with(*f))
    }

    pub const fn with(self, field: FilterField) -> Self {
        FieldSet(self.0 | field.bit())
    }

    pub fn insert(&mut self, field: FilterField) {
        self.0 |= field.bit();
    }

    pub const fn contains(self, field: FilterField) -> bool {
        self.0 & field.bit() != 0
    }

    pub const fn intersects(self, other: FieldSet) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = FilterField> {
        FilterField::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        assert_eq!(
            DateRange::new(day(3), day(1)),
            Err(SessionError::InvalidDateRange {
                start: day(3),
                end: day(1)
            })
        );
        let r = DateRange::new(day(1), day(3)).unwrap();
        assert!(r.contains(day(1)) && r.contains(day(3)));
        assert!(!r.contains(day(4)));
        assert_eq!(DateRange::spanning(day(3), day(1)), r);
    }

    #[test]
    fn single_day_range_contains_only_that_day() {
        let r = DateRange::single(day(2));
        assert!(r.contains(day(2)));
        assert!(!r.contains(day(1)));
        assert!(!r.contains(day(3)));
    }

    #[test]
    fn selection_sentinels() {
        assert!(Selection::All.matches(None));
        assert!(Selection::only("A").matches(Some("A")));
        assert!(!Selection::only("A").matches(Some("B")));
        assert!(!Selection::only("A").matches(None));
        assert!(!Selection::NoValue.matches(Some("A")));
        assert_eq!(Selection::from_option_label("All"), Selection::All);
        assert_eq!(Selection::from_option_label("S1"), Selection::only("S1"));
    }

    #[test]
    fn region_options_permit_only_current_values() {
        let opts = RegionOptions {
            options: vec!["North".to_string(), "South".to_string()],
            default: Some("North".to_string()),
        };
        assert_eq!(opts.default_selection(), Selection::only("North"));
        assert!(opts.permits(&Selection::only("South")));
        assert!(!opts.permits(&Selection::only("West")));
        assert!(!opts.permits(&Selection::All));
        assert!(!opts.permits(&Selection::NoValue));

        let none = RegionOptions {
            options: vec![],
            default: None,
        };
        assert_eq!(none.default_selection(), Selection::NoValue);
        assert!(none.permits(&Selection::NoValue));
    }

    #[test]
    fn field_set_operations() {
        let kpi = FieldSet::of(&[FilterField::Store, FilterField::DateRange]);
        assert!(kpi.contains(FilterField::Store));
        assert!(!kpi.contains(FilterField::GroupBy));
        assert!(kpi.intersects(FieldSet::empty().with(FilterField::DateRange)));
        assert!(!kpi.intersects(FieldSet::of(&[FilterField::Tab])));
        assert_eq!(
            kpi.iter().collect::<Vec<_>>(),
            vec![FilterField::Store, FilterField::DateRange]
        );
        assert_eq!(FieldSet::all().iter().count(), 7);
        assert!(FieldSet::empty().is_empty());
    }
}
