//! Chart datasets: units sold over time per group (line) and total units sold per group (bar).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::filters::GroupBy;
use crate::sales::{SalesTable, UNITS_SOLD};
use crate::types::DataSet;

/// Title both charts carry when the subset is empty.
pub const NO_DATA_TITLE: &str = "No Data";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub units_sold: f64,
}

/// One line of the line chart: a single group value, points by ascending date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub legend_title: Option<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub group: String,
    pub units_sold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub line: LineChart,
    pub bar: BarChart,
}

impl Charts {
    /// Placeholder charts: titled [`NO_DATA_TITLE`], no series.
    pub fn no_data() -> Self {
        Self {
            line: LineChart {
                title: NO_DATA_TITLE.to_string(),
                legend_title: None,
                series: Vec::new(),
            },
            bar: BarChart {
                title: NO_DATA_TITLE.to_string(),
                x_label: None,
                y_label: None,
                bars: Vec::new(),
            },
        }
    }

    /// Group `subset` (sharing `table`'s schema) by `group_by` and sum units sold.
    ///
    /// Rows with no group value are left out; missing unit counts add nothing but still make
    /// their group appear. Groups are ordered by name.
    pub fn compute(table: &SalesTable, subset: &DataSet, group_by: GroupBy) -> Self {
        if subset.row_count() == 0 {
            return Self::no_data();
        }

        let mut per_day: BTreeMap<&str, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for cells in &subset.rows {
            let row = table.row(cells);
            let (Some(group), Some(date)) = (row.group(group_by), row.date()) else {
                continue;
            };
            let units = row.units_sold().unwrap_or(0.0);
            *per_day.entry(group).or_default().entry(date).or_insert(0.0) += units;
            *totals.entry(group).or_insert(0.0) += units;
        }

        let label = group_by.label();
        Self {
            line: LineChart {
                title: format!("{UNITS_SOLD} Over Time by {label}"),
                legend_title: Some(label.to_string()),
                series: per_day
                    .into_iter()
                    .map(|(name, days)| Series {
                        name: name.to_string(),
                        points: days
                            .into_iter()
                            .map(|(date, units_sold)| SeriesPoint { date, units_sold })
                            .collect(),
                    })
                    .collect(),
            },
            bar: BarChart {
                title: format!("Total {UNITS_SOLD} by {label}"),
                x_label: Some(label.to_string()),
                y_label: Some(UNITS_SOLD.to_string()),
                bars: totals
                    .into_iter()
                    .map(|(group, units_sold)| Bar {
                        group: group.to_string(),
                        units_sold,
                    })
                    .collect(),
            },
        }
    }
}
