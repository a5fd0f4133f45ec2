//! Scalar KPIs over a filtered subset.

use std::collections::HashMap;

use serde::Serialize;

use crate::processing::{reduce, ReduceOp};
use crate::sales::{SalesTable, DEMAND, PRICE, UNITS_ORDERED, UNITS_SOLD};
use crate::types::DataSet;

/// Label shown for the most sold category when nothing matches.
pub const NOT_APPLICABLE: &str = "N/A";

/// Summary scalars of one filtered subset.
///
/// Unit totals are truncated to whole numbers; currency values are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    /// Rows in the subset the KPIs were computed from.
    pub row_count: usize,
    pub total_demand: i64,
    pub total_units_sold: i64,
    pub total_units_ordered: i64,
    /// Σ units sold × price, rounded to 2 decimals.
    pub total_revenue: f64,
    /// Mean price per unit, rounded to 2 decimals.
    pub average_price: f64,
    /// Category with the most rows; ties go to the one seen first.
    pub most_sold_category: Option<String>,
}

impl Kpis {
    /// The fixed empty-subset representation.
    pub fn empty() -> Self {
        Self {
            row_count: 0,
            total_demand: 0,
            total_units_sold: 0,
            total_units_ordered: 0,
            total_revenue: 0.0,
            average_price: 0.0,
            most_sold_category: None,
        }
    }

    /// Compute KPIs for `subset`, which must share `table`'s schema.
    pub fn compute(table: &SalesTable, subset: &DataSet) -> Self {
        if subset.row_count() == 0 {
            return Self::empty();
        }

        let total = |column: &str, op: ReduceOp| {
            reduce(subset, column, op)
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0)
        };

        let revenue = subset.reduce_rows(0.0, |acc, cells| {
            let row = table.row(cells);
            match (row.units_sold(), row.price()) {
                (Some(units), Some(price)) => acc + units * price,
                _ => acc,
            }
        });

        Self {
            row_count: subset.row_count(),
            total_demand: whole(total(DEMAND, ReduceOp::Sum)),
            total_units_sold: whole(total(UNITS_SOLD, ReduceOp::Sum)),
            total_units_ordered: whole(total(UNITS_ORDERED, ReduceOp::Sum)),
            total_revenue: round_cents(revenue),
            average_price: round_cents(total(PRICE, ReduceOp::Mean)),
            most_sold_category: most_frequent(subset.rows.iter().map(|cells| table.row(cells).category())),
        }
    }

    /// Card texts as the dashboard shows them.
    pub fn cards(&self) -> KpiCards {
        if self.row_count == 0 {
            return KpiCards {
                total_demand: "0".to_string(),
                total_units_ordered: "0".to_string(),
                total_units_sold: "0".to_string(),
                total_revenue: "$0".to_string(),
                average_price: "$0".to_string(),
                most_sold_category: NOT_APPLICABLE.to_string(),
            };
        }
        KpiCards {
            total_demand: self.total_demand.to_string(),
            total_units_ordered: self.total_units_ordered.to_string(),
            total_units_sold: self.total_units_sold.to_string(),
            total_revenue: format!("${:.2}", self.total_revenue),
            average_price: format!("${:.2}", self.average_price),
            most_sold_category: self
                .most_sold_category
                .clone()
                .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
        }
    }
}

/// Display strings of the six KPI cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiCards {
    pub total_demand: String,
    pub total_units_ordered: String,
    pub total_units_sold: String,
    pub total_revenue: String,
    pub average_price: String,
    pub most_sold_category: String,
}

fn whole(v: f64) -> i64 {
    v.trunc() as i64
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn most_frequent<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for value in values.flatten() {
        match slot.get(value) {
            Some(i) => counts[*i].1 += 1,
            None => {
                slot.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((value, n));
        }
    }
    best.map(|(value, _)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::{most_frequent, round_cents, whole, Kpis};

    #[test]
    fn most_frequent_breaks_ties_by_first_seen() {
        let vals = [Some("B"), Some("A"), Some("A"), Some("B"), None, Some("C")];
        assert_eq!(most_frequent(vals.into_iter()), Some("B".to_string()));
        assert_eq!(most_frequent([None, None].into_iter()), None);
    }

    #[test]
    fn rounding_rules() {
        assert_eq!(whole(12.99), 12);
        assert_eq!(round_cents(7.456), 7.46);
        assert_eq!(round_cents(100.0 / 3.0), 33.33);
    }

    #[test]
    fn empty_cards_use_placeholder_texts() {
        let cards = Kpis::empty().cards();
        assert_eq!(cards.total_demand, "0");
        assert_eq!(cards.total_revenue, "$0");
        assert_eq!(cards.average_price, "$0");
        assert_eq!(cards.most_sold_category, "N/A");
    }
}
