//! Raw-row table projection and pagination.

use serde::Serialize;

use crate::types::{DataSet, Value};

/// Rows per page in the data table.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Presentation tab. Only the data table tab needs the table projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Tab {
    #[default]
    Dashboard,
    DataTable,
}

/// Filtered rows with every source column, in original relative order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl TableView {
    pub fn from_subset(subset: DataSet) -> Self {
        Self {
            columns: subset.schema.field_names().map(str::to_owned).collect(),
            rows: subset.rows,
        }
    }

    /// What the table shows while another tab is active: no columns, no rows.
    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Zero-based page `index`; indexes past the end land on the last page.
    pub fn page(&self, index: usize, page_size: usize) -> TablePage {
        let page_size = page_size.max(1);
        let total_rows = self.rows.len();
        let page_count = total_rows.div_ceil(page_size);
        let page = index.min(page_count.saturating_sub(1));
        let start = (page * page_size).min(total_rows);
        let end = (start + page_size).min(total_rows);

        TablePage {
            page,
            page_size,
            page_count,
            total_rows,
            columns: self.columns.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }
}

/// One page of a [`TableView`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePage {
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total_rows: usize,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

#[cfg(test)]
mod tests {
    use super::TableView;
    use crate::types::Value;

    fn view(n: i64) -> TableView {
        TableView {
            columns: vec!["n".to_string()],
            rows: (0..n).map(|i| vec![Value::Int64(i)]).collect(),
        }
    }

    #[test]
    fn pages_split_rows_and_clamp_past_the_end() {
        let v = view(23);
        let first = v.page(0, 10);
        assert_eq!(first.page_count, 3);
        assert_eq!(first.rows.len(), 10);

        let last = v.page(2, 10);
        assert_eq!(last.rows, vec![vec![Value::Int64(20)], vec![Value::Int64(21)], vec![Value::Int64(22)]]);

        let clamped = v.page(99, 10);
        assert_eq!(clamped.page, 2);
        assert_eq!(clamped.rows.len(), 3);
    }

    #[test]
    fn empty_table_has_no_pages() {
        let page = view(0).page(0, 10);
        assert_eq!(page.page_count, 0);
        assert_eq!(page.page, 0);
        assert!(page.rows.is_empty());
    }
}
