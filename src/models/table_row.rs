use serde::Serialize;

use super::pagination::{Page, Pagination};

/// A record that can be shown as one row of a list table.
pub trait TableRow {
    fn headers() -> &'static [&'static str]
    where
        Self: Sized;

    fn row_id(&self) -> &str;

    fn cells(&self) -> Vec<String>;

    fn to_view(&self) -> RowView {
        RowView {
            id: self.row_id().to_string(),
            cells: self.cells(),
        }
    }
}

/// Type-erased table row shared by the terminal and the panel renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<String>,
}

/// Type-erased page of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub headers: Vec<String>,
    pub rows: Vec<RowView>,
    pub pagination: Pagination,
}

impl TablePage {
    pub fn from_page<T: TableRow>(page: Page<T>) -> Self {
        TablePage {
            headers: T::headers().iter().map(|h| h.to_string()).collect(),
            rows: page.rows.iter().map(TableRow::to_view).collect(),
            pagination: page.pagination,
        }
    }

    pub fn into_page(self) -> (Vec<String>, Page<RowView>) {
        (self.headers, Page { rows: self.rows, pagination: self.pagination })
    }
}
