use crate::models::{Page, Pagination};

use super::query::ListQuery;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Error(String),
}

/// Local state of one server-backed list.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub query: ListQuery,
    pub pagination: Pagination,
    /// Last successful page. Replaced wholesale, never merged.
    pub rows: Vec<T>,
    pub status: ListStatus,
    pub(crate) generation: u64,
}

impl<T> ListState<T> {
    pub fn new(query: ListQuery) -> Self {
        let pagination = Pagination::first(query.per_page);
        Self {
            query,
            pagination,
            rows: Vec::new(),
            status: ListStatus::Idle,
            generation: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == ListStatus::Loading
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ListStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Page the operator sees, which leads the server during a fetch.
    pub fn displayed_page(&self) -> u32 {
        self.query.page
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination.total_pages()
    }

    pub(crate) fn reset_page(&mut self) {
        self.query.page = 1;
        self.pagination.current_page = 1;
    }

    pub(crate) fn apply_page(&mut self, page: Page<T>) {
        let Page { mut rows, pagination } = page;
        let limit = pagination.per_page.max(1) as usize;
        if rows.len() > limit {
            tracing::warn!(received = rows.len(), per_page = limit, "Server returned more rows than per_page; truncating");
            rows.truncate(limit);
        }
        self.rows = rows;
        self.pagination = pagination;
        self.query.page = pagination.current_page.max(1);
        self.query.per_page = pagination.per_page.max(1);
        self.status = ListStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_pages_are_truncated() {
        let mut state: ListState<u32> = ListState::new(ListQuery::new(2));
        state.status = ListStatus::Loading;
        state.apply_page(Page {
            rows: vec![1, 2, 3],
            pagination: Pagination { current_page: 1, per_page: 2, total: 3 },
        });
        assert_eq!(state.rows, vec![1, 2]);
        assert_eq!(state.status, ListStatus::Idle);
    }

    #[test]
    fn server_pagination_is_authoritative() {
        let mut state: ListState<u32> = ListState::new(ListQuery::new(10).with_page(9));
        state.apply_page(Page {
            rows: vec![1],
            pagination: Pagination { current_page: 4, per_page: 10, total: 31 },
        });
        assert_eq!(state.displayed_page(), 4);
        assert_eq!(state.total_pages(), 4);
    }
}
