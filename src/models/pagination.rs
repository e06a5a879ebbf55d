use serde::{Deserialize, Serialize};

/// Server-reported pagination of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl Pagination {
    pub fn first(per_page: u32) -> Self {
        Self {
            current_page: 1,
            per_page: per_page.max(1),
            total: 0,
        }
    }

    /// Number of pages; an empty list still has one (empty) page.
    pub fn total_pages(&self) -> u32 {
        let per_page = u64::from(self.per_page.max(1));
        let pages = self.total.div_ceil(per_page).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// 1-based index range of the rows shown on this page, `None` when empty.
    pub fn showing(&self, rows_on_page: usize) -> Option<(u64, u64)> {
        if rows_on_page == 0 {
            return None;
        }
        let start = u64::from(self.current_page.saturating_sub(1)) * u64::from(self.per_page) + 1;
        Some((start, start + rows_on_page as u64 - 1))
    }
}

/// One page of rows together with its pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up_and_never_drops_below_one() {
        assert_eq!(Pagination { current_page: 1, per_page: 10, total: 0 }.total_pages(), 1);
        assert_eq!(Pagination { current_page: 1, per_page: 10, total: 10 }.total_pages(), 1);
        assert_eq!(Pagination { current_page: 1, per_page: 10, total: 11 }.total_pages(), 2);
    }

    #[test]
    fn huge_totals_saturate() {
        assert_eq!(Pagination { current_page: 1, per_page: 10, total: u64::MAX }.total_pages(), u32::MAX);
        assert_eq!(Pagination { current_page: 1, per_page: 1, total: u64::from(u32::MAX) + 5 }.total_pages(), u32::MAX);
    }

    #[test]
    fn showing_range() {
        let p = Pagination { current_page: 3, per_page: 20, total: 45 };
        assert_eq!(p.showing(5), Some((41, 45)));
        assert!(!p.has_next());
        assert!(p.has_prev());
        assert_eq!(p.showing(0), None);
    }
}
