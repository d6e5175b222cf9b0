//! Page requests and paged results for list queries.

use serde::Serialize;

/// Largest page size a caller may ask for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A 1-based page request with a bounded page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Builds a request, clamping `page` to at least 1 and `limit` to `1..=100`.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Builds a request from optional query values, applying defaults first.
    pub fn from_query(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX));
        let limit = limit
            .unwrap_or(i64::from(DEFAULT_PAGE_SIZE))
            .clamp(1, i64::from(MAX_PAGE_SIZE));
        Self::new(page as u32, limit as u32)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results together with the unpaged total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Number of pages needed to show `total` rows at `limit` rows per page.
    pub fn pages(&self, limit: u32) -> u64 {
        self.total.div_ceil(u64::from(limit.max(1)))
    }

    /// Maps every item, keeping the total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_clamps_page_and_limit() {
        let req = PageRequest::new(0, 500);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), MAX_PAGE_SIZE);

        let req = PageRequest::new(3, 0);
        assert_eq!(req.limit(), 1);
    }

    #[test]
    fn request_from_query_applies_defaults() {
        let req = PageRequest::from_query(None, None);
        assert_eq!(req, PageRequest::default());

        let req = PageRequest::from_query(Some(-4), Some(1_000));
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 100);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PageRequest::new(1, 5).offset(), 0);
        assert_eq!(PageRequest::new(3, 5).offset(), 10);
    }

    #[test]
    fn pages_rounds_up() {
        let page: Page<u8> = Page::new(vec![], 15);
        assert_eq!(page.pages(5), 3);
        assert_eq!(page.pages(10), 2);

        let empty: Page<u8> = Page::new(vec![], 0);
        assert_eq!(empty.pages(10), 0);
    }
}
