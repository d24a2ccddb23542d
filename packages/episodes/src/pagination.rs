// ABOUTME: Pagination for the part listing endpoint
// ABOUTME: 1-based page query parameters and the metadata returned alongside each page

use partwise_core::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};

/// Upper bound for `?limit=`
pub const MAX_PAGE_SIZE: i64 = 100;

pub const MIN_PAGE: i64 = 1;

/// Query parameters for pagination
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    MIN_PAGE
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Clamped page size
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// Page number, never below 1
    pub fn page(&self) -> i64 {
        self.page.max(MIN_PAGE)
    }

    /// Rows to skip for the current page
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new(MIN_PAGE, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total_items: i64) -> Self {
        let page = params.page();
        let page_size = params.limit();
        let total_pages = (total_items + page_size - 1) / page_size;

        Self {
            page,
            page_size,
            total_items,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > MIN_PAGE,
        }
    }
}

/// One page of items with its metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, params: &PaginationParams, total_items: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(params, total_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults_to_ten_per_page() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[rstest]
    #[case(-3, 10, 1, 10, 0)]
    #[case(0, 10, 1, 10, 0)]
    #[case(2, 10, 2, 10, 10)]
    #[case(3, 500, 3, MAX_PAGE_SIZE, 200)]
    #[case(1, 0, 1, 1, 0)]
    fn test_params_are_clamped(
        #[case] page: i64,
        #[case] limit: i64,
        #[case] expected_page: i64,
        #[case] expected_limit: i64,
        #[case] expected_offset: i64,
    ) {
        let params = PaginationParams::new(page, limit);
        assert_eq!(params.page(), expected_page);
        assert_eq!(params.limit(), expected_limit);
        assert_eq!(params.offset(), expected_offset);
    }

    #[test]
    fn test_meta_for_middle_page() {
        let meta = PaginationMeta::new(&PaginationParams::new(2, 10), 25);
        assert_eq!(
            meta,
            PaginationMeta {
                page: 2,
                page_size: 10,
                total_items: 25,
                total_pages: 3,
                has_next_page: true,
                has_previous_page: true,
            }
        );
    }

    #[test]
    fn test_meta_for_empty_listing() {
        let meta = PaginationMeta::new(&PaginationParams::default(), 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
        assert!(!meta.has_previous_page);
    }
}
