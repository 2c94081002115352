//! Pagination utilities for mealdesk-admin
//!
//! The restaurant list shows a fixed number of records per page (6 by default).

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: usize,
    /// Total number of pages
    pub total_pages: usize,
    /// Index of the first record on this page
    pub offset: usize,
    /// Records per page
    pub page_size: usize,
}

impl Pagination {
    /// Slice `items` down to this page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = (self.offset + self.page_size).min(items.len());
        &items[start..end]
    }
}

/// Calculate pagination metadata from total results and requested page
///
/// Ensures page is within valid bounds [1, total_pages]. A `page_size` of 0 is
/// treated as 1.
///
/// # Examples
/// ```
/// use mealdesk_admin::pagination::calculate_pagination;
///
/// // 14 results at 6 per page = 3 pages (6 + 6 + 2)
/// let p = calculate_pagination(14, 2, 6);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 6);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(14, 99, 6);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 12);
/// ```
pub fn calculate_pagination(total_results: usize, requested_page: usize, page_size: usize) -> Pagination {
    let page_size = page_size.max(1);
    let total_pages = (total_results + page_size - 1) / page_size;
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * page_size;

    Pagination {
        page,
        total_pages,
        offset,
        page_size,
    }
}
