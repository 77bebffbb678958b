//! List pagination.
//!
//! Every listing in the application is paginated the same way: fixed page
//! size, 1-indexed page numbers, a last partial page allowed, and
//! out-of-range page numbers clamped into the valid range.

use serde::Serialize;

/// Fixed page size used by every paginated listing.
pub const PAGE_SIZE: u32 = 5;

/// A clamped page request, ready to be turned into `LIMIT`/`OFFSET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    /// The effective (clamped) 1-indexed page number.
    pub number: u32,
    /// Total number of pages (at least 1, even for an empty listing).
    pub pages: u32,
    /// Row limit for the query.
    pub limit: u32,
    /// Row offset for the query.
    pub offset: u32,
}

/// Clamp a requested page number against the total row count.
pub fn clamp(requested: u32, total: u64, per_page: u32) -> PageSpec {
    let per = u64::from(per_page.max(1));
    let pages = if total == 0 {
        1
    } else {
        ((total + per - 1) / per) as u32
    };
    let number = requested.clamp(1, pages);
    PageSpec {
        number,
        pages,
        limit: per as u32,
        offset: (number - 1) * per as u32,
    }
}

/// One page of results plus the pagination facts the UI needs.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub pages: u32,
    pub total: u64,
}

impl<T> Page<T> {
    /// Assemble a page from queried items and the spec they were queried with.
    pub fn new(items: Vec<T>, spec: PageSpec, total: u64) -> Self {
        Self {
            items,
            number: spec.number,
            pages: spec.pages,
            total,
        }
    }
}
