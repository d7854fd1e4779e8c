//! Page-based pagination arithmetic.
//!
//! A [`PageRequest`] is the validated `(page, page_size)` pair every listing
//! accepts. The `db` crate runs the bounded data query and the unbounded
//! count query, then assembles the result with [`Page::from_parts`], which
//! owns the `is_next` rule.

use serde::Serialize;

use crate::error::CoreError;

/// Page number used when the caller does not supply one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on the page size a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A validated, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    /// Build a request from optional caller input.
    ///
    /// Missing values fall back to [`DEFAULT_PAGE`] / [`DEFAULT_PAGE_SIZE`].
    /// Values below 1 are rejected; page sizes above [`MAX_PAGE_SIZE`] are
    /// clamped.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Result<Self, CoreError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(CoreError::Validation(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if page_size < 1 {
            return Err(CoreError::Validation(format!(
                "page_size must be at least 1, got {page_size}"
            )));
        }

        Ok(Self {
            page,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Rows to skip: `(page - 1) * page_size`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Rows to fetch.
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Whether rows exist beyond this page.
    pub is_next: bool,
    /// Rows matching the filter, ignoring skip and limit.
    pub total_count: i64,
}

impl<T> Page<T> {
    /// Assemble a page from the fetched rows and the unbounded count.
    ///
    /// `total_count` must come from the same filter as `data` but without the
    /// offset/limit window; counting the fetched rows instead would report
    /// `is_next = false` as soon as a page came back short.
    pub fn from_parts(data: Vec<T>, total_count: i64, request: &PageRequest) -> Self {
        let seen = request.offset().saturating_add(data.len() as i64);
        Self {
            is_next: total_count > seen,
            data,
            total_count,
        }
    }

    /// A page with no rows and nothing after it.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            is_next: false,
            total_count: 0,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            is_next: self.is_next,
            total_count: self.total_count,
        }
    }
}
