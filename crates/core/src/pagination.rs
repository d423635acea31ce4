//! Page-number pagination shared by every paginated list endpoint.
//!
//! Page parameters arrive as loosely-typed query strings (`page`,
//! `itemsPerPage`). [`PageRequest::from_params`] turns them into clamped
//! numbers and [`Paginated`] carries the response envelope.

use serde::Serialize;

/// Page used when `page` is absent or unparseable.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when `itemsPerPage` is absent or unparseable.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Upper bound for `itemsPerPage`.
pub const MAX_PER_PAGE: i64 = 100;

/// A validated 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Build a page request from raw query values.
    ///
    /// Unparseable values fall back to the defaults; values below 1 are
    /// raised to 1 and the page size is capped at [`MAX_PER_PAGE`].
    pub fn from_params(page: Option<&str>, per_page: Option<&str>) -> Self {
        let page = parse_or(page, DEFAULT_PAGE).max(1);
        let per_page = parse_or(per_page, DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        Self { page, per_page }
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

fn parse_or(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

/// Number of pages needed for `total` rows; zero rows means zero pages.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 0;
    }
    (total + per_page - 1) / per_page
}

/// Paginated response envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    /// Number of rows actually returned on this page.
    pub items_per_page: i64,
    pub total_items: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

impl<T: Serialize> Paginated<T> {
    /// Wrap one page of rows with the total matching count, whether or
    /// not this page has any rows.
    pub fn new(data: Vec<T>, total_items: i64, request: PageRequest) -> Self {
        Self {
            items_per_page: data.len() as i64,
            total_pages: total_pages(total_items, request.per_page),
            current_page: request.page,
            total_items,
            data,
        }
    }

    /// Like [`Paginated::new`], but a page with no rows reports zero
    /// totals, even when it lies past the end of a non-empty result.
    pub fn new_or_empty(data: Vec<T>, total_items: i64, request: PageRequest) -> Self {
        if data.is_empty() {
            return Self::empty(request);
        }
        Self::new(data, total_items, request)
    }

    /// The soft-miss page: no rows, no pages, the requested page echoed.
    pub fn empty(request: PageRequest) -> Self {
        Self {
            data: Vec::new(),
            items_per_page: 0,
            total_items: 0,
            current_page: request.page,
            total_pages: 0,
        }
    }
}
