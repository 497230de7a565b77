//! Search & Pagination
//!
//! Case-insensitive substring search over title, description and the
//! textual price, returned one page at a time with enough metadata for a
//! client to step forwards and backwards.
//!
//! # Normalization
//! - empty search text matches every record
//! - page <= 0 becomes page 1
//! - page size <= 0, or above the configured maximum, is rejected
//! - a page past the end is an empty page, not an error

use serde::{Deserialize, Serialize};

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::analytics::executor::QueryExecutor;
use crate::storage::{RecordFilter, SaleRecord};

/// Page number used when none is given
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when none is given
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Raw listing parameters as received from a caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub search: String,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl SearchParams {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Default::default()
        }
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: i64) -> Self {
        self.per_page = Some(per_page);
        self
    }
}

/// Validated page coordinates (1-based page, positive limit)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Normalize raw parameters
    pub fn from_params(
        params: &SearchParams,
        default_per_page: i64,
        max_per_page: i64,
    ) -> AnalyticsResult<Self> {
        let per_page = params.per_page.unwrap_or(default_per_page);
        if per_page <= 0 {
            return Err(AnalyticsError::InvalidPagination(format!(
                "perPage must be a positive integer, got {}",
                per_page
            )));
        }
        if per_page > max_per_page {
            return Err(AnalyticsError::InvalidPagination(format!(
                "perPage must not exceed {}, got {}",
                max_per_page, per_page
            )));
        }

        let page = params.page.unwrap_or(DEFAULT_PAGE).max(1);

        Ok(Self {
            page: page as u64,
            limit: per_page as u64,
        })
    }

    /// Number of matching records before this page
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// One page of results plus navigation metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub limit: u64,
    pub page: u64,
    pub total_pages: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(docs: Vec<T>, total_docs: u64, request: PageRequest) -> Self {
        let total_pages = total_docs.div_ceil(request.limit);
        let has_prev_page = request.page > 1;
        let has_next_page = request.page < total_pages;

        Self {
            docs,
            total_docs,
            limit: request.limit,
            page: request.page,
            total_pages,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| request.page - 1),
            next_page: has_next_page.then(|| request.page + 1),
        }
    }
}

/// Run a paginated search
///
/// Count and page fetch are issued concurrently.
pub async fn list_transactions(
    executor: &QueryExecutor,
    search: &str,
    request: PageRequest,
) -> AnalyticsResult<Page<SaleRecord>> {
    let filter = RecordFilter::new().text(search);

    let (total_docs, docs) = tokio::try_join!(
        executor.count("list.count", &filter),
        executor.find("list.find", &filter, request.offset(), request.limit),
    )?;

    Ok(Page::new(docs, total_docs, request))
}
