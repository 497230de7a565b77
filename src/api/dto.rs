//! Data Transfer Objects
//!
//! Query-string and response types for the API endpoints. Parameter names
//! (`search`, `page`, `perPage`, `month`) are part of the public contract.

use serde::{Deserialize, Serialize};

use crate::analytics::{CombinedParams, SearchParams};
use crate::api::error::{ApiError, ApiResult};
use crate::import::ImportReport;

// ============================================
// QUERY PARAMETERS
// ============================================

/// `GET /api/transactions/list`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub search: String,
    pub page: Option<i64>,
    #[serde(rename = "perPage")]
    pub per_page: Option<i64>,
}

impl From<ListParams> for SearchParams {
    fn from(params: ListParams) -> Self {
        SearchParams {
            search: params.search,
            page: params.page,
            per_page: params.per_page,
        }
    }
}

/// Month-scoped views
#[derive(Debug, Default, Deserialize)]
pub struct MonthParams {
    pub month: Option<String>,
}

impl MonthParams {
    /// The month name, or a validation error if it was not supplied
    pub fn require(self) -> ApiResult<String> {
        require_month(self.month)
    }
}

/// `GET /api/transactions/combined`
#[derive(Debug, Default, Deserialize)]
pub struct CombinedQuery {
    pub month: Option<String>,
    #[serde(default)]
    pub search: String,
    pub page: Option<i64>,
    #[serde(rename = "perPage")]
    pub per_page: Option<i64>,
}

impl TryFrom<CombinedQuery> for CombinedParams {
    type Error = ApiError;

    fn try_from(query: CombinedQuery) -> ApiResult<Self> {
        Ok(CombinedParams {
            month: require_month(query.month)?,
            search: SearchParams {
                search: query.search,
                page: query.page,
                per_page: query.per_page,
            },
        })
    }
}

fn require_month(month: Option<String>) -> ApiResult<String> {
    month.ok_or_else(|| ApiError::Validation("month query parameter is required".to_string()))
}

// ============================================
// SEED DTOs
// ============================================

/// Seed endpoint response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub message: String,
    /// Records now in the store
    pub stored: usize,
    /// Records stored without a sale date
    pub null_dates: usize,
}

impl From<ImportReport> for SeedResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            message: "Database seeded successfully".to_string(),
            stored: report.stored,
            null_dates: report.null_dates,
        }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy or unhealthy
    pub status: String,
    /// Store status: ok or error
    pub storage: String,
    /// Store backend name
    pub backend: String,
    /// Records in the store, when reachable
    pub records: Option<u64>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
