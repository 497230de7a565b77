//! Transaction Routes
//!
//! Dashboard views over the sale records.
//!
//! - GET /api/transactions/list - Paginated text search
//! - GET /api/transactions/statistics - Monthly revenue and sold counts
//! - GET /api/transactions/bar-chart - Monthly price histogram
//! - GET /api/transactions/pie-chart - Monthly category split
//! - GET /api/transactions/combined - All four views in one response

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::analytics::{BucketCount, CombinedParams, CombinedView, Page, Statistics};
use crate::api::dto::{CombinedQuery, ListParams, MonthParams};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::storage::{CategoryCount, SaleRecord};

/// GET /api/transactions/list
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Page<SaleRecord>>> {
    let page = state.analytics.list_transactions(&params.into()).await?;
    Ok(Json(page))
}

/// GET /api/transactions/statistics
pub async fn statistics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthParams>,
) -> ApiResult<Json<Statistics>> {
    let month = params.require()?;
    Ok(Json(state.analytics.statistics(&month).await?))
}

/// GET /api/transactions/bar-chart
///
/// Always ten entries, in bucket order, zero counts included.
pub async fn bar_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthParams>,
) -> ApiResult<Json<Vec<BucketCount>>> {
    let month = params.require()?;
    Ok(Json(state.analytics.bar_chart(&month).await?))
}

/// GET /api/transactions/pie-chart
pub async fn pie_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthParams>,
) -> ApiResult<Json<Vec<CategoryCount>>> {
    let month = params.require()?;
    Ok(Json(state.analytics.pie_chart(&month).await?))
}

/// GET /api/transactions/combined
///
/// Fails as a whole when any part fails; the error names the part.
pub async fn combined(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CombinedQuery>,
) -> ApiResult<Json<CombinedView>> {
    let params = CombinedParams::try_from(query)?;
    Ok(Json(state.analytics.combined(&params).await?))
}
