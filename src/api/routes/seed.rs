//! Seed Route
//!
//! - GET|POST /api/transactions/seed - Replace the store with the seed feed

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::SeedResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET|POST /api/transactions/seed
///
/// Destructive: the previous store contents are discarded.
pub async fn seed(State(state): State<Arc<AppState>>) -> ApiResult<Json<SeedResponse>> {
    if !state.importer.is_enabled() {
        return Err(ApiError::Forbidden(
            "Seed import is disabled by configuration".to_string(),
        ));
    }

    let report = state.importer.run(state.store().as_ref()).await?;
    Ok(Json(report.into()))
}
