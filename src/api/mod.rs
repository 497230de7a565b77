//! Salesboard REST API
//!
//! HTTP API layer for the sales dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Transactions
//! - `GET /api/transactions/list?search&page&perPage` - Paginated search
//! - `GET /api/transactions/statistics?month` - Monthly statistics
//! - `GET /api/transactions/bar-chart?month` - Monthly price histogram
//! - `GET /api/transactions/pie-chart?month` - Monthly category split
//! - `GET /api/transactions/combined?month&search&page&perPage` - All of the above
//! - `GET|POST /api/transactions/seed` - Replace the store with the seed feed
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use salesboard::analytics::AnalyticsService;
//! use salesboard::api::{serve, AppState};
//! use salesboard::config::Config;
//! use salesboard::import::SeedImporter;
//! use salesboard::storage::open_store;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let store = open_store(&config.storage)?;
//!     let analytics = AnalyticsService::new(store, config.analytics.clone());
//!     let importer = SeedImporter::new(config.import.clone())?;
//!
//!     serve(AppState::new(analytics, importer, config)).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let transaction_routes = Router::new()
        .route("/list", get(routes::transactions::list))
        .route("/statistics", get(routes::transactions::statistics))
        .route("/bar-chart", get(routes::transactions::bar_chart))
        .route("/pie-chart", get(routes::transactions::pie_chart))
        .route("/combined", get(routes::transactions::combined))
        .route(
            "/seed",
            get(routes::seed::seed).post(routes::seed::seed),
        );

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let request_timeout = Duration::from_secs(state.config.api.request_timeout_secs);
    let cors = cors_layer(&state.config.api.cors_origins);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/transactions", transaction_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS policy; no configured origins means any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.bind_addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Salesboard API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Salesboard API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
