//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::analytics::AnalyticsError;
use crate::import::ImportError;
use crate::storage::StorageError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Dashboard query failed
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Seed import failed
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    /// Operation switched off by configuration
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Failing part of the combined view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
}

impl ApiError {
    /// HTTP status and stable error code
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Analytics(e) => {
                let status = match e.root() {
                    AnalyticsError::InvalidMonth(_) | AnalyticsError::InvalidPagination(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    _ => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, e.code())
            }
            ApiError::Storage(_) => (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE"),
            ApiError::Import(ImportError::Disabled) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Import(ImportError::Storage(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
            }
            ApiError::Import(_) => (StatusCode::BAD_GATEWAY, "IMPORT_FAILED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Internal(_) | ApiError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }

    fn part(&self) -> Option<String> {
        match self {
            ApiError::Analytics(AnalyticsError::PartialAggregation { part, .. }) => {
                Some(part.to_string())
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
                part: self.part(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        let err = ApiError::from(AnalyticsError::InvalidMonth("Smarch".into()));
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "INVALID_MONTH"));

        let err = ApiError::from(AnalyticsError::InvalidPagination("perPage".into()));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "INVALID_PAGINATION")
        );

        let err = ApiError::Validation("month is required".into());
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"));
    }

    #[test]
    fn test_partial_failure_takes_inner_status() {
        let err = ApiError::from(AnalyticsError::InvalidMonth("Smarch".into()).in_part("month"));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "PARTIAL_AGGREGATION_FAILURE")
        );
        assert_eq!(err.part().as_deref(), Some("month"));

        let err = ApiError::from(
            AnalyticsError::store("pie_chart.group", StorageError::Timeout(5000)).in_part("pieChart"),
        );
        assert_eq!(
            err.status_and_code(),
            (StatusCode::SERVICE_UNAVAILABLE, "PARTIAL_AGGREGATION_FAILURE")
        );
    }

    #[test]
    fn test_import_errors() {
        let err = ApiError::from(ImportError::Disabled);
        assert_eq!(err.status_and_code(), (StatusCode::FORBIDDEN, "FORBIDDEN"));

        let err = ApiError::from(ImportError::Upstream {
            status: 404,
            message: "missing".into(),
        });
        assert_eq!(err.status_and_code(), (StatusCode::BAD_GATEWAY, "IMPORT_FAILED"));
    }

    #[test]
    fn test_store_unavailable_message_names_operation() {
        let err = ApiError::from(AnalyticsError::store(
            "bar_chart.101-200",
            StorageError::Unavailable("connection reset".into()),
        ));

        assert_eq!(err.status_and_code().1, "STORE_UNAVAILABLE");
        assert!(err.to_string().contains("bar_chart.101-200"));
    }
}
