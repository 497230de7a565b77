//! Analytics error types
//!
//! Every failure the dashboard core can report. Each variant carries enough
//! detail (operation name and reason) to tell the categories apart.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur while answering a dashboard query
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Month name is not one of the twelve English month names
    #[error("Invalid month: '{0}' is not a month name (expected e.g. \"April\")")]
    InvalidMonth(String),

    /// Page size is zero, negative or above the configured maximum
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    /// A store query failed or timed out
    #[error("Store unavailable during {operation}: {source}")]
    StoreUnavailable {
        operation: String,
        #[source]
        source: StorageError,
    },

    /// One part of the combined view failed, so the whole view failed
    #[error("Combined view failed in {part}: {source}")]
    PartialAggregation {
        part: &'static str,
        #[source]
        source: Box<AnalyticsError>,
    },
}

impl AnalyticsError {
    /// Wrap a storage failure with the name of the sub-query that issued it
    pub fn store(operation: impl Into<String>, source: StorageError) -> Self {
        AnalyticsError::StoreUnavailable {
            operation: operation.into(),
            source,
        }
    }

    /// Attribute this error to one part of the combined view
    pub fn in_part(self, part: &'static str) -> Self {
        AnalyticsError::PartialAggregation {
            part,
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through combined-view wrapping
    pub fn root(&self) -> &AnalyticsError {
        match self {
            AnalyticsError::PartialAggregation { source, .. } => source.root(),
            other => other,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AnalyticsError::InvalidMonth(_) => "INVALID_MONTH",
            AnalyticsError::InvalidPagination(_) => "INVALID_PAGINATION",
            AnalyticsError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            AnalyticsError::PartialAggregation { .. } => "PARTIAL_AGGREGATION_FAILURE",
        }
    }

    /// True for errors caused by the caller's parameters
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.root(),
            AnalyticsError::InvalidMonth(_) | AnalyticsError::InvalidPagination(_)
        )
    }
}

/// Result type for analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyticsError::InvalidMonth("Smarch".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid month: 'Smarch' is not a month name (expected e.g. \"April\")"
        );

        let err = AnalyticsError::store("statistics.sum", StorageError::Timeout(250));
        assert_eq!(
            err.to_string(),
            "Store unavailable during statistics.sum: Query timed out after 250 ms"
        );
    }

    #[test]
    fn test_partial_aggregation_names_part() {
        let err = AnalyticsError::store("pie_chart.group", StorageError::Unavailable("down".into()))
            .in_part("pieChart");

        assert_eq!(err.code(), "PARTIAL_AGGREGATION_FAILURE");
        assert!(err.to_string().starts_with("Combined view failed in pieChart"));
        assert_eq!(err.root().code(), "STORE_UNAVAILABLE");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_client_errors() {
        assert!(AnalyticsError::InvalidMonth("x".into()).is_client_error());
        assert!(AnalyticsError::InvalidPagination("x".into())
            .in_part("transactions")
            .is_client_error());
    }
}
