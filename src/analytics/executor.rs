//! Query Executor
//!
//! Thin wrapper over a `RecordStore` that every aggregator goes through.
//! Each call is bounded by the configured query timeout and any failure
//! is tagged with the name of the sub-query that issued it, so callers
//! can tell `bar_chart.101-200` from `statistics.sum`.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::storage::{CategoryCount, RecordFilter, RecordStore, SaleRecord, StorageError, StorageResult};

/// Timeout-bounded, operation-tagged access to the record store
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn RecordStore>,
    timeout: Duration,
}

impl QueryExecutor {
    /// Create a new executor
    pub fn new(store: Arc<dyn RecordStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Per-query timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn count(&self, operation: &str, filter: &RecordFilter) -> AnalyticsResult<u64> {
        self.guarded(operation, self.store.count(filter)).await
    }

    pub async fn find(
        &self,
        operation: &str,
        filter: &RecordFilter,
        offset: u64,
        limit: u64,
    ) -> AnalyticsResult<Vec<SaleRecord>> {
        self.guarded(operation, self.store.find(filter, offset, limit))
            .await
    }

    pub async fn sum_price(&self, operation: &str, filter: &RecordFilter) -> AnalyticsResult<f64> {
        self.guarded(operation, self.store.sum_price(filter)).await
    }

    pub async fn count_by_category(
        &self,
        operation: &str,
        filter: &RecordFilter,
    ) -> AnalyticsResult<Vec<CategoryCount>> {
        self.guarded(operation, self.store.count_by_category(filter))
            .await
    }

    async fn guarded<T, F>(&self, operation: &str, query: F) -> AnalyticsResult<T>
    where
        F: Future<Output = StorageResult<T>>,
    {
        let started = Instant::now();

        let result = match tokio::time::timeout(self.timeout, query).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout(self.timeout.as_millis() as u64)),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(value) => {
                tracing::trace!(operation, elapsed_ms, "Store query completed");
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(operation, elapsed_ms, error = %e, "Store query failed");
                Err(AnalyticsError::store(operation, e))
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Fault, FaultyStore};
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_passes_through_results() {
        let store = Arc::new(MemoryStore::with_records(vec![
            SaleRecord::new("1", "Mug", 5.0),
            SaleRecord::new("2", "Cup", 7.0),
        ]));
        let executor = QueryExecutor::new(store, Duration::from_secs(1));

        assert_eq!(executor.count("test.count", &RecordFilter::new()).await.unwrap(), 2);
        assert_eq!(
            executor.sum_price("test.sum", &RecordFilter::new()).await.unwrap(),
            12.0
        );
    }

    #[tokio::test]
    async fn test_store_error_names_operation() {
        let store = Arc::new(FaultyStore::new(Vec::new(), Fault::Down));
        let executor = QueryExecutor::new(store, Duration::from_secs(1));

        let err = executor
            .count("list.count", &RecordFilter::new())
            .await
            .unwrap_err();
        match err {
            AnalyticsError::StoreUnavailable { operation, source } => {
                assert_eq!(operation, "list.count");
                assert!(matches!(source, StorageError::Unavailable(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_hung_query_times_out() {
        let store = Arc::new(FaultyStore::new(Vec::new(), Fault::Hang));
        let executor = QueryExecutor::new(store, Duration::from_millis(20));

        let err = executor
            .sum_price("statistics.sum", &RecordFilter::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::StoreUnavailable {
                source: StorageError::Timeout(20),
                ..
            }
        ));
    }
}
