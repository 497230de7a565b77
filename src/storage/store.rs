//! Record store capability contract
//!
//! The analytics core only needs a narrow set of read queries (filter,
//! count, sum, group-count) plus one bulk replace used by the seed import.
//! Any backend that can answer these can serve the dashboard.

use async_trait::async_trait;

use crate::storage::error::StorageResult;
use crate::storage::types::{CategoryCount, RecordFilter, SaleRecord};

/// Queryable collection of sale records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Count records matching a filter
    async fn count(&self, filter: &RecordFilter) -> StorageResult<u64>;

    /// Fetch up to `limit` matching records after skipping `offset`,
    /// in store-defined (insertion) order
    async fn find(
        &self,
        filter: &RecordFilter,
        offset: u64,
        limit: u64,
    ) -> StorageResult<Vec<SaleRecord>>;

    /// Sum of prices over matching records (0.0 when nothing matches)
    async fn sum_price(&self, filter: &RecordFilter) -> StorageResult<f64>;

    /// Count matching records per distinct category; never emits zero counts
    async fn count_by_category(&self, filter: &RecordFilter) -> StorageResult<Vec<CategoryCount>>;

    /// Replace the entire contents of the store, returning the stored count
    async fn replace_all(&self, records: Vec<SaleRecord>) -> StorageResult<usize>;

    /// Total number of records
    async fn total(&self) -> StorageResult<u64> {
        self.count(&RecordFilter::new()).await
    }
}
