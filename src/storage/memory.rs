//! In-memory record store
//!
//! Vec-backed store guarded by Tokio's async RwLock. Every query is a
//! linear scan, which is plenty for the catalog sizes the dashboard sees
//! and keeps tests free of any on-disk state.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::storage::error::StorageResult;
use crate::storage::store::RecordStore;
use crate::storage::types::{CategoryCount, RecordFilter, SaleRecord};

/// Vec-backed record store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<SaleRecord>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records
    pub fn with_records(records: Vec<SaleRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn count(&self, filter: &RecordFilter) -> StorageResult<u64> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| filter.matches(r)).count() as u64)
    }

    async fn find(
        &self,
        filter: &RecordFilter,
        offset: u64,
        limit: u64,
    ) -> StorageResult<Vec<SaleRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| filter.matches(r))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn sum_price(&self, filter: &RecordFilter) -> StorageResult<f64> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| r.price)
            .sum())
    }

    async fn count_by_category(&self, filter: &RecordFilter) -> StorageResult<Vec<CategoryCount>> {
        let records = self.records.read().await;

        let mut groups: BTreeMap<&str, u64> = BTreeMap::new();
        for record in records.iter().filter(|r| filter.matches(r)) {
            *groups.entry(record.category.as_str()).or_insert(0) += 1;
        }

        Ok(groups
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect())
    }

    async fn replace_all(&self, records: Vec<SaleRecord>) -> StorageResult<usize> {
        let mut guard = self.records.write().await;
        *guard = records;
        Ok(guard.len())
    }
}
