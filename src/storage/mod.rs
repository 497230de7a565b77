//! Sale Record Store
//!
//! This module provides the record storage the dashboard reads from:
//!
//! - **types**: Core data structures (SaleRecord, DateRange, RecordFilter)
//! - **store**: The `RecordStore` capability trait
//! - **memory**: Vec-backed store for tests and ephemeral runs
//! - **sqlite**: SQLite-backed persistent store
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use salesboard::storage::{MemoryStore, RecordFilter, RecordStore, SaleRecord};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new();
//!     store
//!         .replace_all(vec![SaleRecord::new("1", "Blue Shirt", 25.0).sold(true)])
//!         .await?;
//!
//!     let shirts = store.count(&RecordFilter::new().text("shirt")).await?;
//!     println!("Found {} shirts", shirts);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::RecordStore;
pub use types::{CategoryCount, DateRange, PriceRange, RecordFilter, SaleRecord};

use std::sync::Arc;

use crate::config::{StorageConfig, StoreBackend};

/// Open the record store selected by configuration
pub fn open_store(config: &StorageConfig) -> StorageResult<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match config.backend {
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(config.resolved_db_path())?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    tracing::info!(backend = store.backend(), "Opened record store");
    Ok(store)
}
