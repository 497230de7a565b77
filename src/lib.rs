//! # Salesboard
//!
//! Sales dashboard backend: monthly statistics, price histograms and
//! category breakdowns over a catalog of product sale records, plus a
//! paginated text search.
//!
//! ## Features
//!
//! - **Month windows**: month names resolve to half-open UTC intervals in a
//!   configurable reference year
//! - **Concurrent aggregation**: every view fans its store queries out in
//!   parallel, each bounded by a timeout
//! - **Pluggable store**: SQLite for persistence, in-memory for tests
//! - **Seed import**: load the public sale-record feed in one call
//!
//! ## Modules
//!
//! - [`storage`]: Sale record model, filters and the `RecordStore` trait
//! - [`analytics`]: Month resolver, search, statistics, histogram, categories
//! - [`import`]: Seed feed import
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use salesboard::analytics::AnalyticsService;
//! use salesboard::config::AnalyticsConfig;
//! use salesboard::storage::{MemoryStore, RecordStore, SaleRecord};
//! use chrono::{TimeZone, Utc};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     store
//!         .replace_all(vec![SaleRecord::new("1", "Blue Shirt", 25.0)
//!             .category("clothing")
//!             .sold(true)
//!             .sold_on(Utc.with_ymd_and_hms(2023, 4, 12, 10, 0, 0).unwrap())])
//!         .await?;
//!
//!     let service = AnalyticsService::new(store, AnalyticsConfig::default());
//!
//!     let stats = service.statistics("April").await?;
//!     println!("April revenue: {:.2}", stats.total_amount);
//!
//!     for bucket in service.bar_chart("April").await? {
//!         println!("{:>10}: {}", bucket.range, bucket.count);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod import;
pub mod logging;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    open_store, CategoryCount, DateRange, MemoryStore, PriceRange, RecordFilter, RecordStore,
    SaleRecord, SqliteStore, StorageError, StorageResult,
};

pub use analytics::{
    AnalyticsError, AnalyticsResult, AnalyticsService, BucketCount, CombinedParams, CombinedView,
    MonthWindow, Page, SearchParams, Statistics,
};

pub use import::{ImportError, ImportReport, SeedImporter};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{
    AnalyticsConfig, ApiConfig, Config, ConfigError, ImportConfig, LoggingConfig, StorageConfig,
    StoreBackend,
};
