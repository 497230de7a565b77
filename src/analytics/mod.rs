//! Dashboard analytics
//!
//! Turns a month name or a search string into the four dashboard views:
//!
//! - **Listing**: paginated text search over every record
//! - **Statistics**: revenue and sold/unsold counts for a month
//! - **Bar chart**: price histogram over ten fixed buckets
//! - **Pie chart**: record counts per category
//!
//! All month-scoped views share one window definition (`MonthWindow`) and
//! every store call goes through a `QueryExecutor`, which bounds it by the
//! query timeout and names it in any error.
//!
//! # Example
//!
//! ```rust,ignore
//! use salesboard::analytics::AnalyticsService;
//! use salesboard::config::AnalyticsConfig;
//! use salesboard::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! let service = AnalyticsService::new(Arc::new(MemoryStore::new()), AnalyticsConfig::default());
//! let stats = service.statistics("April").await?;
//! println!("{} sold in April", stats.sold_items);
//! ```

pub mod buckets;
pub mod categories;
pub mod error;
pub mod executor;
pub mod histogram;
pub mod month;
pub mod search;
pub mod service;
pub mod stats;

pub use buckets::{bucket_for, PriceBucket, UpperBound, PRICE_BUCKETS};
pub use error::{AnalyticsError, AnalyticsResult};
pub use executor::QueryExecutor;
pub use histogram::BucketCount;
pub use month::{MonthWindow, DEFAULT_REFERENCE_YEAR, MONTH_NAMES};
pub use search::{Page, PageRequest, SearchParams, DEFAULT_PAGE, DEFAULT_PER_PAGE};
pub use service::{AnalyticsService, CombinedParams, CombinedView};
pub use stats::Statistics;
