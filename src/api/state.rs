//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::analytics::AnalyticsService;
use crate::config::Config;
use crate::import::SeedImporter;
use crate::storage::RecordStore;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Dashboard queries
    pub analytics: AnalyticsService,
    /// Seed import job
    pub importer: Arc<SeedImporter>,
    /// Full service configuration
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(analytics: AnalyticsService, importer: SeedImporter, config: Config) -> Self {
        Self {
            analytics,
            importer: Arc::new(importer),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Record store behind the analytics service
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        self.analytics.store()
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
