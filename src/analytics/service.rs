//! Analytics Service
//!
//! Entry point for every dashboard view. Owns the store handle and the
//! analytics settings, and assembles the combined view by fanning the four
//! independent queries out concurrently.
//!
//! # Combined view
//!
//! ```text
//! month ──► MonthWindow ──┬─► statistics ─┐
//!                         ├─► bar chart ──┤
//!                         └─► pie chart ──┼─► CombinedView
//! search/page/perPage ──────► listing ────┘
//! ```
//!
//! The first failing part aborts the join; the remaining in-flight queries
//! are dropped and the error names the part that failed.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::analytics::categories;
use crate::analytics::error::AnalyticsResult;
use crate::analytics::executor::QueryExecutor;
use crate::analytics::histogram::{self, BucketCount};
use crate::analytics::month::MonthWindow;
use crate::analytics::search::{self, Page, PageRequest, SearchParams};
use crate::analytics::stats::{self, Statistics};
use crate::config::AnalyticsConfig;
use crate::storage::{CategoryCount, RecordStore, SaleRecord};

/// Parameters of the combined view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedParams {
    pub search: SearchParams,
    pub month: String,
}

/// All four dashboard payloads in one response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedView {
    pub transactions: Page<SaleRecord>,
    pub statistics: Statistics,
    pub bar_chart: Vec<BucketCount>,
    pub pie_chart: Vec<CategoryCount>,
}

/// Dashboard query service
#[derive(Clone)]
pub struct AnalyticsService {
    executor: QueryExecutor,
    config: AnalyticsConfig,
}

impl AnalyticsService {
    /// Create a service over a record store
    pub fn new(store: Arc<dyn RecordStore>, config: AnalyticsConfig) -> Self {
        let timeout = Duration::from_millis(config.query_timeout_ms);
        Self {
            executor: QueryExecutor::new(store, timeout),
            config,
        }
    }

    /// Underlying record store
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        self.executor.store()
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Resolve a month name against the configured reference year
    pub fn resolve_month(&self, month: &str) -> AnalyticsResult<MonthWindow> {
        MonthWindow::resolve(month, self.config.reference_year)
    }

    /// Paginated text search
    pub async fn list_transactions(
        &self,
        params: &SearchParams,
    ) -> AnalyticsResult<Page<SaleRecord>> {
        let request = PageRequest::from_params(
            params,
            self.config.default_per_page,
            self.config.max_per_page,
        )?;

        let started = Instant::now();
        let page = search::list_transactions(&self.executor, &params.search, request).await?;

        tracing::debug!(
            search = %params.search,
            page = page.page,
            total_docs = page.total_docs,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Listed transactions"
        );
        Ok(page)
    }

    /// Revenue and sold/unsold counts for a month
    pub async fn statistics(&self, month: &str) -> AnalyticsResult<Statistics> {
        let window = self.resolve_month(month)?;
        self.statistics_for(&window).await
    }

    /// Price histogram for a month
    pub async fn bar_chart(&self, month: &str) -> AnalyticsResult<Vec<BucketCount>> {
        let window = self.resolve_month(month)?;
        self.bar_chart_for(&window).await
    }

    /// Category distribution for a month
    pub async fn pie_chart(&self, month: &str) -> AnalyticsResult<Vec<CategoryCount>> {
        let window = self.resolve_month(month)?;
        self.pie_chart_for(&window).await
    }

    /// All four views at once; fails as a whole if any part fails
    pub async fn combined(&self, params: &CombinedParams) -> AnalyticsResult<CombinedView> {
        let started = Instant::now();
        let window = self
            .resolve_month(&params.month)
            .map_err(|e| e.in_part("month"))?;

        let (transactions, statistics, bar_chart, pie_chart) = tokio::try_join!(
            async {
                self.list_transactions(&params.search)
                    .await
                    .map_err(|e| e.in_part("transactions"))
            },
            async {
                self.statistics_for(&window)
                    .await
                    .map_err(|e| e.in_part("statistics"))
            },
            async {
                self.bar_chart_for(&window)
                    .await
                    .map_err(|e| e.in_part("barChart"))
            },
            async {
                self.pie_chart_for(&window)
                    .await
                    .map_err(|e| e.in_part("pieChart"))
            },
        )?;

        tracing::info!(
            month = %window,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Built combined view"
        );

        Ok(CombinedView {
            transactions,
            statistics,
            bar_chart,
            pie_chart,
        })
    }

    async fn statistics_for(&self, window: &MonthWindow) -> AnalyticsResult<Statistics> {
        let stats = stats::statistics(&self.executor, window).await?;
        tracing::debug!(
            month = %window,
            total_amount = stats.total_amount,
            sold_items = stats.sold_items,
            not_sold_items = stats.not_sold_items,
            "Computed statistics"
        );
        Ok(stats)
    }

    async fn bar_chart_for(&self, window: &MonthWindow) -> AnalyticsResult<Vec<BucketCount>> {
        let chart = histogram::bar_chart(&self.executor, window).await?;
        tracing::debug!(month = %window, "Computed price histogram");
        Ok(chart)
    }

    async fn pie_chart_for(&self, window: &MonthWindow) -> AnalyticsResult<Vec<CategoryCount>> {
        let chart = categories::pie_chart(&self.executor, window).await?;
        tracing::debug!(month = %window, categories = chart.len(), "Computed category split");
        Ok(chart)
    }
}

impl std::fmt::Debug for AnalyticsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsService")
            .field("backend", &self.store().backend())
            .field("config", &self.config)
            .finish()
    }
}
