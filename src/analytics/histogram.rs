//! Histogram Aggregator
//!
//! Counts in-window records per fixed price bucket. Sold status is not a
//! filter here. The ten bucket counts are independent store queries and
//! are issued together.

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::analytics::buckets::PRICE_BUCKETS;
use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::analytics::executor::QueryExecutor;
use crate::analytics::month::MonthWindow;
use crate::storage::RecordFilter;

/// One bar of the price histogram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    pub range: String,
    pub count: u64,
}

/// Bucket counts for a month, in fixed bucket order, zero buckets included
pub async fn bar_chart(
    executor: &QueryExecutor,
    window: &MonthWindow,
) -> AnalyticsResult<Vec<BucketCount>> {
    let in_window = RecordFilter::new().sold_within(window.range());

    let counts = try_join_all(PRICE_BUCKETS.iter().map(|bucket| {
        let filter = in_window.clone().price(bucket.price_range());
        async move {
            let operation = format!("bar_chart.{}", bucket.label);
            let count = executor.count(&operation, &filter).await?;
            Ok::<_, AnalyticsError>(BucketCount {
                range: bucket.label.to_string(),
                count,
            })
        }
    }))
    .await?;

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SaleRecord};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use std::time::Duration;

    fn executor_with_prices(prices: &[f64]) -> QueryExecutor {
        let day = Utc.with_ymd_and_hms(2023, 4, 20, 8, 0, 0).unwrap();
        let records = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                SaleRecord::new(i.to_string(), "Item", p)
                    .sold(i % 2 == 0)
                    .sold_on(day)
            })
            .collect();

        QueryExecutor::new(
            Arc::new(MemoryStore::with_records(records)),
            Duration::from_secs(1),
        )
    }

    fn count_of(chart: &[BucketCount], label: &str) -> u64 {
        chart
            .iter()
            .find(|b| b.range == label)
            .map(|b| b.count)
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_april_scenario() {
        let executor = executor_with_prices(&[50.0, 150.0, 100.0, 999.0]);
        let window = MonthWindow::resolve("April", 2023).unwrap();

        let chart = bar_chart(&executor, &window).await.unwrap();

        assert_eq!(chart.len(), 10);
        assert_eq!(count_of(&chart, "0-100"), 2);
        assert_eq!(count_of(&chart, "101-200"), 1);
        assert_eq!(count_of(&chart, "901-above"), 1);
        for bucket in &chart {
            if !["0-100", "101-200", "901-above"].contains(&bucket.range.as_str()) {
                assert_eq!(bucket.count, 0, "bucket {}", bucket.range);
            }
        }
    }

    #[tokio::test]
    async fn test_order_is_fixed_table_order() {
        let executor = executor_with_prices(&[950.0, 950.0, 950.0, 5.0]);
        let window = MonthWindow::resolve("April", 2023).unwrap();

        let chart = bar_chart(&executor, &window).await.unwrap();
        let labels: Vec<&str> = chart.iter().map(|b| b.range.as_str()).collect();
        let expected: Vec<&str> = PRICE_BUCKETS.iter().map(|b| b.label).collect();
        assert_eq!(labels, expected);
    }

    #[tokio::test]
    async fn test_boundary_prices_are_counted_once() {
        let prices = [0.0, 100.0, 100.5, 101.0, 200.0, 201.0, 800.0, 801.0, 900.0, 901.0];
        let executor = executor_with_prices(&prices);
        let window = MonthWindow::resolve("April", 2023).unwrap();

        let chart = bar_chart(&executor, &window).await.unwrap();
        let total: u64 = chart.iter().map(|b| b.count).sum();
        assert_eq!(total, prices.len() as u64);
        assert_eq!(count_of(&chart, "0-100"), 3);
        assert_eq!(count_of(&chart, "801-900"), 2);
        assert_eq!(count_of(&chart, "901-above"), 1);
    }

    #[tokio::test]
    async fn test_other_months_are_all_zero() {
        let executor = executor_with_prices(&[10.0, 500.0]);
        let window = MonthWindow::resolve("March", 2023).unwrap();

        let chart = bar_chart(&executor, &window).await.unwrap();
        assert_eq!(chart.len(), 10);
        assert!(chart.iter().all(|b| b.count == 0));
    }
}
