//! Statistics Aggregator
//!
//! Total revenue, sold count and unsold count for one month window.

use serde::{Deserialize, Serialize};

use crate::analytics::error::AnalyticsResult;
use crate::analytics::executor::QueryExecutor;
use crate::analytics::month::MonthWindow;
use crate::storage::RecordFilter;

/// Monthly sales summary
///
/// `total_amount` sums the price of every in-window record, sold or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_amount: f64,
    pub sold_items: u64,
    pub not_sold_items: u64,
}

impl Statistics {
    /// Number of in-window records
    pub fn total_items(&self) -> u64 {
        self.sold_items + self.not_sold_items
    }
}

/// Compute the summary for a month; an empty month yields all zeros
pub async fn statistics(
    executor: &QueryExecutor,
    window: &MonthWindow,
) -> AnalyticsResult<Statistics> {
    let in_window = RecordFilter::new().sold_within(window.range());
    let sold = in_window.clone().sold(true);
    let not_sold = in_window.clone().sold(false);

    let (total_amount, sold_items, not_sold_items) = tokio::try_join!(
        executor.sum_price("statistics.sum", &in_window),
        executor.count("statistics.sold", &sold),
        executor.count("statistics.not_sold", &not_sold),
    )?;

    Ok(Statistics {
        total_amount,
        sold_items,
        not_sold_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SaleRecord};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use std::time::Duration;

    fn executor(records: Vec<SaleRecord>) -> QueryExecutor {
        QueryExecutor::new(
            Arc::new(MemoryStore::with_records(records)),
            Duration::from_secs(1),
        )
    }

    fn april() -> MonthWindow {
        MonthWindow::resolve("April", 2023).unwrap()
    }

    #[tokio::test]
    async fn test_revenue_counts_sold_and_unsold() {
        let day = Utc.with_ymd_and_hms(2023, 4, 15, 10, 0, 0).unwrap();
        let executor = executor(vec![
            SaleRecord::new("1", "Hat", 10.0).sold(true).sold_on(day),
            SaleRecord::new("2", "Scarf", 20.0).sold(false).sold_on(day),
        ]);

        let stats = statistics(&executor, &april()).await.unwrap();
        assert_eq!(
            stats,
            Statistics {
                total_amount: 30.0,
                sold_items: 1,
                not_sold_items: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_only_in_window_records_count() {
        let executor = executor(vec![
            SaleRecord::new("1", "Hat", 10.0)
                .sold(true)
                .sold_on(Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap()),
            SaleRecord::new("2", "Boots", 80.0)
                .sold(true)
                .sold_on(Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap()),
            SaleRecord::new("3", "Gloves", 15.0)
                .sold(false)
                .sold_on(Utc.with_ymd_and_hms(2022, 4, 9, 0, 0, 0).unwrap()),
            SaleRecord::new("4", "Undated", 99.0).sold(true),
        ]);

        let stats = statistics(&executor, &april()).await.unwrap();
        assert_eq!(stats.total_amount, 10.0);
        assert_eq!(stats.sold_items, 1);
        assert_eq!(stats.not_sold_items, 0);
        assert_eq!(stats.total_items(), 1);
    }

    #[tokio::test]
    async fn test_empty_month_is_all_zero() {
        let executor = executor(Vec::new());

        let stats = statistics(&executor, &april()).await.unwrap();
        assert_eq!(stats, Statistics::default());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(Statistics {
            total_amount: 30.0,
            sold_items: 1,
            not_sold_items: 1,
        })
        .unwrap();

        assert_eq!(json["totalAmount"], 30.0);
        assert_eq!(json["soldItems"], 1);
        assert_eq!(json["notSoldItems"], 1);
    }
}
