//! Category Aggregator
//!
//! Record counts per distinct category within a month. Sparse: a category
//! with no in-window records gets no entry.

use crate::analytics::error::AnalyticsResult;
use crate::analytics::executor::QueryExecutor;
use crate::analytics::month::MonthWindow;
use crate::storage::{CategoryCount, RecordFilter};

/// Category distribution for a month
pub async fn pie_chart(
    executor: &QueryExecutor,
    window: &MonthWindow,
) -> AnalyticsResult<Vec<CategoryCount>> {
    let in_window = RecordFilter::new().sold_within(window.range());
    let mut groups = executor
        .count_by_category("pie_chart.group", &in_window)
        .await?;

    // Backends promise no empty groups; drop any that slip through anyway
    groups.retain(|g| g.count > 0);
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SaleRecord};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_groups_in_window_records_by_exact_category() {
        let april = Utc.with_ymd_and_hms(2023, 4, 2, 0, 0, 0).unwrap();
        let june = Utc.with_ymd_and_hms(2023, 6, 2, 0, 0, 0).unwrap();
        let store = MemoryStore::with_records(vec![
            SaleRecord::new("1", "Tee", 10.0).category("men's clothing").sold_on(april),
            SaleRecord::new("2", "Polo", 12.0).category("men's clothing").sold(true).sold_on(april),
            SaleRecord::new("3", "Phone", 300.0).category("electronics").sold_on(april),
            SaleRecord::new("4", "Ring", 80.0).category("jewelery").sold_on(june),
            SaleRecord::new("5", "Dress", 40.0).category("Men's Clothing").sold_on(april),
        ]);
        let executor = QueryExecutor::new(Arc::new(store), Duration::from_secs(1));
        let window = MonthWindow::resolve("April", 2023).unwrap();

        let mut chart = pie_chart(&executor, &window).await.unwrap();
        chart.sort_by(|a, b| a.category.cmp(&b.category));

        let pairs: Vec<(&str, u64)> = chart.iter().map(|c| (c.category.as_str(), c.count)).collect();
        assert_eq!(
            pairs,
            vec![("Men's Clothing", 1), ("electronics", 1), ("men's clothing", 2)]
        );
        assert!(chart.iter().all(|c| c.count > 0));
        assert_eq!(chart.iter().map(|c| c.count).sum::<u64>(), 4);
    }

    #[tokio::test]
    async fn test_empty_month_has_no_entries() {
        let executor = QueryExecutor::new(Arc::new(MemoryStore::new()), Duration::from_secs(1));
        let window = MonthWindow::resolve("April", 2023).unwrap();

        assert!(pie_chart(&executor, &window).await.unwrap().is_empty());
    }
}
