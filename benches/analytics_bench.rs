//! Benchmarks for the dashboard aggregations
//!
//! Run with: cargo bench

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use salesboard::analytics::{bucket_for, AnalyticsService, CombinedParams, SearchParams};
use salesboard::config::AnalyticsConfig;
use salesboard::storage::{MemoryStore, RecordStore, SaleRecord, SqliteStore};
use std::sync::Arc;
use tempfile::tempdir;

const CATEGORIES: [&str; 4] = ["men's clothing", "women's clothing", "jewelery", "electronics"];

/// Records spread over 2022-2023 with prices across every bucket
fn create_test_records(count: usize) -> Vec<SaleRecord> {
    let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();

    (0..count)
        .map(|i| {
            SaleRecord::new(i.to_string(), format!("Product {}", i), (i * 37 % 1200) as f64 + 0.99)
                .description(format!("Description of product {}", i))
                .category(CATEGORIES[i % CATEGORIES.len()])
                .sold(i % 3 != 0)
                .sold_on(start + Duration::hours((i * 7 % 17_520) as i64))
        })
        .collect()
}

fn bench_buckets(c: &mut Criterion) {
    let prices: Vec<f64> = (0..10_000).map(|i| (i % 1500) as f64 + 0.5).collect();

    let mut group = c.benchmark_group("buckets");
    group.throughput(Throughput::Elements(prices.len() as u64));
    group.bench_function("bucket_for_10000", |b| {
        b.iter(|| {
            prices
                .iter()
                .filter(|p| bucket_for(black_box(**p)).is_some())
                .count()
        })
    });
    group.finish();
}

fn bench_memory_store(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("memory");

    for size in [1_000, 10_000] {
        let store = Arc::new(MemoryStore::with_records(create_test_records(size)));
        let service = AnalyticsService::new(store, AnalyticsConfig::default());

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("statistics_{}", size), |b| {
            b.iter(|| rt.block_on(service.statistics(black_box("April"))).unwrap())
        });

        group.bench_function(format!("bar_chart_{}", size), |b| {
            b.iter(|| rt.block_on(service.bar_chart(black_box("April"))).unwrap())
        });

        group.bench_function(format!("search_{}", size), |b| {
            let params = SearchParams::new("product 9").per_page(10);
            b.iter(|| rt.block_on(service.list_transactions(black_box(&params))).unwrap())
        });

        group.bench_function(format!("combined_{}", size), |b| {
            let params = CombinedParams {
                search: SearchParams::new("99"),
                month: "April".to_string(),
            };
            b.iter(|| rt.block_on(service.combined(black_box(&params))).unwrap())
        });
    }

    group.finish();
}

fn bench_sqlite_store(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("sqlite");

    group.bench_function("replace_all_10000", |b| {
        b.iter_custom(|iters| {
            rt.block_on(async {
                let dir = tempdir().unwrap();
                let store = SqliteStore::open(dir.path().join("bench.db")).unwrap();
                let records = create_test_records(10_000);

                let start = std::time::Instant::now();

                for _ in 0..iters {
                    store.replace_all(records.clone()).await.unwrap();
                }

                start.elapsed()
            })
        });
    });

    group.bench_function("combined_10000", |b| {
        b.iter_custom(|iters| {
            rt.block_on(async {
                let dir = tempdir().unwrap();
                let store = SqliteStore::open(dir.path().join("bench.db")).unwrap();
                store.replace_all(create_test_records(10_000)).await.unwrap();

                let service = AnalyticsService::new(Arc::new(store), AnalyticsConfig::default());
                let params = CombinedParams {
                    search: SearchParams::new("product"),
                    month: "April".to_string(),
                };

                let start = std::time::Instant::now();

                for _ in 0..iters {
                    let _ = service.combined(black_box(&params)).await.unwrap();
                }

                start.elapsed()
            })
        });
    });

    group.finish();
}

criterion_group!(benches, bench_buckets, bench_memory_store, bench_sqlite_store);
criterion_main!(benches);
