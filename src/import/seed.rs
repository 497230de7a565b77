//! Seed importer
//!
//! Fetches the seed JSON array over HTTP (or reads it from disk), coerces
//! each entry into a `SaleRecord` and replaces the store contents in one go.

use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::ImportConfig;
use crate::import::error::{ImportError, ImportResult};
use crate::import::record::{parse_payload, RawSaleRecord};
use crate::storage::{RecordStore, SaleRecord};

/// Outcome of one import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Entries in the source payload
    pub fetched: usize,
    /// Records written to the store
    pub stored: usize,
    /// Records whose sale date was missing or unparseable
    pub null_dates: usize,
}

/// Imports seed data into a record store
pub struct SeedImporter {
    client: Client,
    config: ImportConfig,
}

impl SeedImporter {
    /// Create a new importer with the given configuration
    pub fn new(config: ImportConfig) -> ImportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Fetch the configured source and replace the store contents
    pub async fn run(&self, store: &dyn RecordStore) -> ImportResult<ImportReport> {
        if !self.config.enabled {
            return Err(ImportError::Disabled);
        }

        let started = Instant::now();
        let raw = self.fetch().await?;
        let report = store_records(store, raw).await?;

        tracing::info!(
            source = %self.config.source_url,
            fetched = report.fetched,
            stored = report.stored,
            null_dates = report.null_dates,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Seed import complete"
        );
        Ok(report)
    }

    /// Download and parse the seed payload
    pub async fn fetch(&self) -> ImportResult<Vec<RawSaleRecord>> {
        let url = &self.config.source_url;
        tracing::debug!(url = %url, "Fetching seed data");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ImportError::Timeout
            } else if e.is_connect() {
                ImportError::Unavailable(e.to_string())
            } else {
                ImportError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ImportError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(parse_payload(&bytes)?)
    }
}

/// Read a seed payload from a local file and replace the store contents
pub async fn import_file(path: &Path, store: &dyn RecordStore) -> ImportResult<ImportReport> {
    let bytes = tokio::fs::read(path).await?;
    let raw = parse_payload(&bytes)?;
    let report = store_records(store, raw).await?;

    tracing::info!(
        path = %path.display(),
        stored = report.stored,
        null_dates = report.null_dates,
        "Imported seed file"
    );
    Ok(report)
}

/// Convert raw entries and replace the store contents with them
pub async fn store_records(
    store: &dyn RecordStore,
    raw: Vec<RawSaleRecord>,
) -> ImportResult<ImportReport> {
    let fetched = raw.len();
    let records: Vec<SaleRecord> = raw
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.into_record(i + 1))
        .collect();

    let null_dates = records.iter().filter(|r| r.date_of_sale.is_none()).count();
    if null_dates > 0 {
        tracing::warn!(null_dates, "Seed records without a usable sale date");
    }

    let stored = store.replace_all(records).await?;

    Ok(ImportReport {
        fetched,
        stored,
        null_dates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, RecordFilter, SqliteStore};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tempfile::tempdir;

    const PAYLOAD: &str = r#"[
        {"id": 1, "title": "Backpack", "price": 109.95, "sold": true,
         "category": "men's clothing", "dateOfSale": "2022-04-27T20:29:54+05:30"},
        {"id": 2, "title": "Slim Fit T-Shirt", "price": 22.3, "sold": false,
         "category": "men's clothing", "dateOfSale": "not-a-date"}
    ]"#;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/seed.json", addr)
    }

    fn importer(source_url: String) -> SeedImporter {
        SeedImporter::new(ImportConfig {
            source_url,
            timeout_secs: 5,
            ..ImportConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_replaces_store_contents() {
        let url = serve(Router::new().route("/seed.json", get(|| async { PAYLOAD }))).await;
        let store = MemoryStore::with_records(vec![SaleRecord::new("old", "Stale", 1.0)]);

        let report = importer(url).run(&store).await.unwrap();
        assert_eq!(
            report,
            ImportReport {
                fetched: 2,
                stored: 2,
                null_dates: 1
            }
        );

        let all = store.find(&RecordFilter::new(), 0, 10).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|r| r.id != "old"));
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let url = serve(Router::new().route(
            "/seed.json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;
        let store = MemoryStore::new();

        let err = importer(url).run(&store).await.unwrap_err();
        assert!(matches!(err, ImportError::Upstream { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_malformed_payload_leaves_store_untouched() {
        let url = serve(Router::new().route("/seed.json", get(|| async { "{\"oops\": true}" }))).await;
        let store = MemoryStore::with_records(vec![SaleRecord::new("keep", "Kept", 1.0)]);

        let err = importer(url).run(&store).await.unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
        assert_eq!(store.total().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_disabled_importer_refuses() {
        let importer = SeedImporter::new(ImportConfig {
            enabled: false,
            ..ImportConfig::default()
        })
        .unwrap();

        let err = importer.run(&MemoryStore::new()).await.unwrap_err();
        assert!(matches!(err, ImportError::Disabled));
    }

    #[tokio::test]
    async fn test_import_file_into_sqlite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, PAYLOAD).unwrap();
        let store = SqliteStore::open(dir.path().join("sales.db")).unwrap();

        let report = import_file(&path, &store).await.unwrap();
        assert_eq!(report.stored, 2);
        assert_eq!(report.null_dates, 1);
        assert_eq!(store.total().await.unwrap(), 2);
    }
}
