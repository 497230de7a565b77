//! SQLite record store
//!
//! Persists sale records in a single SQLite table with B-tree indexes on
//! the columns the dashboard filters by (sale date, price, category).
//!
//! rusqlite connections are blocking, so every query runs on Tokio's
//! blocking pool behind a `std::sync::Mutex`.
//!
//! # Schema
//! - `seq`: insertion order, used as the store-defined listing order
//! - `date_of_sale`: UTC epoch milliseconds, NULL for undated records
//! - `price_text`: the price as text search sees it (`100`, `329.85`)
//! - `title_lc`, `description_lc`: Unicode-lowercased copies for text
//!   search, since SQLite's `lower()` only folds ASCII

use async_trait::async_trait;
use chrono::DateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::store::RecordStore;
use crate::storage::types::{price_text, CategoryCount, RecordFilter, SaleRecord};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS sale_records (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL,
        title TEXT NOT NULL,
        price REAL NOT NULL,
        price_text TEXT NOT NULL,
        description TEXT NOT NULL,
        title_lc TEXT NOT NULL,
        description_lc TEXT NOT NULL,
        category TEXT NOT NULL,
        image TEXT NOT NULL,
        sold INTEGER NOT NULL,
        date_of_sale INTEGER
    );
    CREATE INDEX IF NOT EXISTS idx_date_of_sale ON sale_records(date_of_sale);
    CREATE INDEX IF NOT EXISTS idx_price ON sale_records(price);
    CREATE INDEX IF NOT EXISTS idx_category ON sale_records(category);
";

const RECORD_COLUMNS: &str =
    "id, title, price, description, category, image, sold, date_of_sale";

/// SQLite-backed record store
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Create or open a store at the given database path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        Self::init(conn, Some(path))
    }

    /// Create a private in-memory database (tests, throwaway runs)
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> StorageResult<Self> {
        conn.execute_batch(SCHEMA)?;

        tracing::debug!(path = ?path, "Opened SQLite record store");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// Database file path (None for in-memory stores)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run a closure against the connection on the blocking pool
    async fn run<T, F>(&self, f: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StorageResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|e| StorageError::Lock(e.to_string()))?;
            f(&mut guard)
        })
        .await?
    }
}

/// Translate a filter into a WHERE clause and its positional parameters
fn where_clause(filter: &RecordFilter) -> (String, Vec<Value>) {
    let mut conditions: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(needle) = filter.needle() {
        conditions.push(
            "(instr(title_lc, ?) > 0 OR instr(description_lc, ?) > 0 OR instr(price_text, ?) > 0)",
        );
        for _ in 0..3 {
            values.push(Value::Text(needle.clone()));
        }
    }

    if let Some(range) = filter.sold_within {
        conditions.push("date_of_sale IS NOT NULL AND date_of_sale >= ? AND date_of_sale < ?");
        values.push(Value::Integer(range.start_millis()));
        values.push(Value::Integer(range.end_millis()));
    }

    if let Some(range) = filter.price {
        conditions.push("price >= ?");
        values.push(Value::Real(range.min));
        if let Some(max) = range.max {
            conditions.push("price < ?");
            values.push(Value::Real(max));
        }
    }

    if let Some(sold) = filter.sold {
        conditions.push("sold = ?");
        values.push(Value::Integer(sold as i64));
    }

    if conditions.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), values)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<(SaleRecord, Option<i64>)> {
    let record = SaleRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        price: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        image: row.get(5)?,
        sold: row.get(6)?,
        date_of_sale: None,
    };
    let millis: Option<i64> = row.get(7)?;
    Ok((record, millis))
}

fn attach_date(
    (mut record, millis): (SaleRecord, Option<i64>),
) -> StorageResult<SaleRecord> {
    if let Some(ms) = millis {
        let date = DateTime::from_timestamp_millis(ms).ok_or_else(|| {
            StorageError::Corruption(format!(
                "record {} has out-of-range sale timestamp {}",
                record.id, ms
            ))
        })?;
        record.date_of_sale = Some(date);
    }
    Ok(record)
}

#[async_trait]
impl RecordStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn count(&self, filter: &RecordFilter) -> StorageResult<u64> {
        let (clause, values) = where_clause(filter);
        self.run(move |conn| {
            let sql = format!("SELECT COUNT(*) FROM sale_records{}", clause);
            let count: i64 = conn.query_row(&sql, params_from_iter(values), |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    async fn find(
        &self,
        filter: &RecordFilter,
        offset: u64,
        limit: u64,
    ) -> StorageResult<Vec<SaleRecord>> {
        // Past i64::MAX no row can exist; SQLite would read a wrapped
        // negative OFFSET as 0
        let Ok(offset) = i64::try_from(offset) else {
            return Ok(Vec::new());
        };
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let (clause, mut values) = where_clause(filter);
        values.push(Value::Integer(limit));
        values.push(Value::Integer(offset));

        self.run(move |conn| {
            let sql = format!(
                "SELECT {} FROM sale_records{} ORDER BY seq LIMIT ? OFFSET ?",
                RECORD_COLUMNS, clause
            );
            let mut stmt = conn.prepare_cached(&sql)?;
            let rows = stmt.query_map(params_from_iter(values), record_from_row)?;

            let mut records = Vec::new();
            for row in rows {
                records.push(attach_date(row?)?);
            }
            Ok(records)
        })
        .await
    }

    async fn sum_price(&self, filter: &RecordFilter) -> StorageResult<f64> {
        let (clause, values) = where_clause(filter);
        self.run(move |conn| {
            // TOTAL() yields 0.0 on an empty set where SUM() yields NULL
            let sql = format!("SELECT TOTAL(price) FROM sale_records{}", clause);
            let sum: f64 = conn.query_row(&sql, params_from_iter(values), |row| row.get(0))?;
            Ok(sum)
        })
        .await
    }

    async fn count_by_category(&self, filter: &RecordFilter) -> StorageResult<Vec<CategoryCount>> {
        let (clause, values) = where_clause(filter);
        self.run(move |conn| {
            let sql = format!(
                "SELECT category, COUNT(*) FROM sale_records{} GROUP BY category ORDER BY category",
                clause
            );
            let mut stmt = conn.prepare_cached(&sql)?;
            let rows = stmt.query_map(params_from_iter(values), |row| {
                let count: i64 = row.get(1)?;
                Ok(CategoryCount {
                    category: row.get(0)?,
                    count: count as u64,
                })
            })?;

            let mut groups = Vec::new();
            for row in rows {
                groups.push(row?);
            }
            Ok(groups)
        })
        .await
    }

    async fn replace_all(&self, records: Vec<SaleRecord>) -> StorageResult<usize> {
        self.run(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM sale_records", [])?;

            {
                let mut stmt = tx.prepare_cached(
                    "INSERT INTO sale_records
                     (id, title, price, price_text, description, title_lc, description_lc,
                      category, image, sold, date_of_sale)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                )?;

                for record in &records {
                    stmt.execute(params![
                        record.id,
                        record.title,
                        record.price,
                        price_text(record.price),
                        record.description,
                        record.title.to_lowercase(),
                        record.description.to_lowercase(),
                        record.category,
                        record.image,
                        record.sold,
                        record.date_of_sale.map(|d| d.timestamp_millis()),
                    ])?;
                }
            }

            tx.commit()?;
            Ok(records.len())
        })
        .await
    }
}
