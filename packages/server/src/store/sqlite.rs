//! SQLite-backed result store.
//!
//! Uses `rusqlite` (bundled SQLite) wrapped in an `Arc<Mutex<Connection>>` to
//! satisfy `Send + Sync`. All blocking calls are offloaded to the thread pool
//! via `tokio::task::spawn_blocking`.
//!
//! # Row layout
//!
//! One row per source URL: `url` is the primary key; `etag`, `time` (unix
//! millis of the last access) and `payload` (the parsed tree as JSON) are
//! plain columns — opaque payloads, not queryable attributes, so nothing is
//! indexed beyond the key.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use raml_atlas::{CacheRecord, SpecificationTree, Validator};

use super::{ResultStore, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS api_cache (
    url       TEXT PRIMARY KEY,
    etag      TEXT,
    time      INTEGER,
    payload   TEXT NOT NULL,
    stored_at TEXT NOT NULL
);
";

/// SQLite-backed implementation of [`ResultStore`].
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and apply the schema.
    pub fn open(path: &str) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (contents are lost when dropped).
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn map_err(e: rusqlite::Error) -> StoreError {
    StoreError::Internal(e.to_string())
}

fn map_json_err(e: serde_json::Error) -> StoreError {
    StoreError::Internal(format!("JSON error: {e}"))
}

#[async_trait]
impl ResultStore for SqliteStore {
    async fn get(&self, url: &str) -> Result<Option<CacheRecord>, StoreError> {
        let conn = Arc::clone(&self.conn);
        let url = url.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(|p| p.into_inner());
            let row = conn
                .query_row(
                    "SELECT url, etag, time, payload, stored_at FROM api_cache WHERE url = ?1",
                    params![url],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, Option<String>>(1)?,
                            row.get::<_, Option<i64>>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, String>(4)?,
                        ))
                    },
                )
                .optional()
                .map_err(map_err)?;

            let Some((url, etag, time, payload, stored_at)) = row else {
                return Ok(None);
            };

            let tree: SpecificationTree = serde_json::from_str(&payload).map_err(map_json_err)?;
            let last_access = time.and_then(|t| Utc.timestamp_millis_opt(t).single());
            let stored_at = DateTime::parse_from_rfc3339(&stored_at)
                .map_err(|e| StoreError::Internal(format!("bad stored_at: {e}")))?
                .with_timezone(&Utc);

            Ok(Some(CacheRecord {
                url,
                validator: Validator { etag, last_access },
                tree,
                stored_at,
            }))
        })
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))?
    }

    async fn put(&self, record: &CacheRecord) -> Result<(), StoreError> {
        let conn = Arc::clone(&self.conn);
        let record = record.clone();

        tokio::task::spawn_blocking(move || {
            let payload = serde_json::to_string(&record.tree).map_err(map_json_err)?;
            let time = record.validator.last_access.map(|t| t.timestamp_millis());

            let conn = conn.lock().unwrap_or_else(|p| p.into_inner());
            conn.execute(
                "INSERT OR REPLACE INTO api_cache (url, etag, time, payload, stored_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.url,
                    record.validator.etag,
                    time,
                    payload,
                    record.stored_at.to_rfc3339(),
                ],
            )
            .map_err(map_err)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))?
    }
}
