//! In-memory result store.
//!
//! Records live in a `RwLock`'d map and vanish when the process exits. Used
//! by tests and by deployments that can afford to re-resolve after restart.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use raml_atlas::CacheRecord;

use super::{ResultStore, StoreError};

/// Thread-safe, in-memory implementation of [`ResultStore`].
pub struct MemoryStore {
    records: RwLock<HashMap<String, CacheRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn get(&self, url: &str) -> Result<Option<CacheRecord>, StoreError> {
        let records = self.records.read().unwrap_or_else(|p| p.into_inner());
        Ok(records.get(url).cloned())
    }

    async fn put(&self, record: &CacheRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().unwrap_or_else(|p| p.into_inner());
        records.insert(record.url.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use raml_atlas::{SpecificationTree, Validator};

    fn record(url: &str, etag: &str) -> CacheRecord {
        CacheRecord {
            url: url.into(),
            validator: Validator {
                etag: Some(etag.into()),
                last_access: Some(Utc::now()),
            },
            tree: SpecificationTree::default(),
            stored_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn missing_key_is_none_not_an_error() {
        let store = MemoryStore::new();
        assert!(store.get("https://example.com/a.raml").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        let rec = record("https://example.com/a.raml", "\"v1\"");
        store.put(&rec).await.unwrap();
        assert_eq!(store.get(&rec.url).await.unwrap(), Some(rec));
    }

    #[tokio::test]
    async fn put_overwrites_previous_record() {
        let store = MemoryStore::new();
        let url = "https://example.com/a.raml";
        store.put(&record(url, "\"v1\"")).await.unwrap();
        store.put(&record(url, "\"v2\"")).await.unwrap();
        let got = store.get(url).await.unwrap().unwrap();
        assert_eq!(got.validator.etag.as_deref(), Some("\"v2\""));
    }
}
