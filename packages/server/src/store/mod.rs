//! Result-store abstraction for cached resolutions.
//!
//! The [`ResultStore`] trait is a single-key get/put contract between the
//! resolution service and persistence. A missing key is `Ok(None)`, never an
//! error; put failures are reported to the caller, who logs and drops them —
//! durability is best-effort and never blocks the read path.
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`MemoryStore`] | Tests, ephemeral deployments |
//! | [`SqliteStore`] | Durable single-file cache |
//!
//! [`MemoryStore`]: memory::MemoryStore
//! [`SqliteStore`]: sqlite::SqliteStore

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use raml_atlas::CacheRecord;

/// Errors that store operations can return.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An unexpected error in the underlying store backend.
    #[error("internal store error: {0}")]
    Internal(String),
}

/// The persistence contract: one [`CacheRecord`] per source URL.
///
/// Implementations must be `Send + Sync + 'static` so they can be held in an
/// `Arc<dyn ResultStore>`. No guarantees beyond single-key atomicity are
/// assumed; concurrent writers of the same URL race and the last one wins.
#[async_trait]
pub trait ResultStore: Send + Sync + 'static {
    /// Retrieve the record for `url`. `Ok(None)` when nothing is cached.
    async fn get(&self, url: &str) -> Result<Option<CacheRecord>, StoreError>;

    /// Persist a record, overwriting any previous record for the same URL.
    async fn put(&self, record: &CacheRecord) -> Result<(), StoreError>;
}
