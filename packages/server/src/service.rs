//! Resolution orchestration: fetch → parse → structure, with cached reuse.
//!
//! One [`ResolutionService::resolve`] call handles one locator. The store is
//! consulted best-effort (read errors degrade to a cache miss), the fetch is
//! conditional on the stored validator, and a 304 skips the parser entirely.
//! Fresh results are returned to the caller immediately; the cache write
//! happens on a detached writer task fed through a queue, so a slow or
//! failing store never delays a response.
//!
//! Nothing synchronises concurrent resolutions of the same locator: each may
//! fetch and parse independently and the last cache write wins, which is
//! sound because identical source content yields identical results.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use url::Url;

use raml_atlas::parser::SpecParser;
use raml_atlas::{build_structure, ApiStructure, CacheRecord, ResolveError};

use crate::fetch::{ConditionalFetch, FetchOutcome};
use crate::reader::HttpReferenceReader;
use crate::store::ResultStore;

// ---------------------------------------------------------------------------
// StoreWriter
// ---------------------------------------------------------------------------

enum WriteJob {
    Put(CacheRecord),
    /// Ack once every previously queued put has completed. Test aid.
    Flush(oneshot::Sender<()>),
}

/// Detached cache-write task.
///
/// Owns every store write so that `resolve` only ever enqueues. Failures are
/// logged and dropped — a lost write leaves the previous record (or none) in
/// place and never invalidates the result already returned to the caller.
#[derive(Clone)]
pub struct StoreWriter {
    tx: mpsc::UnboundedSender<WriteJob>,
}

impl StoreWriter {
    /// Spawn the writer task over `store`.
    pub fn spawn(store: Arc<dyn ResultStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                match job {
                    WriteJob::Put(record) => {
                        if let Err(e) = store.put(&record).await {
                            tracing::warn!("cache write for {} failed: {e}", record.url);
                        }
                    }
                    WriteJob::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
        });
        Self { tx }
    }

    /// Queue a record for writing. Never blocks and never fails the caller.
    pub fn enqueue(&self, record: CacheRecord) {
        if self.tx.send(WriteJob::Put(record)).is_err() {
            tracing::warn!("cache writer task is gone; dropping write");
        }
    }

    /// Wait until every put queued before this call has been attempted.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(WriteJob::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }
}

// ---------------------------------------------------------------------------
// ResolutionService
// ---------------------------------------------------------------------------

/// Composes fetcher, parser, builder, and store for one locator per call.
pub struct ResolutionService {
    fetcher: Arc<dyn ConditionalFetch>,
    parser: Arc<dyn SpecParser>,
    store: Arc<dyn ResultStore>,
    writer: StoreWriter,
    /// Client handed to the reference reader for `!include` resolution.
    client: reqwest::Client,
}

impl ResolutionService {
    /// Assemble the pipeline and spawn its cache-write task.
    pub fn new(
        fetcher: Arc<dyn ConditionalFetch>,
        parser: Arc<dyn SpecParser>,
        store: Arc<dyn ResultStore>,
        client: reqwest::Client,
    ) -> Self {
        let writer = StoreWriter::spawn(Arc::clone(&store));
        Self {
            fetcher,
            parser,
            store,
            writer,
            client,
        }
    }

    /// Resolve one locator to its structured API.
    pub async fn resolve(&self, locator: &str) -> Result<ApiStructure, ResolveError> {
        let url = Url::parse(locator).map_err(|e| {
            ResolveError::InvalidInput(format!("invalid API locator {locator:?}: {e}"))
        })?;

        // Best effort: a failing store read is a cache miss, not a failure.
        let previous = match self.store.get(url.as_str()).await {
            Ok(previous) => previous,
            Err(e) => {
                tracing::warn!("cache read for {url} failed: {e}");
                None
            }
        };

        let outcome = self
            .fetcher
            .fetch(&url, previous.as_ref().map(|r| &r.validator))
            .await?;

        match outcome {
            FetchOutcome::NotModified => {
                // The origin only answers 304 to a precondition we sent, so a
                // prior record must exist; guard anyway against a store that
                // lost it between read and fetch.
                let record = previous.ok_or_else(|| {
                    ResolveError::FetchFailure(format!(
                        "origin answered 304 for {url} but no cached copy exists"
                    ))
                })?;
                tracing::debug!("{url} not modified; reusing cached tree");
                Ok(build_structure(&record.tree))
            }
            FetchOutcome::Fresh { body, validator } => {
                let reader = HttpReferenceReader::new(self.client.clone(), url.clone());
                let tree = self.parser.parse(&body, &reader).await?;
                let structure = build_structure(&tree);

                self.writer.enqueue(CacheRecord {
                    url: url.to_string(),
                    validator,
                    tree,
                    stored_at: Utc::now(),
                });

                Ok(structure)
            }
        }
    }

    /// Wait for queued cache writes to land. Used by tests and shutdown.
    pub async fn flush_writes(&self) {
        self.writer.flush().await;
    }
}
