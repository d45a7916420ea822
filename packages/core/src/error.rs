//! Resolution error taxonomy.
//!
//! One enum covers every failure a resolution or lookup can surface, so both
//! the server (which maps them onto HTTP responses) and the registry (which
//! hands them to page code as rejections) speak the same language.

use thiserror::Error;

/// An error from the resolve-and-serve pipeline.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Missing or malformed caller input; rejected before any I/O happens.
    #[error("{0}")]
    InvalidInput(String),

    /// The source document could not be fetched (network error or a non-2xx,
    /// non-304 response). Never retried within one resolution.
    #[error("fetch failed: {0}")]
    FetchFailure(String),

    /// The external parser rejected the document. No partial structure is
    /// ever produced.
    #[error("parse failed: {0}")]
    ParseFailure(String),

    /// The persistence layer failed. Reads degrade to a cache miss and writes
    /// are dropped with a log line, so this rarely reaches a caller.
    #[error("store error: {0}")]
    StoreFailure(String),

    /// No API was resolved under the requested name.
    #[error("no API provider registered under {0:?}")]
    UnknownProvider(String),
}
