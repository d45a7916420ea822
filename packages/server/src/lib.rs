//! Public surface for the `raml-atlas-server` crate.
//!
//! Exposes the router builder, config, and the trait seams of the resolution
//! pipeline so an in-process server can be assembled without spawning a
//! subprocess (tests do exactly that with stub fetchers and parsers).

pub mod config;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod middleware;
pub mod reader;
pub mod router;
pub mod service;
pub mod store;

pub use config::ServerConfig;
pub use fetch::{ConditionalFetch, FetchOutcome, HttpFetcher};
pub use router::build_router;
pub use service::ResolutionService;
pub use store::{memory::MemoryStore, sqlite::SqliteStore, ResultStore};
