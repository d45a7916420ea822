//! Client-side provider registry for resolved API descriptions.
//!
//! A [`ProviderRegistry`] scans a document for alternate-RAML links, resolves
//! each one against a resolution endpoint, and exposes the results through a
//! single asynchronous lookup, [`ProviderRegistry::request_provider`].
//! Lookups issued while discovery is still in flight are queued and replayed
//! once every link has settled.
//!
//! The registry is an explicitly constructed instance handed to consumers;
//! the optional process-wide lookup lives in [`global`] as a thin adapter,
//! never as ambient state inside the core.

pub mod discovery;
pub mod global;
pub mod registry;
pub mod resolver;

pub use discovery::discover_links;
pub use registry::ProviderRegistry;
pub use resolver::{ApiResolver, RemoteResolver};
