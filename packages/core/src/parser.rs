//! Capability traits for the external RAML parser.
//!
//! The grammar itself is out of scope here: a [`SpecParser`] is an opaque
//! function from document text to a [`SpecificationTree`]. While parsing, a
//! RAML parser may need to pull in `!include`-style references; it does so
//! through the narrow [`ReferenceReader`] interface rather than an ad hoc
//! callback object, so the core depends on an abstraction and tests can
//! substitute canned content.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::model::SpecificationTree;

/// Content fetched for an absolute-URL cross reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteContent {
    pub content: String,
}

/// Read access to documents referenced from inside a RAML description.
#[async_trait]
pub trait ReferenceReader: Send + Sync {
    /// Read a path relative to the source document's directory.
    async fn read_relative(&self, path: &str) -> Result<String, ResolveError>;

    /// Read an absolute URL.
    async fn read_absolute(&self, url: &str) -> Result<RemoteContent, ResolveError>;
}

/// The external parser: raw document text in, specification tree out.
#[async_trait]
pub trait SpecParser: Send + Sync {
    async fn parse(
        &self,
        body: &str,
        reader: &dyn ReferenceReader,
    ) -> Result<SpecificationTree, ResolveError>;
}

/// Stand-in parser for specification trees already serialised as JSON.
///
/// A full RAML grammar parser plugs in behind [`SpecParser`]; this
/// implementation keeps the pipeline runnable and testable without one. It
/// never consults the reference reader, since a pre-serialised tree has no
/// unresolved includes.
pub struct JsonSpecParser;

#[async_trait]
impl SpecParser for JsonSpecParser {
    async fn parse(
        &self,
        body: &str,
        _reader: &dyn ReferenceReader,
    ) -> Result<SpecificationTree, ResolveError> {
        serde_json::from_str(body).map_err(|e| ResolveError::ParseFailure(e.to_string()))
    }
}
