//! Core types and algorithms shared by the raml-atlas server and registry.
//!
//! This crate holds everything both sides of the pipeline agree on: the
//! parsed-specification data model ([`model`]), the resource-tree structuring
//! algorithm ([`builder`]), the capability traits the external RAML parser is
//! invoked through ([`parser`]), the resolution error taxonomy ([`error`]),
//! and the wire-format bodies exchanged over the resolution endpoint
//! ([`wire`]).

pub mod builder;
pub mod error;
pub mod model;
pub mod parser;
pub mod structure;
pub mod wire;

pub use builder::build_structure;
pub use error::ResolveError;
pub use model::{
    CacheRecord, MethodNode, ResourceNode, SourceDescriptor, SpecificationTree, Validator,
};
pub use parser::{JsonSpecParser, ReferenceReader, RemoteContent, SpecParser};
pub use structure::{ApiStructure, MethodStub, ResourceEntry};
