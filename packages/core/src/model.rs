//! Data model for the resolve-and-serve pipeline.
//!
//! [`SpecificationTree`] is the output of the external RAML parser, kept as a
//! plain serde structure so it round-trips to JSON for storage.
//! [`Validator`] and [`CacheRecord`] carry the HTTP conditional-request state
//! that lets a re-resolution skip the parse entirely when the source document
//! has not changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Identifies one API description discovered in a document.
///
/// `name` comes from the link's `title` attribute; `locator` is the link's
/// `href` resolved to an absolute URL against the document base. Immutable
/// once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub name: String,
    pub locator: Url,
}

/// HTTP conditional-request state for one source URL.
///
/// Replaced wholesale on every fresh fetch. `etag` takes priority over
/// `last_access` when building precondition headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// The `ETag` response header of the last fresh fetch, if the origin sent one.
    pub etag: Option<String>,
    /// When the last fresh fetch happened; used for `If-Modified-Since`.
    pub last_access: Option<DateTime<Utc>>,
}

impl Validator {
    /// `true` when no precondition can be built from this validator.
    pub fn is_empty(&self) -> bool {
        self.etag.is_none() && self.last_access.is_none()
    }
}

/// The parsed form of one RAML document, as produced by a [`SpecParser`].
///
/// Opaque to consumers of the structured API: only the resource/method graph
/// is interpreted, everything else is carried through for storage.
///
/// [`SpecParser`]: crate::parser::SpecParser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecificationTree {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(
        default,
        rename = "baseUri",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_uri: Option<String>,

    /// Top-level resources. Absent or empty means the API exposes nothing.
    #[serde(default)]
    pub resources: Vec<ResourceNode>,
}

/// One resource in the specification tree. Recursive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Path segment relative to the parent resource. May itself contain
    /// slashes (e.g. `/users/{id}`), which are stripped when the segment is
    /// used as a structure key.
    #[serde(rename = "relativeUri")]
    pub relative_uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub methods: Vec<MethodNode>,

    #[serde(default)]
    pub resources: Vec<ResourceNode>,
}

/// One HTTP method on a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodNode {
    /// Lowercase HTTP verb (`get`, `post`, ...).
    pub method: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One cached resolution result, keyed by source URL.
///
/// Owned exclusively by the result store; overwritten wholesale on each fresh
/// resolution. The validator is always the one returned by the fetch that
/// produced `tree`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub url: String,
    pub validator: Validator,
    /// The parsed tree, not the built structure: the structure is cheap to
    /// rebuild and its shape may evolve independently of the stored payload.
    pub tree: SpecificationTree,
    pub stored_at: DateTime<Utc>,
}
