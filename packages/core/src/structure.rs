//! The structured, queryable form of a resolved API.
//!
//! An [`ApiStructure`] is a recursively nested mapping from sanitized
//! resource name to an entry carrying documentation, one [`MethodStub`] per
//! HTTP verb, and child entries for nested resources. On the wire it
//! flattens to the shape consuming page code expects:
//!
//! ```json
//! { "forecast": { "docs": "", "get": { "docs": "Get forecast" } } }
//! ```
//!
//! Verb keys and child-resource keys share one namespace in that JSON shape,
//! which is why serialisation and deserialisation are hand-written: a key is
//! interpreted as a method stub exactly when it is a known HTTP verb.
//!
//! `docs` is a reserved key in that namespace. A resource whose stripped URI
//! is literally `docs` serialises as a second `"docs"` key after the
//! description (consumers that keep the final occurrence of a duplicate key
//! see the child), and such output does not decode back into a structure.
//! Method names outside [`HTTP_VERBS`] are likewise unrepresentable: on
//! decode they classify as children. Neither shape arises from valid input.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Keys recognised as HTTP method stubs when decoding a structure.
pub const HTTP_VERBS: &[&str] = &[
    "get", "post", "put", "delete", "patch", "head", "options", "trace",
];

/// `true` if `key` names an HTTP method rather than a child resource.
pub fn is_http_verb(key: &str) -> bool {
    HTTP_VERBS.contains(&key)
}

/// A placeholder entry for one HTTP method on a resource.
///
/// Carries documentation only — stubs are named placeholders, not executable
/// request senders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodStub {
    pub docs: String,
}

/// One resource in the structured API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceEntry {
    /// The resource description, or the empty string when the specification
    /// gave none. Always present in the serialised form.
    pub docs: String,
    /// Method stubs keyed by lowercase verb.
    pub methods: BTreeMap<String, MethodStub>,
    /// Nested resources keyed by sanitized path segment.
    pub children: BTreeMap<String, ResourceEntry>,
}

/// A resolved API: top-level resources keyed by sanitized path segment.
///
/// Built once from a specification tree and never mutated afterwards — a
/// re-resolution replaces the whole value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiStructure {
    pub resources: BTreeMap<String, ResourceEntry>,
}

impl ApiStructure {
    /// `true` when the API exposes no resources at all.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl Serialize for ApiStructure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.resources.len()))?;
        for (name, entry) in &self.resources {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ApiStructure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let resources = BTreeMap::<String, ResourceEntry>::deserialize(deserializer)?;
        Ok(ApiStructure { resources })
    }
}

impl Serialize for ResourceEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + self.methods.len() + self.children.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("docs", &self.docs)?;
        for (verb, stub) in &self.methods {
            map.serialize_entry(verb, stub)?;
        }
        for (name, child) in &self.children {
            map.serialize_entry(name, child)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResourceEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = ResourceEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a resource entry object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entry = ResourceEntry::default();
                while let Some(key) = access.next_key::<String>()? {
                    if key == "docs" {
                        entry.docs = access.next_value()?;
                    } else if is_http_verb(&key) {
                        entry.methods.insert(key, access.next_value()?);
                    } else {
                        entry.children.insert(key, access.next_value()?);
                    }
                }
                Ok(entry)
            }
        }

        deserializer.deserialize_map(EntryVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ApiStructure {
        let mut forecast = ResourceEntry::default();
        forecast.methods.insert(
            "get".into(),
            MethodStub {
                docs: "Get forecast".into(),
            },
        );
        let mut resources = BTreeMap::new();
        resources.insert("forecast".into(), forecast);
        ApiStructure { resources }
    }

    #[test]
    fn serialises_to_flattened_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({ "forecast": { "docs": "", "get": { "docs": "Get forecast" } } })
        );
    }

    #[test]
    fn deserialises_verbs_and_children_into_separate_maps() {
        let json = json!({
            "users": {
                "docs": "User collection",
                "get": { "docs": "List users" },
                "byid": { "docs": "", "delete": { "docs": "Remove one" } }
            }
        });
        let structure: ApiStructure = serde_json::from_value(json).unwrap();
        let users = &structure.resources["users"];
        assert_eq!(users.docs, "User collection");
        assert_eq!(users.methods["get"].docs, "List users");
        assert_eq!(users.children["byid"].methods["delete"].docs, "Remove one");
    }

    #[test]
    fn child_named_docs_serialises_after_the_description() {
        let mut area = ResourceEntry {
            docs: "Area".into(),
            ..ResourceEntry::default()
        };
        area.children.insert(
            "docs".into(),
            ResourceEntry {
                docs: "child".into(),
                ..ResourceEntry::default()
            },
        );
        // Duplicate key: the description comes first, the child last, so
        // last-occurrence-wins consumers see the child.
        assert_eq!(
            serde_json::to_string(&area).unwrap(),
            r#"{"docs":"Area","docs":{"docs":"child"}}"#
        );
    }

    #[test]
    fn round_trips() {
        let original = sample();
        let json = serde_json::to_string(&original).unwrap();
        let back: ApiStructure = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }
}
