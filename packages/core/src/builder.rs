//! Resource-tree structuring: specification tree in, [`ApiStructure`] out.
//!
//! Pure and deterministic — no I/O, no clock. The traversal is depth-first
//! over `resources`, deriving each structure key by stripping every `/` from
//! the node's `relativeUri`.
//!
//! # Collision policy
//!
//! Stripped keys are not guaranteed unique: `/users` and `users/` both
//! degrade to `users`, and a URI consisting only of slashes degrades to the
//! empty string. The policy everywhere is **last write wins**, in traversal
//! order:
//!
//! - a later sibling resource overwrites an earlier one under the same key;
//! - a later duplicate verb on one resource overwrites the earlier stub;
//! - a child resource whose key equals a verb key displaces the method stub
//!   (children are merged after methods are attached).

use std::collections::BTreeMap;

use crate::model::{ResourceNode, SpecificationTree};
use crate::structure::{ApiStructure, MethodStub, ResourceEntry};

/// Convert a parsed specification tree into its structured, queryable form.
///
/// A tree with no top-level resources yields an empty structure.
pub fn build_structure(tree: &SpecificationTree) -> ApiStructure {
    let mut resources = BTreeMap::new();
    for node in &tree.resources {
        insert_resource(&mut resources, node);
    }
    ApiStructure { resources }
}

fn insert_resource(dest: &mut BTreeMap<String, ResourceEntry>, node: &ResourceNode) {
    let key = strip_slashes(&node.relative_uri);

    let mut entry = ResourceEntry {
        docs: node.description.clone().unwrap_or_default(),
        ..ResourceEntry::default()
    };

    for method in &node.methods {
        let verb = method.method.to_ascii_lowercase();
        entry.methods.insert(
            verb,
            MethodStub {
                docs: method.description.clone().unwrap_or_default(),
            },
        );
    }

    for child in &node.resources {
        // A child keyed like a verb displaces the method stub (last write wins).
        entry.methods.remove(&strip_slashes(&child.relative_uri));
        insert_resource(&mut entry.children, child);
    }

    dest.insert(key, entry);
}

fn strip_slashes(uri: &str) -> String {
    uri.chars().filter(|c| *c != '/').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MethodNode;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> SpecificationTree {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_tree_builds_empty_structure() {
        assert!(build_structure(&SpecificationTree::default()).is_empty());
        assert!(build_structure(&tree(json!({ "title": "Bare" }))).is_empty());
    }

    #[test]
    fn docs_defaults_to_empty_string() {
        let structure = build_structure(&tree(json!({
            "resources": [{ "relativeUri": "/status" }]
        })));
        assert_eq!(structure.resources["status"].docs, "");
    }

    #[test]
    fn scenario_weather_forecast() {
        let structure = build_structure(&tree(json!({
            "title": "weather",
            "resources": [{
                "relativeUri": "/forecast",
                "methods": [{ "method": "get", "description": "Get forecast" }]
            }]
        })));
        assert_eq!(
            serde_json::to_value(&structure).unwrap(),
            json!({ "forecast": { "docs": "", "get": { "docs": "Get forecast" } } })
        );
    }

    #[test]
    fn nested_resources_become_children() {
        let structure = build_structure(&tree(json!({
            "resources": [{
                "relativeUri": "/users",
                "description": "Users",
                "resources": [{
                    "relativeUri": "/{id}",
                    "methods": [{ "method": "delete" }]
                }]
            }]
        })));
        let users = &structure.resources["users"];
        assert_eq!(users.docs, "Users");
        assert!(users.children["{id}"].methods.contains_key("delete"));
    }

    #[test]
    fn later_sibling_with_same_key_wins() {
        // "/users" and "users/" both strip to "users".
        let structure = build_structure(&tree(json!({
            "resources": [
                { "relativeUri": "/users", "description": "first" },
                { "relativeUri": "users/", "description": "second" }
            ]
        })));
        assert_eq!(structure.resources.len(), 1);
        assert_eq!(structure.resources["users"].docs, "second");
    }

    #[test]
    fn later_duplicate_verb_wins() {
        let node = ResourceNode {
            relative_uri: "/things".into(),
            methods: vec![
                MethodNode {
                    method: "get".into(),
                    description: Some("first".into()),
                },
                MethodNode {
                    method: "GET".into(),
                    description: Some("second".into()),
                },
            ],
            ..ResourceNode::default()
        };
        let structure = build_structure(&SpecificationTree {
            resources: vec![node],
            ..SpecificationTree::default()
        });
        assert_eq!(structure.resources["things"].methods["get"].docs, "second");
    }

    #[test]
    fn child_keyed_like_verb_displaces_method_stub() {
        let structure = build_structure(&tree(json!({
            "resources": [{
                "relativeUri": "/api",
                "methods": [{ "method": "get", "description": "shadowed" }],
                "resources": [{ "relativeUri": "/get", "description": "child" }]
            }]
        })));
        let api = &structure.resources["api"];
        assert!(api.methods.is_empty());
        assert_eq!(api.children["get"].docs, "child");
    }

    #[test]
    fn slash_only_uri_degrades_to_empty_key() {
        let structure = build_structure(&tree(json!({
            "resources": [
                { "relativeUri": "//", "description": "slashes" },
                { "relativeUri": "", "description": "nothing" }
            ]
        })));
        // Both degrade to the same empty key; last write wins.
        assert_eq!(structure.resources.len(), 1);
        assert_eq!(structure.resources[""].docs, "nothing");
    }

    #[test]
    fn deterministic_for_same_input() {
        let input = tree(json!({
            "resources": [
                { "relativeUri": "/b", "methods": [{ "method": "post" }] },
                { "relativeUri": "/a" }
            ]
        }));
        assert_eq!(build_structure(&input), build_structure(&input));
    }
}
