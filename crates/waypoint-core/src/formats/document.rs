//! # Graph Document Format
//!
//! JSON persistence format for the Waypoint graph.
//!
//! ## Document Layout
//!
//! ```text
//! {
//!   "nodes": [ [key, {"x": int, "y": int, "readyForPickup": bool, ...}], ... ],
//!   "edges": [ [key, [ [neighborKey, weight], ... ] ], ... ]
//! }
//! ```
//!
//! Nodes and adjacency lists are written in iteration order, and both
//! directions of every edge are written, mirroring the in-memory layout.
//!
//! ## Decoding
//!
//! Decoding never touches the live graph until the whole document has been
//! validated and rebuilt into a detached staging graph. A rejected document
//! leaves the previous graph exactly as it was.

use crate::graph::{Adjacency, Graph, GraphStore};
use crate::primitives::MAX_DOCUMENT_SIZE;
use crate::{EdgeWeight, NodeKey, NodeMeta, WaypointError};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

// =============================================================================
// DOCUMENT
// =============================================================================

/// Serializable representation of the graph for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDocument {
    pub nodes: Vec<(NodeKey, NodeMeta)>,
    pub edges: Vec<(NodeKey, Vec<(NodeKey, EdgeWeight)>)>,
}

impl From<&Graph> for GraphDocument {
    fn from(graph: &Graph) -> Self {
        Self {
            nodes: graph
                .nodes()
                .map(|(key, meta)| (key.clone(), meta.clone()))
                .collect(),
            edges: graph
                .keys()
                .map(|key| {
                    let targets = graph
                        .neighbors(key)
                        .map(|(neighbor, weight)| (neighbor.clone(), weight))
                        .collect();
                    (key.clone(), targets)
                })
                .collect(),
        }
    }
}

impl TryFrom<GraphDocument> for Graph {
    type Error = WaypointError;

    /// Rebuild a graph from a parsed document into a fresh staging graph.
    ///
    /// Nodes go through `add_node`; adjacency lists are installed verbatim
    /// and then checked for dangling references and symmetry.
    fn try_from(document: GraphDocument) -> Result<Self, Self::Error> {
        let mut staging = Graph::new();

        for (key, meta) in document.nodes {
            if staging.node_exists(&key) {
                return Err(decode_error(format!("duplicate node {}", key)));
            }
            staging.add_node(key, meta)?;
        }

        let mut seen = IndexSet::new();
        for (key, targets) in document.edges {
            if !staging.node_exists(&key) {
                return Err(decode_error(format!(
                    "edge list for unknown node {}",
                    key
                )));
            }
            if !seen.insert(key.clone()) {
                return Err(decode_error(format!("duplicate edge list for {}", key)));
            }

            let mut adjacency = Adjacency::with_capacity(targets.len());
            for (neighbor, weight) in targets {
                if adjacency.insert(neighbor.clone(), weight).is_some() {
                    return Err(decode_error(format!(
                        "duplicate edge {} -> {}",
                        key, neighbor
                    )));
                }
            }
            staging.install_adjacency(key, adjacency);
        }

        if let Some(violation) = staging.integrity_violation() {
            return Err(decode_error(violation));
        }

        Ok(staging)
    }
}

fn decode_error(message: String) -> WaypointError {
    WaypointError::DecodeError(message)
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a graph to document text.
///
/// This is a pure transformation - no file I/O.
pub fn graph_to_json(graph: &Graph) -> Result<String, WaypointError> {
    serde_json::to_string(&GraphDocument::from(graph))
        .map_err(|e| WaypointError::SerializationError(e.to_string()))
}

/// Parse and rebuild a graph from document text.
///
/// This is a pure transformation - no file I/O.
///
/// Validates, in order:
/// 1. Maximum document size (before any parsing)
/// 2. Top-level shape: `nodes` and `edges` present and both sequences
/// 3. Entry shapes, metadata fields and edge weights
/// 4. Referential integrity and adjacency symmetry
pub fn graph_from_json(text: &str) -> Result<Graph, WaypointError> {
    if text.len() > MAX_DOCUMENT_SIZE {
        return Err(decode_error(format!(
            "document size {} bytes exceeds maximum allowed {} bytes",
            text.len(),
            MAX_DOCUMENT_SIZE
        )));
    }

    let document: GraphDocument = serde_json::from_str(text)
        .map_err(|e| decode_error(format!("malformed document: {}", e)))?;

    Graph::try_from(document)
}

impl Graph {
    /// Serialize this graph to document text.
    pub fn serialize(&self) -> Result<String, WaypointError> {
        graph_to_json(self)
    }

    /// Replace this graph with the one described by `text`.
    ///
    /// On any error the graph is left unmodified.
    pub fn deserialize(&mut self, text: &str) -> Result<(), WaypointError> {
        match graph_from_json(text) {
            Ok(staging) => {
                tracing::debug!(
                    "Document accepted: {} nodes, {} edges",
                    staging.node_count(),
                    staging.edge_count()
                );
                *self = staging;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Document rejected, graph left unchanged: {}", e);
                Err(e)
            }
        }
    }

    /// Build a new graph from document text.
    pub fn from_document(text: &str) -> Result<Self, WaypointError> {
        graph_from_json(text)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(s: &str) -> NodeKey {
        NodeKey::from(s)
    }

    fn sample() -> Graph {
        let mut graph = Graph::new();
        graph.add_node(key("A"), NodeMeta::new(0, 0, false)).expect("A");
        graph
            .add_node(
                key("B"),
                NodeMeta::new(1, 0, true)
                    .with_attribute("label", json!("dock"))
                    .expect("attribute"),
            )
            .expect("B");
        graph.add_node(key("C"), NodeMeta::new(2, 0, true)).expect("C");
        graph
            .add_edge(&key("A"), &key("B"), EdgeWeight::new(3.0).expect("w"))
            .expect("edge");
        graph
            .add_edge(&key("B"), &key("C"), EdgeWeight::new(4.5).expect("w"))
            .expect("edge");
        graph
    }

    #[test]
    fn serialize_layout() {
        let text = sample().serialize().expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");

        assert_eq!(
            value,
            json!({
                "nodes": [
                    ["A", {"x": 0, "y": 0, "readyForPickup": false}],
                    ["B", {"x": 1, "y": 0, "readyForPickup": true, "label": "dock"}],
                    ["C", {"x": 2, "y": 0, "readyForPickup": true}]
                ],
                "edges": [
                    ["A", [["B", 3.0]]],
                    ["B", [["A", 3.0], ["C", 4.5]]],
                    ["C", [["B", 4.5]]]
                ]
            })
        );
    }

    #[test]
    fn text_roundtrip_is_stable() {
        let text1 = sample().serialize().expect("first serialize");
        let restored = Graph::from_document(&text1).expect("deserialize");
        let text2 = restored.serialize().expect("second serialize");

        assert_eq!(text1, text2, "save -> load -> save must produce identical text");
    }

    #[test]
    fn deserialize_replaces_graph() {
        let text = sample().serialize().expect("serialize");
        let mut graph = Graph::new();
        graph.add_node(key("old"), NodeMeta::default()).expect("old");

        graph.deserialize(&text).expect("deserialize");

        assert!(!graph.node_exists(&key("old")));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(
            graph.node(&key("B")).and_then(|m| m.attribute("label")),
            Some(&json!("dock"))
        );
    }

    #[test]
    fn accepts_integer_weights_from_external_text() {
        let text = r#"{"nodes":[["a",{"x":0,"y":0,"readyForPickup":false}],["b",{"x":1,"y":0,"readyForPickup":true}]],
                      "edges":[["a",[["b",2]]],["b",[["a",2]]]]}"#;
        let graph = Graph::from_document(text).expect("deserialize");

        assert_eq!(
            graph.edge(&key("a"), &key("b")).map(EdgeWeight::value),
            Some(2.0)
        );
    }

    #[test]
    fn fractional_weights_roundtrip_exactly() {
        let weights = [
            0.1,
            373.686_555_340_855_65,
            1e-300,
            5e-324,
            f64::MAX,
        ];
        let mut graph = Graph::new();
        graph.add_node(key("hub"), NodeMeta::default()).expect("hub");
        for (i, w) in weights.iter().enumerate() {
            let spoke = NodeKey::new(format!("s{}", i));
            graph.add_node(spoke.clone(), NodeMeta::default()).expect("spoke");
            graph
                .add_edge(&key("hub"), &spoke, EdgeWeight::new(*w).expect("w"))
                .expect("edge");
        }

        let text = graph.serialize().expect("serialize");
        let restored = Graph::from_document(&text).expect("deserialize");

        for (i, w) in weights.iter().enumerate() {
            let spoke = NodeKey::new(format!("s{}", i));
            let bits = restored
                .edge(&key("hub"), &spoke)
                .map(|r| r.value().to_bits());
            assert_eq!(bits, Some(w.to_bits()), "weight {} changed", w);
        }
        assert_eq!(restored.serialize().expect("serialize"), text);
    }

    #[test]
    fn attribute_named_like_a_field_roundtrips() {
        let mut graph = Graph::new();
        let meta = NodeMeta::new(0, 0, false)
            .with_attribute("x", json!(5))
            .and_then(|m| m.with_attribute("readyForPickup", json!(true)))
            .and_then(|m| m.with_attribute("label", json!("dock")))
            .expect("attributes");
        graph.add_node(key("a"), meta.clone()).expect("a");

        let text = graph.serialize().expect("serialize");
        let restored = Graph::from_document(&text).expect("deserialize");

        assert_eq!(restored.node(&key("a")), Some(&meta));
        assert_eq!(restored.node(&key("a")).map(|m| m.x), Some(5));
    }

    fn assert_rejected_and_unchanged(text: &str) {
        let mut graph = sample();
        let before = graph.serialize().expect("serialize");

        let result = graph.deserialize(text);
        assert!(
            matches!(result, Err(WaypointError::DecodeError(_))),
            "expected DecodeError for {:?}, got {:?}",
            text,
            result
        );
        assert_eq!(graph.serialize().expect("serialize"), before);
    }

    #[test]
    fn rejects_garbage() {
        assert_rejected_and_unchanged("not valid");
    }

    #[test]
    fn rejects_missing_edges() {
        assert_rejected_and_unchanged(r#"{"nodes":[]}"#);
    }

    #[test]
    fn rejects_missing_nodes() {
        assert_rejected_and_unchanged(r#"{"edges":[]}"#);
    }

    #[test]
    fn rejects_non_sequence_lists() {
        assert_rejected_and_unchanged(r#"{"nodes":{},"edges":[]}"#);
        assert_rejected_and_unchanged(r#"{"nodes":[],"edges":"x"}"#);
    }

    #[test]
    fn rejects_unknown_top_level_field() {
        assert_rejected_and_unchanged(r#"{"nodes":[],"edges":[],"version":2}"#);
    }

    #[test]
    fn rejects_bad_metadata() {
        assert_rejected_and_unchanged(r#"{"nodes":[["a",{"x":"0","y":0,"readyForPickup":false}]],"edges":[]}"#);
        assert_rejected_and_unchanged(r#"{"nodes":[["a",{"x":0,"y":0}]],"edges":[]}"#);
    }

    #[test]
    fn rejects_negative_weight() {
        assert_rejected_and_unchanged(
            r#"{"nodes":[["a",{"x":0,"y":0,"readyForPickup":false}],["b",{"x":0,"y":1,"readyForPickup":false}]],
                "edges":[["a",[["b",-1]]],["b",[["a",-1]]]]}"#,
        );
    }

    #[test]
    fn rejects_dangling_neighbor() {
        assert_rejected_and_unchanged(
            r#"{"nodes":[["a",{"x":0,"y":0,"readyForPickup":false}]],
                "edges":[["a",[["ghost",1]]]]}"#,
        );
    }

    #[test]
    fn rejects_asymmetric_adjacency() {
        assert_rejected_and_unchanged(
            r#"{"nodes":[["a",{"x":0,"y":0,"readyForPickup":false}],["b",{"x":0,"y":1,"readyForPickup":false}]],
                "edges":[["a",[["b",1]]],["b",[]]]}"#,
        );
        assert_rejected_and_unchanged(
            r#"{"nodes":[["a",{"x":0,"y":0,"readyForPickup":false}],["b",{"x":0,"y":1,"readyForPickup":false}]],
                "edges":[["a",[["b",1]]],["b",[["a",2]]]]}"#,
        );
    }

    #[test]
    fn rejects_duplicates() {
        assert_rejected_and_unchanged(
            r#"{"nodes":[["a",{"x":0,"y":0,"readyForPickup":false}],["a",{"x":1,"y":0,"readyForPickup":false}]],
                "edges":[]}"#,
        );
        assert_rejected_and_unchanged(
            r#"{"nodes":[["a",{"x":0,"y":0,"readyForPickup":false}]],
                "edges":[["a",[]],["a",[]]]}"#,
        );
    }

    #[test]
    fn rejects_oversized_document() {
        let text = " ".repeat(MAX_DOCUMENT_SIZE + 1);
        assert_rejected_and_unchanged(&text);
    }

    #[test]
    fn edge_list_may_omit_isolated_nodes() {
        let text = r#"{"nodes":[["a",{"x":0,"y":0,"readyForPickup":false}]],"edges":[]}"#;
        let graph = Graph::from_document(text).expect("deserialize");

        assert!(graph.node_exists(&key("a")));
        assert!(graph.adjacency(&key("a")).is_some());
    }
}
