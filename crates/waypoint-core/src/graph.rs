//! # Graph Store
//!
//! The in-memory graph storage for the Waypoint engine.
//!
//! This module implements the `GraphStore` trait.
//! All maps are `IndexMap`s so iteration follows insertion order; removals use
//! `shift_remove` to keep the remaining order intact. The Pathfinder's
//! tie-breaking depends on this order.

use crate::{EdgeWeight, NodeKey, NodeMeta, NodeMetaPatch, WaypointError};
use indexmap::IndexMap;

/// Per-node adjacency: neighbor key -> weight.
pub type Adjacency = IndexMap<NodeKey, EdgeWeight>;

// =============================================================================
// GRAPHSTORE TRAIT
// =============================================================================

/// The GraphStore trait defines the mutation and membership operations.
///
/// Every operation that references an existing key reports a missing key as
/// `WaypointError::NodeNotFound`; nothing is silently ignored.
pub trait GraphStore {
    /// Insert or replace a node.
    ///
    /// Replacing is destructive: the node's previous edges are dropped in both
    /// directions and it starts with an empty adjacency map.
    fn add_node(&mut self, key: NodeKey, meta: NodeMeta) -> Result<(), WaypointError>;

    /// Set the weight of the undirected edge `start`–`end`.
    /// If the edge exists, the weight is overwritten.
    fn add_edge(
        &mut self,
        start: &NodeKey,
        end: &NodeKey,
        weight: EdgeWeight,
    ) -> Result<(), WaypointError>;

    /// Remove the undirected edge `start`–`end`.
    /// Returns the removed weight, or `None` if the nodes were not connected.
    fn delete_edge(
        &mut self,
        start: &NodeKey,
        end: &NodeKey,
    ) -> Result<Option<EdgeWeight>, WaypointError>;

    /// Remove a node and every edge touching it. Returns its metadata.
    fn delete_node(&mut self, key: &NodeKey) -> Result<NodeMeta, WaypointError>;

    /// Merge a partial update into a node's metadata, creating the node if it
    /// does not exist yet.
    fn update_node(&mut self, key: &NodeKey, patch: NodeMetaPatch) -> Result<(), WaypointError>;

    /// Check if the graph contains a node.
    fn node_exists(&self, key: &NodeKey) -> bool;
}

// =============================================================================
// GRAPH IMPLEMENTATION
// =============================================================================

/// The main Graph structure.
///
/// Holds node metadata and symmetric adjacency. Every node key present in
/// `nodes` has an entry in `adjacency` (possibly empty) and vice versa.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Node storage: key -> metadata
    nodes: IndexMap<NodeKey, NodeMeta>,

    /// Adjacency list: key -> (neighbor -> weight), both directions stored
    adjacency: IndexMap<NodeKey, Adjacency>,
}

impl Graph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Existence guard used by every operation that needs the key present.
    pub(crate) fn require(&self, key: &NodeKey) -> Result<(), WaypointError> {
        if self.nodes.contains_key(key) {
            Ok(())
        } else {
            Err(WaypointError::NodeNotFound(key.clone()))
        }
    }

    /// Get a node's metadata.
    #[must_use]
    pub fn node(&self, key: &NodeKey) -> Option<&NodeMeta> {
        self.nodes.get(key)
    }

    /// Get all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeKey, &NodeMeta)> {
        self.nodes.iter()
    }

    /// Get all node keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.nodes.keys()
    }

    /// Get the neighbors of a node in edge insertion order.
    /// Yields nothing for an unknown key.
    pub fn neighbors(&self, key: &NodeKey) -> impl Iterator<Item = (&NodeKey, EdgeWeight)> {
        self.adjacency
            .get(key)
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(k, w)| (k, *w)))
    }

    /// Get the full adjacency map of a node.
    #[must_use]
    pub fn adjacency(&self, key: &NodeKey) -> Option<&Adjacency> {
        self.adjacency.get(key)
    }

    /// Get the weight of the edge between two nodes.
    #[must_use]
    pub fn edge(&self, a: &NodeKey, b: &NodeKey) -> Option<EdgeWeight> {
        self.adjacency.get(a)?.get(b).copied()
    }

    /// Check if two nodes are connected.
    #[must_use]
    pub fn contains_edge(&self, a: &NodeKey, b: &NodeKey) -> bool {
        self.edge(a, b).is_some()
    }

    /// Get every undirected edge once, in deterministic order.
    ///
    /// Each pair is reported from the endpoint that was inserted first, so a
    /// renderer can draw each line exactly once.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeKey, &NodeKey, EdgeWeight)> + '_ {
        self.adjacency.iter().flat_map(move |(from, targets)| {
            let from_index = self.nodes.get_index_of(from);
            targets.iter().filter_map(move |(to, weight)| {
                (from_index <= self.nodes.get_index_of(to)).then_some((from, to, *weight))
            })
        })
    }

    /// Get the total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Check if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove every node and edge.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.adjacency.clear();
    }

    /// Check that every adjacency entry has an equal-weight mirror.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.integrity_violation().is_none()
    }

    /// Describe the first structural violation found, if any.
    ///
    /// Checks that adjacency keys are exactly the node keys, that no entry
    /// points at an unknown node, and that every entry is mirrored with the
    /// same weight.
    pub(crate) fn integrity_violation(&self) -> Option<String> {
        if let Some(key) = self.nodes.keys().find(|k| !self.adjacency.contains_key(*k)) {
            return Some(format!("node {} has no adjacency map", key));
        }
        for (from, targets) in &self.adjacency {
            if !self.nodes.contains_key(from) {
                return Some(format!("adjacency for unknown node {}", from));
            }
            for (to, weight) in targets {
                if !self.nodes.contains_key(to) {
                    return Some(format!("edge {} -> {} references unknown node", from, to));
                }
                match self.edge(to, from) {
                    Some(mirror) if mirror == *weight => {}
                    Some(mirror) => {
                        return Some(format!(
                            "edge {} -> {} has weight {} but {} -> {} has weight {}",
                            from, to, weight, to, from, mirror
                        ));
                    }
                    None => {
                        return Some(format!(
                            "edge {} -> {} has no mirror {} -> {}",
                            from, to, to, from
                        ));
                    }
                }
            }
        }
        None
    }

    /// Install a node's adjacency map verbatim.
    ///
    /// Used by the codec when rebuilding a staging graph; symmetry is checked
    /// afterwards with `integrity_violation`.
    pub(crate) fn install_adjacency(&mut self, key: NodeKey, targets: Adjacency) {
        self.adjacency.insert(key, targets);
    }
}

impl GraphStore for Graph {
    fn add_node(&mut self, key: NodeKey, meta: NodeMeta) -> Result<(), WaypointError> {
        match self.adjacency.get_mut(&key) {
            Some(previous) => {
                // Re-adding drops the old edges from the neighbors' side too.
                let former: Vec<NodeKey> = previous.drain(..).map(|(k, _)| k).collect();
                for neighbor in former {
                    if let Some(targets) = self.adjacency.get_mut(&neighbor) {
                        targets.shift_remove(&key);
                    }
                }
                tracing::debug!("Node {} replaced", key);
            }
            None => {
                self.adjacency.insert(key.clone(), Adjacency::new());
                tracing::debug!("Node {} added", key);
            }
        }
        self.nodes.insert(key, meta);
        Ok(())
    }

    fn add_edge(
        &mut self,
        start: &NodeKey,
        end: &NodeKey,
        weight: EdgeWeight,
    ) -> Result<(), WaypointError> {
        self.require(start)?;
        self.require(end)?;

        self.adjacency
            .entry(start.clone())
            .or_default()
            .insert(end.clone(), weight);
        self.adjacency
            .entry(end.clone())
            .or_default()
            .insert(start.clone(), weight);

        tracing::debug!("Edge {} -- {} set to {}", start, end, weight);
        Ok(())
    }

    fn delete_edge(
        &mut self,
        start: &NodeKey,
        end: &NodeKey,
    ) -> Result<Option<EdgeWeight>, WaypointError> {
        self.require(start)?;
        self.require(end)?;

        let removed = self
            .adjacency
            .get_mut(start)
            .and_then(|targets| targets.shift_remove(end));
        if let Some(targets) = self.adjacency.get_mut(end) {
            targets.shift_remove(start);
        }

        if removed.is_some() {
            tracing::debug!("Edge {} -- {} deleted", start, end);
        }
        Ok(removed)
    }

    fn delete_node(&mut self, key: &NodeKey) -> Result<NodeMeta, WaypointError> {
        let meta = self
            .nodes
            .shift_remove(key)
            .ok_or_else(|| WaypointError::NodeNotFound(key.clone()))?;

        if let Some(targets) = self.adjacency.shift_remove(key) {
            for neighbor in targets.keys() {
                if let Some(reverse) = self.adjacency.get_mut(neighbor) {
                    reverse.shift_remove(key);
                }
            }
        }

        tracing::debug!("Node {} deleted", key);
        Ok(meta)
    }

    fn update_node(&mut self, key: &NodeKey, patch: NodeMetaPatch) -> Result<(), WaypointError> {
        match self.nodes.get_mut(key) {
            Some(meta) => meta.merge(patch),
            None => {
                self.nodes.insert(key.clone(), NodeMeta::from(patch));
                self.adjacency.insert(key.clone(), Adjacency::new());
                tracing::debug!("Node {} created by update", key);
            }
        }
        Ok(())
    }

    fn node_exists(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> NodeKey {
        NodeKey::from(s)
    }

    fn weight(w: f64) -> EdgeWeight {
        EdgeWeight::new(w).expect("valid weight")
    }

    fn graph_with(keys: &[&str]) -> Graph {
        let mut graph = Graph::new();
        for (i, k) in keys.iter().enumerate() {
            graph
                .add_node(key(k), NodeMeta::new(i as i64, 0, false))
                .expect("add node");
        }
        graph
    }

    #[test]
    fn add_and_lookup_node() {
        let graph = graph_with(&["a"]);

        assert!(graph.node_exists(&key("a")));
        assert_eq!(graph.node(&key("a")), Some(&NodeMeta::new(0, 0, false)));
        assert_eq!(graph.adjacency(&key("a")).map(IndexMap::len), Some(0));
    }

    #[test]
    fn add_edge_is_symmetric() {
        let mut graph = graph_with(&["a", "b"]);
        graph
            .add_edge(&key("a"), &key("b"), weight(3.0))
            .expect("edge");

        assert_eq!(graph.edge(&key("a"), &key("b")), Some(weight(3.0)));
        assert_eq!(graph.edge(&key("b"), &key("a")), Some(weight(3.0)));
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.is_symmetric());
    }

    #[test]
    fn add_edge_overwrites_weight_in_place() {
        let mut graph = graph_with(&["a", "b", "c"]);
        graph.add_edge(&key("a"), &key("b"), weight(1.0)).expect("edge");
        graph.add_edge(&key("a"), &key("c"), weight(1.0)).expect("edge");
        graph.add_edge(&key("b"), &key("a"), weight(9.0)).expect("edge");

        let order: Vec<_> = graph.neighbors(&key("a")).map(|(k, _)| k.clone()).collect();
        assert_eq!(order, vec![key("b"), key("c")]);
        assert_eq!(graph.edge(&key("a"), &key("b")), Some(weight(9.0)));
    }

    #[test]
    fn add_edge_missing_node_fails_without_mutation() {
        let mut graph = graph_with(&["a"]);
        let result = graph.add_edge(&key("a"), &key("ghost"), weight(1.0));

        assert!(matches!(result, Err(WaypointError::NodeNotFound(k)) if k == key("ghost")));
        assert_eq!(graph.neighbors(&key("a")).count(), 0);
        assert!(!graph.node_exists(&key("ghost")));
    }

    #[test]
    fn delete_edge_removes_both_directions() {
        let mut graph = graph_with(&["a", "b"]);
        graph.add_edge(&key("a"), &key("b"), weight(2.0)).expect("edge");

        let removed = graph.delete_edge(&key("b"), &key("a")).expect("delete");
        assert_eq!(removed, Some(weight(2.0)));
        assert!(!graph.contains_edge(&key("a"), &key("b")));
        assert!(!graph.contains_edge(&key("b"), &key("a")));
    }

    #[test]
    fn delete_edge_without_edge_returns_none() {
        let mut graph = graph_with(&["a", "b"]);
        assert_eq!(graph.delete_edge(&key("a"), &key("b")).expect("delete"), None);
    }

    #[test]
    fn delete_edge_missing_node_fails() {
        let mut graph = graph_with(&["a"]);
        assert!(graph.delete_edge(&key("a"), &key("ghost")).is_err());
    }

    #[test]
    fn delete_node_cascades() {
        let mut graph = graph_with(&["a", "b", "c"]);
        graph.add_edge(&key("a"), &key("b"), weight(1.0)).expect("edge");
        graph.add_edge(&key("b"), &key("c"), weight(1.0)).expect("edge");

        let meta = graph.delete_node(&key("b")).expect("delete");
        assert_eq!(meta, NodeMeta::new(1, 0, false));

        assert!(!graph.node_exists(&key("b")));
        assert!(graph.adjacency(&key("b")).is_none());
        assert_eq!(graph.neighbors(&key("a")).count(), 0);
        assert_eq!(graph.neighbors(&key("c")).count(), 0);
        assert!(graph.is_symmetric());
    }

    #[test]
    fn delete_node_preserves_order_of_rest() {
        let mut graph = graph_with(&["a", "b", "c", "d"]);
        graph.delete_node(&key("b")).expect("delete");

        let keys: Vec<_> = graph.keys().cloned().collect();
        assert_eq!(keys, vec![key("a"), key("c"), key("d")]);
    }

    #[test]
    fn delete_missing_node_fails() {
        let mut graph = Graph::new();
        assert!(matches!(
            graph.delete_node(&key("ghost")),
            Err(WaypointError::NodeNotFound(_))
        ));
    }

    #[test]
    fn readd_node_drops_edges_both_ways() {
        let mut graph = graph_with(&["a", "b"]);
        graph.add_edge(&key("a"), &key("b"), weight(1.0)).expect("edge");

        graph
            .add_node(key("a"), NodeMeta::new(5, 5, true))
            .expect("re-add");

        assert_eq!(graph.node(&key("a")), Some(&NodeMeta::new(5, 5, true)));
        assert_eq!(graph.neighbors(&key("a")).count(), 0);
        assert_eq!(graph.neighbors(&key("b")).count(), 0);
        assert!(graph.is_symmetric());

        // Position is kept.
        assert_eq!(graph.keys().next(), Some(&key("a")));
    }

    #[test]
    fn update_node_merges() {
        let mut graph = graph_with(&["a"]);
        graph
            .update_node(&key("a"), NodeMetaPatch::new().ready_for_pickup(true))
            .expect("update");

        assert_eq!(graph.node(&key("a")), Some(&NodeMeta::new(0, 0, true)));
    }

    #[test]
    fn update_node_creates_missing_node_with_adjacency() {
        let mut graph = graph_with(&["a"]);
        graph
            .update_node(&key("z"), NodeMetaPatch::new().x(4).y(2))
            .expect("update");

        assert_eq!(graph.node(&key("z")), Some(&NodeMeta::new(4, 2, false)));
        assert!(graph.adjacency(&key("z")).is_some());
        graph
            .add_edge(&key("a"), &key("z"), weight(1.0))
            .expect("edge to created node");
        assert!(graph.is_symmetric());
    }

    #[test]
    fn self_loop_is_single_entry() {
        let mut graph = graph_with(&["a"]);
        graph.add_edge(&key("a"), &key("a"), weight(2.0)).expect("loop");

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.is_symmetric());

        graph.delete_node(&key("a")).expect("delete");
        assert!(graph.is_empty());
    }

    #[test]
    fn edges_reported_once_from_earlier_node() {
        let mut graph = graph_with(&["a", "b", "c"]);
        graph.add_edge(&key("c"), &key("a"), weight(1.0)).expect("edge");
        graph.add_edge(&key("b"), &key("c"), weight(2.0)).expect("edge");

        let edges: Vec<_> = graph
            .edges()
            .map(|(a, b, w)| (a.clone(), b.clone(), w))
            .collect();
        assert_eq!(
            edges,
            vec![
                (key("a"), key("c"), weight(1.0)),
                (key("b"), key("c"), weight(2.0)),
            ]
        );
    }

    #[test]
    fn clear_empties_graph() {
        let mut graph = graph_with(&["a", "b"]);
        graph.add_edge(&key("a"), &key("b"), weight(1.0)).expect("edge");
        graph.clear();

        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn integrity_violation_detects_missing_mirror() {
        let mut graph = graph_with(&["a", "b"]);
        let mut targets = Adjacency::new();
        targets.insert(key("b"), weight(1.0));
        graph.install_adjacency(key("a"), targets);

        assert!(!graph.is_symmetric());
        assert!(graph.integrity_violation().is_some());
    }
}
