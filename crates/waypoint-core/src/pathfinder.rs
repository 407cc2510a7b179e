//! # Pathfinder
//!
//! Dijkstra-based queries over a [`Graph`].
//!
//! Both queries share one single-source core. The minimum is found with a
//! linear scan of the unvisited set (no priority queue), which makes a run
//! O(V²). That is fine for the few hundred nodes this engine targets.
//!
//! ## Tie-breaking
//!
//! When several unvisited nodes share the minimum tentative distance, the one
//! that comes first in node insertion order is selected. Results are therefore
//! reproducible for a given sequence of mutations.

use crate::graph::Graph;
use crate::primitives::DEFAULT_NEAREST_COUNT;
use crate::{NodeKey, Route, WaypointError};
use indexmap::{IndexMap, IndexSet};

// =============================================================================
// SHORTEST PATHS
// =============================================================================

/// Output of one single-source Dijkstra run.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    source: NodeKey,
    /// Tentative distances; `f64::INFINITY` for nodes never reached.
    distances: IndexMap<NodeKey, f64>,
    /// Predecessor of each reached node on its best known path.
    predecessors: IndexMap<NodeKey, NodeKey>,
}

impl ShortestPaths {
    /// The node the run started from.
    #[must_use]
    pub fn source(&self) -> &NodeKey {
        &self.source
    }

    /// Distance from the source, or `None` if unreachable or unknown.
    #[must_use]
    pub fn distance(&self, key: &NodeKey) -> Option<f64> {
        self.distances.get(key).copied().filter(|d| d.is_finite())
    }

    /// Check if a node was reached from the source.
    #[must_use]
    pub fn is_reachable(&self, key: &NodeKey) -> bool {
        self.distance(key).is_some()
    }

    /// All distances in node order (unreachable nodes carry `f64::INFINITY`).
    pub fn distances(&self) -> impl Iterator<Item = (&NodeKey, f64)> {
        self.distances.iter().map(|(k, d)| (k, *d))
    }

    fn raw_distance(&self, key: &NodeKey) -> f64 {
        self.distances.get(key).copied().unwrap_or(f64::INFINITY)
    }

    /// Rebuild the route to `target` by walking predecessors back to the
    /// source. Returns `None` if `target` was not reached.
    #[must_use]
    pub fn route_to(&self, target: &NodeKey) -> Option<Route> {
        let cost = self.distance(target)?;

        let mut nodes = vec![target.clone()];
        let mut current = target;
        while *current != self.source {
            current = self.predecessors.get(current)?;
            nodes.push(current.clone());
            // A predecessor chain longer than the node count would be a cycle.
            if nodes.len() > self.distances.len() {
                return None;
            }
        }
        nodes.reverse();

        Some(Route { nodes, cost })
    }
}

// =============================================================================
// PATHFINDER
// =============================================================================

/// Stateless entry point for graph queries.
pub struct Pathfinder;

impl Pathfinder {
    /// Single-source shortest distances from `start` to every node.
    pub fn shortest_paths(graph: &Graph, start: &NodeKey) -> Result<ShortestPaths, WaypointError> {
        graph.require(start)?;
        Ok(Self::run(graph, start, None))
    }

    /// Find the cheapest route between two nodes.
    ///
    /// Returns `Ok(None)` if `end` cannot be reached from `start`.
    pub fn cheapest_path(
        graph: &Graph,
        start: &NodeKey,
        end: &NodeKey,
    ) -> Result<Option<Route>, WaypointError> {
        graph.require(start)?;
        graph.require(end)?;

        let route = Self::run(graph, start, Some(end)).route_to(end);
        match &route {
            Some(r) => tracing::debug!(
                "Route {} -> {}: {} hops, cost {}",
                start,
                end,
                r.hops(),
                r.cost
            ),
            None => tracing::debug!("Route {} -> {}: unreachable", start, end),
        }
        Ok(route)
    }

    /// Find up to `n` nodes flagged ready for pickup, closest first.
    ///
    /// `start` itself is a candidate (distance 0). Equal distances keep node
    /// insertion order. Ready nodes that cannot be reached sort after every
    /// reachable one.
    pub fn closest_ready(
        graph: &Graph,
        start: &NodeKey,
        n: usize,
    ) -> Result<Vec<NodeKey>, WaypointError> {
        graph.require(start)?;

        let paths = Self::run(graph, start, None);
        let mut candidates: Vec<(&NodeKey, f64)> = graph
            .nodes()
            .filter(|(_, meta)| meta.ready_for_pickup)
            .map(|(key, _)| (key, paths.raw_distance(key)))
            .collect();
        // sort_by is stable: ties stay in node order.
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        Ok(candidates
            .into_iter()
            .take(n)
            .map(|(key, _)| key.clone())
            .collect())
    }

    /// `closest_ready` with the default result count.
    pub fn closest_ready_default(
        graph: &Graph,
        start: &NodeKey,
    ) -> Result<Vec<NodeKey>, WaypointError> {
        Self::closest_ready(graph, start, DEFAULT_NEAREST_COUNT)
    }

    /// The shared Dijkstra core. `stop_at` ends the scan as soon as that node
    /// is selected, before its neighbors are relaxed.
    fn run(graph: &Graph, start: &NodeKey, stop_at: Option<&NodeKey>) -> ShortestPaths {
        let mut distances: IndexMap<NodeKey, f64> =
            graph.keys().map(|k| (k.clone(), f64::INFINITY)).collect();
        distances.insert(start.clone(), 0.0);

        let mut unvisited: IndexSet<NodeKey> = graph.keys().cloned().collect();
        let mut predecessors: IndexMap<NodeKey, NodeKey> = IndexMap::new();

        loop {
            // Linear scan; strict `<` keeps the first of equal candidates.
            let mut selected: Option<(usize, f64)> = None;
            for (index, key) in unvisited.iter().enumerate() {
                let d = distances.get(key).copied().unwrap_or(f64::INFINITY);
                if selected.is_none_or(|(_, best)| d < best) {
                    selected = Some((index, d));
                }
            }
            let Some((index, current_distance)) = selected else {
                break;
            };
            let Some(current) = unvisited.shift_remove_index(index) else {
                break;
            };

            if stop_at == Some(&current) {
                break;
            }

            for (neighbor, weight) in graph.neighbors(&current) {
                if !unvisited.contains(neighbor) {
                    continue;
                }
                let candidate = current_distance + weight.value();
                let known = distances.get(neighbor).copied().unwrap_or(f64::INFINITY);
                if candidate < known {
                    distances.insert(neighbor.clone(), candidate);
                    predecessors.insert(neighbor.clone(), current.clone());
                }
            }
        }

        ShortestPaths {
            source: start.clone(),
            distances,
            predecessors,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
