//! # waypoint-core
//!
//! The Graph Engine for Waypoint - THE ENGINE.
//!
//! An in-memory, undirected, weighted graph with:
//! - incremental mutation (node/edge CRUD) through the `GraphStore` trait
//! - Dijkstra cheapest-path and nearest-ready queries (`Pathfinder`)
//! - a lossless JSON document codec with fail-closed decoding (`formats`)
//!
//! ## Architectural Constraints
//!
//! The engine:
//! - Holds no global state; the caller owns each `Graph`
//! - Is synchronous and single-threaded; every call runs to completion
//! - Performs no I/O; persistence collaborators move document text in and out
//! - Keeps adjacency symmetric: an edge is stored as two equal-weight entries
//!
//! ## Example
//!
//! ```
//! use waypoint_core::{EdgeWeight, Graph, GraphStore, NodeKey, NodeMeta, Pathfinder};
//!
//! let mut graph = Graph::new();
//! let (a, b) = (NodeKey::from("a"), NodeKey::from("b"));
//! graph.add_node(a.clone(), NodeMeta::new(0, 0, false))?;
//! graph.add_node(b.clone(), NodeMeta::new(1, 0, true))?;
//! graph.add_edge(&a, &b, EdgeWeight::new(2.0)?)?;
//!
//! let route = Pathfinder::cheapest_path(&graph, &a, &b)?;
//! assert_eq!(route.map(|r| r.cost), Some(2.0));
//! # Ok::<(), waypoint_core::WaypointError>(())
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod formats;
pub mod graph;
pub mod pathfinder;
pub mod primitives;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{EdgeWeight, NodeKey, NodeMeta, NodeMetaPatch, Route, WaypointError};

// =============================================================================
// RE-EXPORTS: Graph Engine
// =============================================================================

pub use graph::{Adjacency, Graph, GraphStore};
pub use pathfinder::{Pathfinder, ShortestPaths};
pub use primitives::{DEFAULT_NEAREST_COUNT, MAX_DOCUMENT_SIZE, grid_key};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{GraphDocument, graph_from_json, graph_to_json};
