//! # Application State
//!
//! The state owned by the input/rendering layer: the graph itself, where it
//! is persisted, and the most recently computed route. The engine holds no
//! state of its own; everything is passed in from here.

use crate::error::AppError;
use crate::storage;
use std::path::{Path, PathBuf};
use waypoint_core::{Graph, NodeKey, Pathfinder, Route};

/// Application state for one CLI session.
#[derive(Debug)]
pub struct AppState {
    graph: Graph,
    graph_path: PathBuf,
    last_route: Option<Route>,
}

impl AppState {
    /// Wrap an existing graph.
    #[must_use]
    pub fn new(graph: Graph, graph_path: impl Into<PathBuf>) -> Self {
        Self {
            graph,
            graph_path: graph_path.into(),
            last_route: None,
        }
    }

    /// Load the graph stored at `graph_path` (empty if the file is missing).
    pub fn open(graph_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let graph_path = graph_path.into();
        let graph = storage::load_graph(&graph_path)?;
        Ok(Self::new(graph, graph_path))
    }

    /// Persist the graph back to its file.
    pub fn save(&self) -> Result<(), AppError> {
        storage::save_graph(&self.graph, &self.graph_path)
    }

    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    #[must_use]
    pub fn graph_path(&self) -> &Path {
        &self.graph_path
    }

    /// Compute the cheapest route and remember it as the last route.
    pub fn find_route(&mut self, from: &NodeKey, to: &NodeKey) -> Result<Option<&Route>, AppError> {
        self.last_route = Pathfinder::cheapest_path(&self.graph, from, to)?;
        Ok(self.last_route.as_ref())
    }

    /// The route computed by the last `find_route` call, if any.
    #[must_use]
    pub fn last_route(&self) -> Option<&Route> {
        self.last_route.as_ref()
    }
}
