//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::error::AppError;
use crate::state::AppState;
use crate::storage;
use serde_json::json;
use std::path::Path;
use waypoint_core::{
    EdgeWeight, Graph, GraphStore, NodeKey, NodeMeta, NodeMetaPatch, Pathfinder, grid_key,
};

fn print_json(value: &serde_json::Value) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create an empty graph document.
pub fn cmd_init(graph_path: &Path, force: bool) -> Result<(), AppError> {
    if graph_path.exists() && !force {
        return Err(AppError::AlreadyExists(graph_path.to_path_buf()));
    }

    storage::save_graph(&Graph::new(), graph_path)?;
    println!("Initialized empty graph at {}", graph_path.display());
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show graph status.
pub fn cmd_status(graph_path: &Path, json_mode: bool) -> Result<(), AppError> {
    let state = AppState::open(graph_path)?;
    let graph = state.graph();
    let ready = graph.nodes().filter(|(_, m)| m.ready_for_pickup).count();

    if json_mode {
        return print_json(&json!({
            "graph": graph_path.to_string_lossy(),
            "node_count": graph.node_count(),
            "edge_count": graph.edge_count(),
            "ready_count": ready,
        }));
    }

    println!("Waypoint Graph Status");
    println!("=====================");
    println!("Graph: {}", graph_path.display());
    println!();
    println!("Nodes: {}", graph.node_count());
    println!("Edges: {}", graph.edge_count());
    println!("Ready: {}", ready);

    Ok(())
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// Dump nodes and edges, the way a renderer would read them.
pub fn cmd_show(graph_path: &Path, json_mode: bool) -> Result<(), AppError> {
    let state = AppState::open(graph_path)?;
    let graph = state.graph();

    if json_mode {
        let nodes: Vec<_> = graph
            .nodes()
            .map(|(key, meta)| json!({ "key": key, "meta": meta }))
            .collect();
        let edges: Vec<_> = graph
            .edges()
            .map(|(a, b, w)| json!({ "from": a, "to": b, "weight": w }))
            .collect();
        return print_json(&json!({ "nodes": nodes, "edges": edges }));
    }

    println!("Nodes:");
    for (key, meta) in graph.nodes() {
        let marker = if meta.ready_for_pickup { " [ready]" } else { "" };
        println!("  {} @ ({}, {}){}", key, meta.x, meta.y, marker);
    }
    println!("Edges:");
    for (a, b, weight) in graph.edges() {
        println!("  {} -- {} ({})", a, b, weight);
    }

    Ok(())
}

// =============================================================================
// NODE COMMANDS
// =============================================================================

/// Add or replace a node. The key defaults to the grid key of `(x, y)`.
pub fn cmd_add_node(
    graph_path: &Path,
    key: Option<String>,
    x: i64,
    y: i64,
    ready: bool,
) -> Result<(), AppError> {
    let mut state = AppState::open(graph_path)?;
    let key = key.map(NodeKey::from).unwrap_or_else(|| grid_key(x, y));
    let replaced = state.graph().node_exists(&key);

    state
        .graph_mut()
        .add_node(key.clone(), NodeMeta::new(x, y, ready))?;
    state.save()?;

    if replaced {
        println!("Replaced node {} (previous edges dropped)", key);
    } else {
        println!("Added node {}", key);
    }
    Ok(())
}

/// Merge fields into a node.
pub fn cmd_update_node(
    graph_path: &Path,
    key: &str,
    x: Option<i64>,
    y: Option<i64>,
    ready: Option<bool>,
) -> Result<(), AppError> {
    let mut state = AppState::open(graph_path)?;
    let mut patch = NodeMetaPatch::new();
    patch.x = x;
    patch.y = y;
    patch.ready_for_pickup = ready;

    state.graph_mut().update_node(&NodeKey::from(key), patch)?;
    state.save()?;

    println!("Updated node {}", key);
    Ok(())
}

/// Delete a node and its edges.
pub fn cmd_delete_node(graph_path: &Path, key: &str) -> Result<(), AppError> {
    let mut state = AppState::open(graph_path)?;
    state.graph_mut().delete_node(&NodeKey::from(key))?;
    state.save()?;

    println!("Deleted node {}", key);
    Ok(())
}

// =============================================================================
// EDGE COMMANDS
// =============================================================================

/// Connect two nodes.
pub fn cmd_add_edge(graph_path: &Path, from: &str, to: &str, weight: f64) -> Result<(), AppError> {
    let weight = EdgeWeight::new(weight)?;
    let mut state = AppState::open(graph_path)?;

    state
        .graph_mut()
        .add_edge(&NodeKey::from(from), &NodeKey::from(to), weight)?;
    state.save()?;

    println!("Connected {} -- {} ({})", from, to, weight);
    Ok(())
}

/// Disconnect two nodes.
pub fn cmd_delete_edge(graph_path: &Path, from: &str, to: &str) -> Result<(), AppError> {
    let mut state = AppState::open(graph_path)?;
    let removed = state
        .graph_mut()
        .delete_edge(&NodeKey::from(from), &NodeKey::from(to))?;

    match removed {
        Some(weight) => {
            state.save()?;
            println!("Disconnected {} -- {} ({})", from, to, weight);
        }
        None => println!("{} and {} were not connected", from, to),
    }
    Ok(())
}

// =============================================================================
// QUERY COMMANDS
// =============================================================================

/// Find the cheapest route.
pub fn cmd_path(graph_path: &Path, json_mode: bool, from: &str, to: &str) -> Result<(), AppError> {
    let mut state = AppState::open(graph_path)?;
    let route = state.find_route(&NodeKey::from(from), &NodeKey::from(to))?;

    if json_mode {
        return print_json(&json!({ "from": from, "to": to, "route": route }));
    }

    match route {
        Some(route) => {
            let hops: Vec<&str> = route.nodes.iter().map(NodeKey::as_str).collect();
            println!("{}", hops.join(" -> "));
            println!("Cost: {} ({} hops)", route.cost, route.hops());
        }
        None => println!("No route from {} to {}", from, to),
    }
    Ok(())
}

/// Find the closest ready nodes.
pub fn cmd_nearest(
    graph_path: &Path,
    json_mode: bool,
    from: &str,
    count: usize,
) -> Result<(), AppError> {
    let state = AppState::open(graph_path)?;
    let start = NodeKey::from(from);
    let nearest = Pathfinder::closest_ready(state.graph(), &start, count)?;

    if json_mode {
        return print_json(&json!({ "from": from, "nearest": nearest }));
    }

    if nearest.is_empty() {
        println!("No ready nodes");
    }
    for (rank, key) in nearest.iter().enumerate() {
        println!("{}. {}", rank + 1, key);
    }
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Write the graph document to another file.
pub fn cmd_export(graph_path: &Path, output: &Path) -> Result<(), AppError> {
    let state = AppState::open(graph_path)?;
    storage::write_document(output, &state.graph().serialize()?)?;

    println!("Exported graph to {}", output.display());
    Ok(())
}

/// Replace the graph with the document in `input`.
///
/// A rejected document leaves both the in-memory graph and the stored file
/// untouched.
pub fn cmd_import(graph_path: &Path, input: &Path) -> Result<(), AppError> {
    let mut state = AppState::open(graph_path)?;
    let text = storage::read_document(input)?;

    state.graph_mut().deserialize(&text)?;
    state.save()?;

    println!(
        "Imported {} nodes, {} edges from {}",
        state.graph().node_count(),
        state.graph().edge_count(),
        input.display()
    );
    Ok(())
}
