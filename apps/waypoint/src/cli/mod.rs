//! # Waypoint CLI Module
//!
//! This module implements the CLI interface for Waypoint. Every invocation is
//! one discrete gesture: load the graph, apply a single engine call, and save
//! the graph back if it changed.
//!
//! ## Available Commands
//!
//! - `init` - Create an empty graph document
//! - `status` - Show node, edge and ready counts
//! - `show` - Dump nodes and adjacency for rendering
//! - `add-node` / `update-node` / `delete-node` - Node CRUD
//! - `add-edge` / `delete-edge` - Edge CRUD
//! - `path` - Cheapest route between two nodes
//! - `nearest` - Closest nodes flagged ready for pickup
//! - `export` / `import` - Copy the graph document out or in

mod commands;

use crate::config::AppConfig;
use crate::error::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Waypoint - undirected weighted graph with cheapest-route queries.
#[derive(Parser, Debug)]
#[command(name = "waypoint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the graph document (overrides the config file)
    #[arg(short = 'g', long, global = true)]
    pub graph: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty graph document
    Init {
        /// Overwrite an existing document
        #[arg(short, long)]
        force: bool,
    },

    /// Show graph status
    Status,

    /// Dump nodes and adjacency
    Show,

    /// Add (or replace) a node
    AddNode {
        /// Grid column
        #[arg(long, allow_negative_numbers = true)]
        x: i64,

        /// Grid row
        #[arg(long, allow_negative_numbers = true)]
        y: i64,

        /// Node key (defaults to "x,y")
        #[arg(short, long)]
        key: Option<String>,

        /// Mark the node ready for pickup
        #[arg(short, long)]
        ready: bool,
    },

    /// Merge fields into a node, creating it if missing
    UpdateNode {
        /// Node key
        #[arg(short, long)]
        key: String,

        #[arg(long, allow_negative_numbers = true)]
        x: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        y: Option<i64>,

        /// Ready-for-pickup flag
        #[arg(short, long)]
        ready: Option<bool>,
    },

    /// Delete a node and its edges
    DeleteNode {
        /// Node key
        #[arg(short, long)]
        key: String,
    },

    /// Connect two nodes (overwrites an existing weight)
    AddEdge {
        #[arg(short, long)]
        from: String,

        #[arg(short, long)]
        to: String,

        /// Non-negative edge weight
        #[arg(short, long, allow_negative_numbers = true)]
        weight: f64,
    },

    /// Disconnect two nodes
    DeleteEdge {
        #[arg(short, long)]
        from: String,

        #[arg(short, long)]
        to: String,
    },

    /// Find the cheapest route between two nodes
    Path {
        #[arg(short, long)]
        from: String,

        #[arg(short, long)]
        to: String,
    },

    /// Find the closest nodes that are ready for pickup
    Nearest {
        #[arg(short, long)]
        from: String,

        /// Number of results (defaults to the configured count)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Write the graph document to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Replace the graph with a document read from a file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli, config: &AppConfig) -> Result<(), AppError> {
    let graph_path = cli.graph.unwrap_or_else(|| config.graph_path.clone());
    let json_mode = cli.json;

    match cli.command {
        Some(Commands::Init { force }) => cmd_init(&graph_path, force),
        Some(Commands::Status) | None => cmd_status(&graph_path, json_mode),
        Some(Commands::Show) => cmd_show(&graph_path, json_mode),
        Some(Commands::AddNode { x, y, key, ready }) => {
            cmd_add_node(&graph_path, key, x, y, ready)
        }
        Some(Commands::UpdateNode { key, x, y, ready }) => {
            cmd_update_node(&graph_path, &key, x, y, ready)
        }
        Some(Commands::DeleteNode { key }) => cmd_delete_node(&graph_path, &key),
        Some(Commands::AddEdge { from, to, weight }) => {
            cmd_add_edge(&graph_path, &from, &to, weight)
        }
        Some(Commands::DeleteEdge { from, to }) => cmd_delete_edge(&graph_path, &from, &to),
        Some(Commands::Path { from, to }) => cmd_path(&graph_path, json_mode, &from, &to),
        Some(Commands::Nearest { from, count }) => cmd_nearest(
            &graph_path,
            json_mode,
            &from,
            count.unwrap_or(config.nearest_count),
        ),
        Some(Commands::Export { output }) => cmd_export(&graph_path, &output),
        Some(Commands::Import { input }) => cmd_import(&graph_path, &input),
    }
}
