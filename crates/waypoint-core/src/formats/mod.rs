//! # Formats
//!
//! Serialization formats for the Waypoint graph.

pub mod document;

pub use document::{GraphDocument, graph_from_json, graph_to_json};
