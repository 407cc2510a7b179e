//! # Storage Layer
//!
//! Moves graph document text between files and the engine. The engine only
//! ever sees text; all file handling lives here.

use crate::error::AppError;
use std::path::{Path, PathBuf};
use waypoint_core::{Graph, MAX_DOCUMENT_SIZE};

/// Maximum document file size accepted for reading.
const MAX_FILE_SIZE: u64 = MAX_DOCUMENT_SIZE as u64;

/// Validate file size before reading.
fn validate_file_size(path: &Path) -> Result<(), AppError> {
    let metadata = std::fs::metadata(path).map_err(|e| AppError::io(path, e))?;

    if metadata.len() > MAX_FILE_SIZE {
        return Err(AppError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: MAX_FILE_SIZE,
        });
    }
    Ok(())
}

/// Read document text from an existing file.
pub fn read_document(path: &Path) -> Result<String, AppError> {
    validate_file_size(path)?;
    std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))
}

/// Write document text, replacing the target only once the write finished.
pub fn write_document(path: &Path, text: &str) -> Result<(), AppError> {
    let staging = staging_path(path);
    std::fs::write(&staging, text).map_err(|e| AppError::io(&staging, e))?;
    std::fs::rename(&staging, path).map_err(|e| AppError::io(path, e))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Load a graph from a document file. A missing file yields an empty graph.
pub fn load_graph(path: &Path) -> Result<Graph, AppError> {
    if !path.exists() {
        tracing::info!("No graph at {}, starting empty", path.display());
        return Ok(Graph::new());
    }

    let text = read_document(path)?;
    let graph = Graph::from_document(&text)?;
    tracing::info!(
        "Loaded graph from {}: {} nodes, {} edges",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Save a graph to a document file.
pub fn save_graph(graph: &Graph, path: &Path) -> Result<(), AppError> {
    let text = graph.serialize()?;
    write_document(path, &text)?;
    tracing::info!(
        "Saved graph to {}: {} nodes, {} edges",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
