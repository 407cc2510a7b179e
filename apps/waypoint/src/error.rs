//! # Application Errors
//!
//! Errors raised by the collaborator layers. Engine errors pass through
//! unchanged inside `AppError::Engine`.

use std::path::PathBuf;
use thiserror::Error;
use waypoint_core::WaypointError;

/// Errors that can occur in the Waypoint application.
#[derive(Debug, Error)]
pub enum AppError {
    /// An engine operation failed.
    #[error(transparent)]
    Engine(#[from] WaypointError),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be read or parsed.
    #[error("Invalid configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// A file exceeds the size the storage layer accepts.
    #[error("File {} is {size} bytes, maximum allowed is {max} bytes", path.display())]
    FileTooLarge { path: PathBuf, size: u64, max: u64 },

    /// `init` refused to overwrite an existing graph.
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    /// JSON output could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
