//! # waypoint
//!
//! Collaborator layers around `waypoint-core`: CLI input, file storage,
//! configuration and application state. The binary in `main.rs` wires them
//! together with logging.

pub mod cli;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;

pub use config::{AppConfig, LogFormat};
pub use error::AppError;
pub use state::AppState;
