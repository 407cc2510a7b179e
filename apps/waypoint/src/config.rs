//! # Configuration
//!
//! Optional TOML configuration for the Waypoint CLI.
//!
//! Lookup order:
//! 1. `--config <path>` (must exist)
//! 2. `waypoint.toml` in the working directory, if present
//! 3. Built-in defaults
//!
//! ```toml
//! graph_path = "depot.json"
//! nearest_count = 3
//! log_format = "json"
//! ```

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use waypoint_core::DEFAULT_NEAREST_COUNT;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "waypoint.toml";

/// Graph document used when neither the CLI nor the config names one.
pub const DEFAULT_GRAPH_FILE: &str = "waypoint.json";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parse a format name, as found in `WAYPOINT_LOG_FORMAT`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Path of the graph document.
    pub graph_path: PathBuf,
    /// Default result count for `nearest`.
    pub nearest_count: usize,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            graph_path: PathBuf::from(DEFAULT_GRAPH_FILE),
            nearest_count: DEFAULT_NEAREST_COUNT,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Parse configuration from TOML text. `origin` is only used in errors.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration following the lookup order above.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|e| AppError::io(&path, e))?;
        Self::from_toml_str(&text, &path)
    }
}

// =============================================================================
// TESTS
// =============================================================================
