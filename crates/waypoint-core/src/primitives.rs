//! # Engine Primitives
//!
//! Compile-time constants and small helpers shared by the engine and its
//! collaborators.

use crate::NodeKey;

/// Default number of results returned by the nearest-ready query.
pub const DEFAULT_NEAREST_COUNT: usize = 5;

/// Maximum size of a persisted document accepted by the codec (16 MiB).
///
/// Checked before parsing so oversized input never reaches the JSON parser.
pub const MAX_DOCUMENT_SIZE: usize = 16 * 1024 * 1024;

/// Build the conventional node key for a grid cell: `"x,y"`.
///
/// The engine treats keys as opaque; this is only the convention the input
/// layer uses when a node is placed on a grid without an explicit key.
#[must_use]
pub fn grid_key(x: i64, y: i64) -> NodeKey {
    NodeKey(format!("{},{}", x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_key_format() {
        assert_eq!(grid_key(3, -4).as_str(), "3,-4");
    }

    #[test]
    fn nearest_default_is_five() {
        assert_eq!(DEFAULT_NEAREST_COUNT, 5);
    }
}
