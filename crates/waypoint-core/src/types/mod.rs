//! # Core Type Definitions
//!
//! This module contains all core types for the Waypoint graph engine:
//! - Node identity and metadata (`NodeKey`, `NodeMeta`, `NodeMetaPatch`)
//! - Edge weights (`EdgeWeight`)
//! - Query output (`Route`)
//! - Error types (`WaypointError`)
//!
//! ## Weight Guarantees
//!
//! An `EdgeWeight` is always finite and non-negative. The only way to build one
//! is through `EdgeWeight::new` (or serde, which routes through it), so every
//! weight stored in a graph satisfies the Dijkstra precondition.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// NODE KEY
// =============================================================================

/// Opaque, caller-chosen identifier of a node.
///
/// The engine never interprets the contents. Collaborators typically derive it
/// from grid coordinates (see [`crate::primitives::grid_key`]).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(pub String);

impl NodeKey {
    /// Create a new key from anything string-like.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// =============================================================================
// EDGE WEIGHT
// =============================================================================

/// Weight of an undirected edge.
///
/// Always finite and `>= 0`. Serialized as a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct EdgeWeight(f64);

impl EdgeWeight {
    /// Zero-cost edge.
    pub const ZERO: Self = Self(0.0);

    /// Create a new edge weight, rejecting negative, NaN and infinite values.
    pub fn new(weight: f64) -> Result<Self, WaypointError> {
        if !weight.is_finite() {
            return Err(WaypointError::InvalidWeight(format!(
                "weight must be finite, got {}",
                weight
            )));
        }
        if weight < 0.0 {
            return Err(WaypointError::InvalidWeight(format!(
                "weight must be non-negative, got {}",
                weight
            )));
        }
        // Collapse -0.0 so ordering and output never see a signed zero.
        if weight == 0.0 {
            return Ok(Self::ZERO);
        }
        Ok(Self(weight))
    }

    /// Get the raw weight value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for EdgeWeight {
    type Error = WaypointError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EdgeWeight> for f64 {
    fn from(weight: EdgeWeight) -> Self {
        weight.0
    }
}

impl fmt::Display for EdgeWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// NODE METADATA
// =============================================================================

/// Metadata carried by a node.
///
/// `x` and `y` are positional and only passed through; `ready_for_pickup` is
/// the predicate consumed by the nearest-ready query. Any other named
/// attributes are kept alongside and survive a codec round trip.
///
/// The open attributes never hold `x`, `y` or `readyForPickup`: setting one of
/// those names writes the typed field instead, so the flattened encoding has
/// no duplicate keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMeta {
    pub x: i64,
    pub y: i64,
    pub ready_for_pickup: bool,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl NodeMeta {
    /// Create metadata with the three known fields and no extra attributes.
    #[must_use]
    pub fn new(x: i64, y: i64, ready_for_pickup: bool) -> Self {
        Self {
            x,
            y,
            ready_for_pickup,
            extra: BTreeMap::new(),
        }
    }

    /// Set an attribute (builder style). See [`NodeMeta::set_attribute`].
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<Self, WaypointError> {
        self.set_attribute(name, value)?;
        Ok(self)
    }

    /// Set a named attribute.
    ///
    /// `x` and `y` must be integers and `readyForPickup` a boolean; they update
    /// the typed fields. Every other name is stored as an open attribute.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<(), WaypointError> {
        let name = name.into();
        match name.as_str() {
            "x" => self.x = integer_attribute(&name, &value)?,
            "y" => self.y = integer_attribute(&name, &value)?,
            "readyForPickup" => self.ready_for_pickup = bool_attribute(&name, &value)?,
            _ => {
                self.extra.insert(name, value);
            }
        }
        Ok(())
    }

    /// Get an open attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.extra.get(name)
    }

    /// Iterate the open attributes in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.extra.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Merge a partial update over this metadata.
    ///
    /// Fields left as `None` in the patch are untouched; open attributes in
    /// the patch overwrite same-named ones here.
    pub fn merge(&mut self, patch: NodeMetaPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(ready) = patch.ready_for_pickup {
            self.ready_for_pickup = ready;
        }
        // Both sides keep the typed names out of `extra`.
        self.extra.extend(patch.extra);
    }
}

impl From<NodeMetaPatch> for NodeMeta {
    fn from(patch: NodeMetaPatch) -> Self {
        let mut meta = Self::default();
        meta.merge(patch);
        meta
    }
}

/// Partial metadata used by `update_node`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_for_pickup: Option<bool>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl NodeMetaPatch {
    /// Empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn x(mut self, x: i64) -> Self {
        self.x = Some(x);
        self
    }

    #[must_use]
    pub fn y(mut self, y: i64) -> Self {
        self.y = Some(y);
        self
    }

    #[must_use]
    pub fn ready_for_pickup(mut self, ready: bool) -> Self {
        self.ready_for_pickup = Some(ready);
        self
    }

    /// Set a named attribute, with the same rules as
    /// [`NodeMeta::set_attribute`].
    pub fn attribute(
        mut self,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<Self, WaypointError> {
        let name = name.into();
        match name.as_str() {
            "x" => self.x = Some(integer_attribute(&name, &value)?),
            "y" => self.y = Some(integer_attribute(&name, &value)?),
            "readyForPickup" => self.ready_for_pickup = Some(bool_attribute(&name, &value)?),
            _ => {
                self.extra.insert(name, value);
            }
        }
        Ok(self)
    }
}

fn integer_attribute(name: &str, value: &serde_json::Value) -> Result<i64, WaypointError> {
    value.as_i64().ok_or_else(|| {
        WaypointError::InvalidAttribute(format!("{} must be an integer, got {}", name, value))
    })
}

fn bool_attribute(name: &str, value: &serde_json::Value) -> Result<bool, WaypointError> {
    value.as_bool().ok_or_else(|| {
        WaypointError::InvalidAttribute(format!("{} must be a boolean, got {}", name, value))
    })
}

// =============================================================================
// ROUTE
// =============================================================================

/// The result of a cheapest-path query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Keys from start to end, both inclusive.
    pub nodes: Vec<NodeKey>,
    /// Sum of the edge weights along `nodes`.
    pub cost: f64,
}

impl Route {
    /// Number of hops (edges) in the route.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Waypoint engine.
///
/// - No silent failures: a missing key is always reported
/// - Use `Result<T, WaypointError>` for fallible operations
/// - The engine never panics; all errors are recoverable
#[derive(Debug, Error)]
pub enum WaypointError {
    /// The referenced node does not exist in the graph.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeKey),

    /// An edge weight was negative, NaN or infinite.
    #[error("Invalid edge weight: {0}")]
    InvalidWeight(String),

    /// A metadata attribute had the wrong type for a typed field.
    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    /// A persisted document was malformed or structurally invalid.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// The graph could not be encoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn edge_weight_rejects_negative() {
        assert!(matches!(
            EdgeWeight::new(-1.0),
            Err(WaypointError::InvalidWeight(_))
        ));
    }

    #[test]
    fn edge_weight_rejects_non_finite() {
        assert!(EdgeWeight::new(f64::NAN).is_err());
        assert!(EdgeWeight::new(f64::INFINITY).is_err());
    }

    #[test]
    fn edge_weight_accepts_zero_and_fractions() {
        assert_eq!(EdgeWeight::new(0.0).expect("zero").value(), 0.0);
        assert_eq!(EdgeWeight::new(2.5).expect("fraction").value(), 2.5);
    }

    #[test]
    fn edge_weight_deserialize_validates() {
        let ok: EdgeWeight = serde_json::from_str("3").expect("integer literal");
        assert_eq!(ok.value(), 3.0);

        let bad: Result<EdgeWeight, _> = serde_json::from_str("-3");
        assert!(bad.is_err());
    }

    #[test]
    fn node_meta_uses_camel_case_and_keeps_extra() {
        let meta = NodeMeta::new(1, 2, true)
            .with_attribute("label", json!("dock"))
            .expect("attribute");
        let value = serde_json::to_value(&meta).expect("to_value");

        assert_eq!(
            value,
            json!({"x": 1, "y": 2, "readyForPickup": true, "label": "dock"})
        );
    }

    #[test]
    fn merge_overwrites_only_present_fields() {
        let mut meta = NodeMeta::new(1, 2, false)
            .with_attribute("label", json!("a"))
            .expect("attribute");
        meta.merge(
            NodeMetaPatch::new()
                .ready_for_pickup(true)
                .attribute("label", json!("b"))
                .expect("attribute"),
        );

        assert_eq!(meta.x, 1);
        assert_eq!(meta.y, 2);
        assert!(meta.ready_for_pickup);
        assert_eq!(meta.attribute("label"), Some(&json!("b")));
    }

    #[test]
    fn typed_names_write_typed_fields() {
        let meta = NodeMeta::new(0, 0, false)
            .with_attribute("x", json!(5))
            .and_then(|m| m.with_attribute("y", json!(-2)))
            .and_then(|m| m.with_attribute("readyForPickup", json!(true)))
            .expect("attributes");

        assert_eq!(meta, NodeMeta::new(5, -2, true));
        assert_eq!(meta.attributes().count(), 0);
        assert_eq!(
            serde_json::to_string(&meta).expect("to_string"),
            r#"{"x":5,"y":-2,"readyForPickup":true}"#
        );
    }

    #[test]
    fn typed_names_reject_wrong_type() {
        assert!(matches!(
            NodeMeta::default().with_attribute("x", json!("5")),
            Err(WaypointError::InvalidAttribute(_))
        ));
        assert!(matches!(
            NodeMetaPatch::new().attribute("readyForPickup", json!(1)),
            Err(WaypointError::InvalidAttribute(_))
        ));
    }

    #[test]
    fn patch_typed_names_merge_into_fields() {
        let patch = NodeMetaPatch::new()
            .attribute("readyForPickup", json!(true))
            .and_then(|p| p.attribute("x", json!(3)))
            .expect("attributes");

        let mut meta = NodeMeta::new(1, 2, false);
        meta.merge(patch);

        assert_eq!(meta, NodeMeta::new(3, 2, true));
        assert_eq!(meta.attributes().count(), 0);
    }

    #[test]
    fn patch_into_meta_fills_defaults() {
        let meta = NodeMeta::from(NodeMetaPatch::new().y(7));
        assert_eq!(meta, NodeMeta::new(0, 7, false));
    }

    #[test]
    fn route_hops() {
        let route = Route {
            nodes: vec![NodeKey::from("a"), NodeKey::from("b"), NodeKey::from("c")],
            cost: 7.0,
        };
        assert_eq!(route.hops(), 2);
    }
}
