//! Directed links between nodes

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A directed progression from `source` to `target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Edge {
    /// Edge identifier
    pub id: String,
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Handle on the source node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Handle on the target node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    /// Renderer edge kind
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Animated stroke
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
    /// Free-form style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
    /// Free-form payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Edge {
    /// Create a bare edge
    #[must_use]
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            edge_type: None,
            label: None,
            animated: None,
            style: None,
            data: None,
        }
    }

    /// Whether source and target are the same node
    #[inline]
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted() {
        let edge = Edge::new("e1", "a", "b");
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json, serde_json::json!({"id": "e1", "source": "a", "target": "b"}));
    }

    #[test]
    fn type_field_is_renamed() {
        let json = serde_json::json!({"id": "e1", "source": "a", "target": "b", "type": "smoothstep"});
        let edge: Edge = serde_json::from_value(json).unwrap();
        assert_eq!(edge.edge_type.as_deref(), Some("smoothstep"));
        assert!(!edge.is_self_loop());
    }
}
