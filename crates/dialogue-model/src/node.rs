//! Dialog nodes and their nested condition/effect payloads
//!
//! The node type set is closed. Every node id carries its type as a prefix
//! (`npcDialog_greeting4kq2`), which is what [`NodeType::id_matches`] checks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Closed set of node kinds in the current schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    /// Line spoken by a non-player character
    NpcDialog,
    /// Choice offered to the player
    PlayerResponse,
    /// Scene entry point
    EnterScene,
    /// Scene exit point
    ExitScene,
    /// Conditional fork
    Branch,
    /// Generic dialog unit, also the fallback for unknown legacy kinds
    Dialog,
}

impl NodeType {
    /// Every node type, in declaration order
    pub const ALL: [NodeType; 6] = [
        NodeType::NpcDialog,
        NodeType::PlayerResponse,
        NodeType::EnterScene,
        NodeType::ExitScene,
        NodeType::Branch,
        NodeType::Dialog,
    ];

    /// Wire name, also used as the id prefix
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeType::NpcDialog => "npcDialog",
            NodeType::PlayerResponse => "playerResponse",
            NodeType::EnterScene => "enterScene",
            NodeType::ExitScene => "exitScene",
            NodeType::Branch => "branch",
            NodeType::Dialog => "dialog",
        }
    }

    /// Parse a wire name
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Check that `id` has the shape `<type>_<alphanumeric>`
    #[must_use]
    pub fn id_matches(self, id: &str) -> bool {
        id.strip_prefix(self.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .is_some_and(|tail| !tail.is_empty() && tail.chars().all(|c| c.is_ascii_alphanumeric()))
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// Create a position
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Comparison used by a [`Condition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonOperator {
    /// `==`
    Equals,
    /// `!=`
    NotEquals,
    /// `>`
    GreaterThan,
    /// `<`
    LessThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<=`
    LessThanOrEqual,
    /// Substring or membership test
    Contains,
}

/// Mutation applied by an [`Effect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationOperator {
    /// Assignment
    Set,
    /// Numeric addition
    Add,
    /// Numeric subtraction
    Subtract,
    /// Numeric multiplication
    Multiply,
    /// Boolean flip
    Toggle,
    /// Push onto a list variable
    Append,
}

/// Gate on a story variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Condition {
    /// Variable name
    pub variable: String,
    /// Comparison
    pub operator: ComparisonOperator,
    /// Free-form operand
    #[serde(default)]
    pub value: Value,
    /// Author note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Mutation of a story variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Effect {
    /// Variable name
    pub variable: String,
    /// Mutation
    pub operator: MutationOperator,
    /// Free-form operand
    #[serde(default)]
    pub value: Value,
    /// Author note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Node payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeData {
    /// Dialog line
    pub text: String,
    /// Speaking character
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// Conditions gating this node
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Effects applied when this node plays
    #[serde(default)]
    pub effects: Vec<Effect>,
    /// Tag ids attached to this node
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// A dialog unit on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Node {
    /// `<type>_<alphanumeric>` identifier
    pub id: String,
    /// Node kind
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Canvas position
    pub position: Position,
    /// Payload
    pub data: NodeData,
}

impl Node {
    /// Create a node with empty payload at the origin
    #[must_use]
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            position: Position::default(),
            data: NodeData::default(),
        }
    }

    /// With dialog text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.data.text = text.into();
        self
    }

    /// Whether the id carries this node's type prefix
    #[inline]
    #[must_use]
    pub fn has_valid_id(&self) -> bool {
        self.node_type.id_matches(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_type_wire_names_roundtrip() {
        for t in NodeType::ALL {
            assert_eq!(NodeType::from_wire(t.as_str()), Some(t));
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
        assert_eq!(NodeType::from_wire("npc"), None);
    }

    #[test]
    fn id_pattern_requires_prefix_and_alphanumeric_tail() {
        assert!(NodeType::NpcDialog.id_matches("npcDialog_a1b2"));
        assert!(!NodeType::NpcDialog.id_matches("npcDialog_"));
        assert!(!NodeType::NpcDialog.id_matches("npcDialog_a-b"));
        assert!(!NodeType::NpcDialog.id_matches("playerResponse_abc"));
        assert!(!NodeType::Dialog.id_matches("dialogabc"));
    }

    #[test]
    fn node_rejects_unknown_fields() {
        let json = serde_json::json!({
            "id": "dialog_x1",
            "type": "dialog",
            "position": {"x": 0.0, "y": 0.0},
            "data": {"text": "hi"},
            "extra": true
        });
        assert!(serde_json::from_value::<Node>(json).is_err());
    }

    #[test]
    fn node_data_defaults_collections() {
        let json = serde_json::json!({
            "id": "dialog_x1",
            "type": "dialog",
            "position": {"x": 1.0, "y": 2.0},
            "data": {"text": "hi"}
        });
        let node: Node = serde_json::from_value(json).unwrap();
        assert!(node.data.conditions.is_empty());
        assert!(node.data.metadata.is_empty());
        assert!(node.has_valid_id());
    }
}
