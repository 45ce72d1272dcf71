//! Error types for the current schema
//!
//! Every way a document can fail the strict schema check.

use crate::node::NodeType;

/// A document failed the strict current-schema check
#[derive(Debug, thiserror::Error)]
pub enum SchemaViolation {
    /// Shape mismatch: unknown field, missing field, wrong type
    #[error("document does not match the current schema: {0}")]
    Malformed(#[from] serde_json::Error),

    /// `schemaVersion` is not the current marker
    #[error("unsupported schema version: '{found}'")]
    UnsupportedVersion {
        /// Version the document declared
        found: String,
    },

    /// Node id does not carry its type prefix
    #[error("node id '{id}' does not match pattern {node_type}_<alphanumeric>")]
    InvalidNodeId {
        /// Rejected id
        id: String,
        /// Type whose prefix the id must carry
        node_type: NodeType,
    },

    /// Tag importance outside 1..=5
    #[error("tag '{tag_id}' importance {importance} is outside 1..=5")]
    ImportanceOutOfRange {
        /// Tag carrying the bad value
        tag_id: String,
        /// Declared importance
        importance: u8,
    },
}

impl SchemaViolation {
    /// Id of the offending node or tag, when there is one
    #[must_use]
    pub fn offending_id(&self) -> Option<&str> {
        match self {
            Self::InvalidNodeId { id, .. } => Some(id),
            Self::ImportanceOutOfRange { tag_id, .. } => Some(tag_id),
            Self::Malformed(_) | Self::UnsupportedVersion { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_offender() {
        let err = SchemaViolation::InvalidNodeId {
            id: "npc_1".to_string(),
            node_type: NodeType::NpcDialog,
        };
        assert_eq!(
            err.to_string(),
            "node id 'npc_1' does not match pattern npcDialog_<alphanumeric>"
        );
        assert_eq!(err.offending_id(), Some("npc_1"));
    }

    #[test]
    fn version_error_has_no_offender() {
        let err = SchemaViolation::UnsupportedVersion { found: "1.0.0".to_string() };
        assert!(err.offending_id().is_none());
        assert!(err.to_string().contains("1.0.0"));
    }
}
