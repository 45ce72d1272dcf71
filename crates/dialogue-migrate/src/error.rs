//! Error types for migration
//!
//! Any node or edge failure aborts the whole migration, so each variant
//! carries enough context (index, offending id, cause) to diagnose the
//! document without re-running it.

use dialogue_model::SchemaViolation;
use std::fmt;

/// Which end of an edge failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    /// `source` / `from`
    Source,
    /// `target` / `to`
    Target,
}

impl fmt::Display for EdgeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeEnd::Source => f.write_str("source"),
            EdgeEnd::Target => f.write_str("target"),
        }
    }
}

/// Migration failed; no partial project is produced
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Neither current nor legacy shape
    #[error("document matches neither the current nor the legacy schema: {reason}")]
    UnrecognizedShape {
        /// What made the document unrecognizable
        reason: String,
        /// Parse error behind the rejection, if any
        #[source]
        cause: Option<serde_json::Error>,
    },

    /// A legacy node could not be translated
    #[error("legacy node #{index} could not be migrated: {reason}")]
    InvalidNode {
        /// Position in the legacy node collection
        index: usize,
        /// Legacy id, when the node had one
        id: Option<String>,
        /// What was wrong with it
        reason: String,
    },

    /// A legacy edge could not be translated
    #[error("legacy edge #{index} could not be migrated: {reason}")]
    InvalidEdge {
        /// Position in the legacy edge collection
        index: usize,
        /// Legacy id, when the edge had one
        id: Option<String>,
        /// What was wrong with it
        reason: String,
    },

    /// An edge points at a node id that no legacy node declared
    #[error("edge '{edge_id}' {end} references unknown node '{reference}'")]
    UnresolvedEndpoint {
        /// Edge being migrated
        edge_id: String,
        /// End that failed
        end: EdgeEnd,
        /// Legacy node id the edge named
        reference: String,
    },

    /// Document declares the current version but fails the strict check
    #[error("document declares the current schema version but is invalid: {0}")]
    InvalidCurrent(#[source] SchemaViolation),

    /// Assembled output failed the strict schema check
    #[error("migrated project failed the current schema check: {0}")]
    OutputRejected(#[source] SchemaViolation),
}

impl MigrationError {
    /// Create an unrecognized-shape error
    pub fn unrecognized(reason: impl Into<String>, cause: Option<serde_json::Error>) -> Self {
        Self::UnrecognizedShape {
            reason: reason.into(),
            cause,
        }
    }

    /// Create a node error
    pub fn invalid_node(index: usize, id: Option<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNode {
            index,
            id,
            reason: reason.into(),
        }
    }

    /// Create an edge error
    pub fn invalid_edge(index: usize, id: Option<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEdge {
            index,
            id,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable reason
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnrecognizedShape { .. } => "unrecognized_shape",
            Self::InvalidNode { .. } => "invalid_node",
            Self::InvalidEdge { .. } => "invalid_edge",
            Self::UnresolvedEndpoint { .. } => "unresolved_endpoint",
            Self::InvalidCurrent(_) => "invalid_current",
            Self::OutputRejected(_) => "output_rejected",
        }
    }

    /// Id of the offending node or edge, when known
    #[must_use]
    pub fn offending_id(&self) -> Option<&str> {
        match self {
            Self::InvalidNode { id, .. } | Self::InvalidEdge { id, .. } => id.as_deref(),
            Self::UnresolvedEndpoint { edge_id, .. } => Some(edge_id),
            Self::InvalidCurrent(violation) | Self::OutputRejected(violation) => {
                violation.offending_id()
            }
            Self::UnrecognizedShape { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn unresolved_endpoint_display() {
        let err = MigrationError::UnresolvedEndpoint {
            edge_id: "e1".to_string(),
            end: EdgeEnd::Target,
            reference: "ghost".to_string(),
        };
        assert_eq!(err.to_string(), "edge 'e1' target references unknown node 'ghost'");
        assert_eq!(err.offending_id(), Some("e1"));
        assert_eq!(err.kind(), "unresolved_endpoint");
    }

    #[test]
    fn unrecognized_shape_keeps_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = MigrationError::unrecognized("not an object", Some(cause));
        assert!(err.source().is_some());
        assert!(err.offending_id().is_none());
    }

    #[test]
    fn invalid_node_reports_id() {
        let err = MigrationError::invalid_node(3, Some("n7".to_string()), "missing variable");
        assert!(err.to_string().contains("#3"));
        assert_eq!(err.offending_id(), Some("n7"));
    }

    #[test]
    fn invalid_current_reports_violation() {
        let err = MigrationError::InvalidCurrent(SchemaViolation::InvalidNodeId {
            id: "npcDialog_a-b".to_string(),
            node_type: dialogue_model::NodeType::NpcDialog,
        });
        assert_eq!(err.kind(), "invalid_current");
        assert_eq!(err.offending_id(), Some("npcDialog_a-b"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("npcDialog_a-b"));
    }
}
