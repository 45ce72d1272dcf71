//! Validation findings
//!
//! Every finding has a fixed code and severity. Codes marked critical abort
//! an import outright; everything else is reported and the import proceeds.

use serde::Serialize;
use std::fmt;

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational
    Info,
    /// Suspicious but structurally sound
    Warning,
    /// Structural defect; the project is not valid
    Error,
}

/// Closed set of finding codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingCode {
    /// Two nodes share an id
    DuplicateNodeId,
    /// Node id does not match `<type>_<alphanumeric>`
    InvalidNodeId,
    /// Two edges share an id
    DuplicateEdgeId,
    /// Edge source does not exist
    EdgeSourceMissing,
    /// Edge target does not exist
    EdgeTargetMissing,
    /// A cycle in the dialog graph
    CircularDependency,
    /// Edge from a node to itself
    SelfLoop,
    /// Non-empty graph where every node has an incoming edge
    NoRootNodes,
    /// Nodes with no edges at all
    OrphanedNodes,
    /// Nodes with edges but no path from any root
    UnreachableNodes,
    /// Condition or effect with a blank variable name
    EmptyVariable,
    /// Nodes with no dialog text
    EmptyNodeText,
    /// Project without nodes
    EmptyProject,
    /// More than one connected entry point
    MultipleRoots,
}

impl FindingCode {
    /// Severity attached to this code
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::DuplicateNodeId
            | Self::InvalidNodeId
            | Self::DuplicateEdgeId
            | Self::EdgeSourceMissing
            | Self::EdgeTargetMissing
            | Self::CircularDependency => Severity::Error,
            Self::SelfLoop
            | Self::NoRootNodes
            | Self::OrphanedNodes
            | Self::UnreachableNodes
            | Self::EmptyVariable => Severity::Warning,
            Self::EmptyNodeText | Self::EmptyProject | Self::MultipleRoots => Severity::Info,
        }
    }

    /// Whether this code aborts an import
    #[must_use]
    pub const fn is_critical(self) -> bool {
        matches!(
            self,
            Self::EdgeSourceMissing
                | Self::EdgeTargetMissing
                | Self::DuplicateNodeId
                | Self::DuplicateEdgeId
        )
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateNodeId => "DUPLICATE_NODE_ID",
            Self::InvalidNodeId => "INVALID_NODE_ID",
            Self::DuplicateEdgeId => "DUPLICATE_EDGE_ID",
            Self::EdgeSourceMissing => "EDGE_SOURCE_MISSING",
            Self::EdgeTargetMissing => "EDGE_TARGET_MISSING",
            Self::CircularDependency => "CIRCULAR_DEPENDENCY",
            Self::SelfLoop => "SELF_LOOP",
            Self::NoRootNodes => "NO_ROOT_NODES",
            Self::OrphanedNodes => "ORPHANED_NODES",
            Self::UnreachableNodes => "UNREACHABLE_NODES",
            Self::EmptyVariable => "EMPTY_VARIABLE",
            Self::EmptyNodeText => "EMPTY_NODE_TEXT",
            Self::EmptyProject => "EMPTY_PROJECT",
            Self::MultipleRoots => "MULTIPLE_ROOTS",
        }
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Finding code
    pub code: FindingCode,
    /// Human-readable description
    pub message: String,
    /// Nodes involved; for cycles, the path in traversal order, cut to
    /// [`MAX_CYCLE_PATH`](crate::MAX_CYCLE_PATH) nodes plus the closing one
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub node_ids: Vec<String>,
    /// Edge involved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_id: Option<String>,
}

impl Finding {
    /// Create a finding
    #[must_use]
    pub fn new(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            node_ids: Vec::new(),
            edge_id: None,
        }
    }

    /// With involved nodes
    #[must_use]
    pub fn with_nodes<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// With involved edge
    #[must_use]
    pub fn with_edge(mut self, id: impl Into<String>) -> Self {
        self.edge_id = Some(id.into());
        self
    }

    /// Severity of this finding's code
    #[inline]
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
