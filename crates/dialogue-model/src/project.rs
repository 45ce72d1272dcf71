//! The versioned project envelope
//!
//! [`Project::from_value`] is the strict current-schema gate used both to
//! recognise already-current documents and to certify migrator output.
//! [`Project::to_json_pretty`] is its structural inverse.

use crate::edge::Edge;
use crate::error::SchemaViolation;
use crate::node::Node;
use crate::tag::Tag;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker carried by every current-schema document
pub const CURRENT_SCHEMA_VERSION: &str = "2.0.0";

/// Version assumed for legacy documents that do not declare one
pub const LEGACY_SCHEMA_VERSION: &str = "1.0.0";

/// Project-level metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectMetadata {
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// RFC 3339 creation time
    pub created_at: String,
    /// RFC 3339 last modification time
    pub updated_at: String,
    /// Number of nodes at the time of writing
    #[serde(default)]
    pub node_count: usize,
    /// Number of edges at the time of writing
    #[serde(default)]
    pub edge_count: usize,
    /// Number of tags at the time of writing
    #[serde(default)]
    pub tag_count: usize,
    /// Legacy version this project was migrated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrated_from: Option<String>,
}

/// A current-schema dialog project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Project {
    /// Always [`CURRENT_SCHEMA_VERSION`]
    pub schema_version: String,
    /// Dialog nodes
    pub nodes: Vec<Node>,
    /// Directed edges
    pub edges: Vec<Edge>,
    /// Tags
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Metadata
    pub metadata: ProjectMetadata,
}

impl Project {
    /// Create an empty current-schema project
    #[must_use]
    pub fn new(metadata: ProjectMetadata) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            nodes: Vec::new(),
            edges: Vec::new(),
            tags: Vec::new(),
            metadata,
        }
    }

    /// Deserialize and check a document against the strict current schema
    ///
    /// # Errors
    /// Returns the first [`SchemaViolation`] found.
    pub fn from_value(value: &Value) -> Result<Self, SchemaViolation> {
        let project = Self::deserialize(value)?;
        project.check_schema()?;
        Ok(project)
    }

    /// Parse a JSON document against the strict current schema
    ///
    /// # Errors
    /// Returns the first [`SchemaViolation`] found.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaViolation> {
        let project: Self = serde_json::from_str(text)?;
        project.check_schema()?;
        Ok(project)
    }

    /// Invariants serde cannot express: version marker, id pattern, importance range
    ///
    /// # Errors
    /// Returns the first [`SchemaViolation`] found, in declaration order.
    pub fn check_schema(&self) -> Result<(), SchemaViolation> {
        if self.schema_version != CURRENT_SCHEMA_VERSION {
            return Err(SchemaViolation::UnsupportedVersion {
                found: self.schema_version.clone(),
            });
        }

        if let Some(node) = self.nodes.iter().find(|n| !n.has_valid_id()) {
            return Err(SchemaViolation::InvalidNodeId {
                id: node.id.clone(),
                node_type: node.node_type,
            });
        }

        if let Some(tag) = self.tags.iter().find(|t| !t.has_valid_importance()) {
            return Err(SchemaViolation::ImportanceOutOfRange {
                tag_id: tag.id.clone(),
                importance: tag.metadata.importance,
            });
        }

        Ok(())
    }

    /// Export as pretty-printed current-schema JSON
    ///
    /// # Errors
    /// Fails only if a free-form payload cannot be serialized.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Look up a node by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
