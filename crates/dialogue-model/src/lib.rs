//! Dialogue Model
//!
//! Strongly-typed current-schema contracts shared by every stage of the
//! engine: projects, nodes, edges, tags, and the strict schema check that
//! certifies a document before anything downstream consumes it.
//!
//! # Example
//!
//! ```rust,ignore
//! use dialogue_model::Project;
//!
//! let project = Project::from_json_str(&text)?;
//! let exported = project.to_json_pretty()?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod edge;
pub mod error;
pub mod node;
pub mod project;
pub mod tag;

// Re-exports for convenience
pub use edge::Edge;
pub use error::SchemaViolation;
pub use node::{
    ComparisonOperator, Condition, Effect, MutationOperator, Node, NodeData, NodeType, Position,
};
pub use project::{Project, ProjectMetadata, CURRENT_SCHEMA_VERSION, LEGACY_SCHEMA_VERSION};
pub use tag::{Tag, TagMetadata, TagType, DEFAULT_IMPORTANCE, MAX_IMPORTANCE, MIN_IMPORTANCE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
