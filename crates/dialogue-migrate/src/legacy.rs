//! The open-shaped legacy document
//!
//! Legacy projects are accepted permissively: only a `nodes` array is
//! required and unknown fields are tolerated. Nodes, edges and tags stay as
//! raw JSON here because their field names drifted over time; the migrator
//! probes them with [`first_present`].

use crate::error::MigrationError;
use dialogue_model::LEGACY_SCHEMA_VERSION;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A legacy project envelope
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProject {
    /// Declared schema version
    #[serde(default)]
    pub schema_version: Option<Value>,
    /// Older spelling of the version field
    #[serde(default)]
    pub version: Option<Value>,
    /// Raw nodes
    pub nodes: Vec<Value>,
    /// Raw edges under the newer collection name
    #[serde(default)]
    pub edges: Option<Vec<Value>>,
    /// Raw edges under the older collection name
    #[serde(default)]
    pub connections: Option<Vec<Value>>,
    /// Raw tags
    #[serde(default)]
    pub tags: Option<Vec<Value>>,
    /// Raw project metadata
    #[serde(default)]
    pub metadata: Option<Value>,
    /// Everything else
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LegacyProject {
    /// Parse a legacy document
    ///
    /// # Errors
    /// [`MigrationError::UnrecognizedShape`] when the value is not an object
    /// carrying a `nodes` array.
    pub fn parse(raw: &Value) -> Result<Self, MigrationError> {
        if !raw.is_object() {
            return Err(MigrationError::unrecognized("top-level value is not an object", None));
        }
        Self::deserialize(raw).map_err(|e| {
            MigrationError::unrecognized("legacy document requires a `nodes` array", Some(e))
        })
    }

    /// Declared version, or [`LEGACY_SCHEMA_VERSION`]
    #[must_use]
    pub fn from_version(&self) -> String {
        self.schema_version
            .as_ref()
            .or(self.version.as_ref())
            .and_then(scalar_string)
            .unwrap_or_else(|| LEGACY_SCHEMA_VERSION.to_string())
    }

    /// Edge collection: `edges` when non-empty, else `connections`
    #[must_use]
    pub fn edge_values(&self) -> &[Value] {
        select_edges(self.edges.as_deref(), self.connections.as_deref())
    }

    /// Entries under `connections` that [`edge_values`](Self::edge_values) skips
    #[must_use]
    pub fn ignored_edge_count(&self) -> usize {
        match (&self.edges, &self.connections) {
            (Some(edges), Some(connections)) if !edges.is_empty() => connections.len(),
            _ => 0,
        }
    }

    /// Project-level field: `metadata.<key>` first, then the top level
    #[must_use]
    pub fn project_field(&self, keys: &[&str]) -> Option<&Value> {
        let from_metadata = self
            .metadata
            .as_ref()
            .and_then(Value::as_object)
            .and_then(|m| first_present(m, keys));
        from_metadata.or_else(|| first_present(&self.extra, keys))
    }
}

/// The edge collection a legacy document migrates: `edges` when non-empty,
/// else `connections`
#[must_use]
pub fn select_edges<'a>(edges: Option<&'a [Value]>, connections: Option<&'a [Value]>) -> &'a [Value] {
    match (edges, connections) {
        (Some(edges), _) if !edges.is_empty() => edges,
        (_, Some(connections)) => connections,
        (Some(edges), None) => edges,
        (None, None) => &[],
    }
}

/// Value at a dotted path (`data.text`)
#[must_use]
pub fn get_path<'a>(object: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = object.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// First non-null value among `candidates`, in priority order
#[must_use]
pub fn first_present<'a>(object: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|path| get_path(object, path))
        .find(|v| !v.is_null())
}

/// First candidate holding a string
#[must_use]
pub fn first_str<'a>(object: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|path| get_path(object, path))
        .find_map(Value::as_str)
}

/// First candidate holding an array
#[must_use]
pub fn first_array<'a>(object: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a Vec<Value>> {
    candidates
        .iter()
        .filter_map(|path| get_path(object, path))
        .find_map(Value::as_array)
}

/// First candidate holding an object
#[must_use]
pub fn first_object<'a>(
    object: &'a Map<String, Value>,
    candidates: &[&str],
) -> Option<&'a Map<String, Value>> {
    candidates
        .iter()
        .filter_map(|path| get_path(object, path))
        .find_map(Value::as_object)
}

/// Identifier-like scalar: non-empty trimmed string or a number
#[must_use]
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
