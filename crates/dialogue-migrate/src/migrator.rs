//! Legacy → current migration
//!
//! # Workflow
//! 1. Already current? Return it untouched.
//! 2. Parse the permissive legacy envelope.
//! 3. Translate nodes (type, id, operators, renamed fields).
//! 4. Translate edges, resolving endpoints through the remapper.
//! 5. Translate tags; a bad tag is skipped, never fatal.
//! 6. Assemble with the current version marker, counts and timestamps.
//! 7. Re-check the assembled project against the strict schema.
//!
//! Steps 3 and 4 are all-or-nothing.

use crate::error::{EdgeEnd, MigrationError};
use crate::legacy::{
    first_array, first_object, first_present, first_str, scalar_string, LegacyProject,
};
use crate::remap::IdRemapper;
use crate::tables;
use chrono::{DateTime, SecondsFormat, Utc};
use dialogue_model::{
    Condition, Edge, Effect, Node, NodeData, Position, Project, ProjectMetadata, Tag,
    TagMetadata, CURRENT_SCHEMA_VERSION, DEFAULT_IMPORTANCE, MAX_IMPORTANCE, MIN_IMPORTANCE,
};
use serde_json::{Map, Value};
use std::collections::HashSet;

const TEXT_FIELDS: &[&str] = &[
    "data.text",
    "data.content",
    "data.dialogue",
    "data.message",
    "text",
    "content",
];
const SPEAKER_FIELDS: &[&str] = &["data.speaker", "data.character", "data.npc", "speaker"];
const CONDITION_FIELDS: &[&str] = &["data.conditions", "data.requirements", "conditions"];
const EFFECT_FIELDS: &[&str] = &["data.effects", "data.actions", "data.consequences", "effects"];
const NODE_TAG_FIELDS: &[&str] = &["data.tags", "tags"];
const NODE_METADATA_FIELDS: &[&str] = &["data.metadata", "metadata"];
const VARIABLE_FIELDS: &[&str] = &["variable", "var", "key", "name"];
const OPERATOR_FIELDS: &[&str] = &["operator", "op", "comparison", "operation"];

const DEFAULT_TITLE: &str = "Untitled project";

/// Result of a migration call
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationOutcome {
    /// Current-schema project
    pub project: Project,
    /// Whether any translation happened
    pub was_migrated: bool,
    /// Version the input declared
    pub from_version: String,
}

/// Legacy → current translator
///
/// Stateless apart from the clock; every call builds its own [`IdRemapper`],
/// so one migrator can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Migrator {
    now: DateTime<Utc>,
}

impl Migrator {
    /// Create a migrator stamped with the current time
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { now: Utc::now() }
    }

    /// Create a migrator with a fixed clock
    #[inline]
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Migrate a parsed document to the current schema
    ///
    /// # Errors
    /// Any [`MigrationError`]; no partial project is ever returned.
    pub fn migrate(&self, raw: &Value) -> Result<MigrationOutcome, MigrationError> {
        match Project::from_value(raw) {
            Ok(project) => {
                tracing::debug!("Document already matches schema {}", CURRENT_SCHEMA_VERSION);
                return Ok(MigrationOutcome {
                    project,
                    was_migrated: false,
                    from_version: CURRENT_SCHEMA_VERSION.to_string(),
                });
            }
            Err(violation) if declares_current(raw) => {
                tracing::warn!("Document declares schema {} but fails it: {violation}", CURRENT_SCHEMA_VERSION);
                return Err(MigrationError::InvalidCurrent(violation));
            }
            Err(violation) => {
                tracing::debug!("Not a current document ({violation}), trying legacy schema");
            }
        }

        let legacy = LegacyProject::parse(raw)?;
        let from_version = legacy.from_version();
        tracing::info!(
            "Migrating legacy project v{} ({} nodes, {} edges)",
            from_version,
            legacy.nodes.len(),
            legacy.edge_values().len()
        );

        let ignored = legacy.ignored_edge_count();
        if ignored > 0 {
            tracing::warn!("Ignoring {ignored} entries under `connections`; `edges` takes precedence");
        }

        let mut remapper = IdRemapper::new();

        let nodes = legacy
            .nodes
            .iter()
            .enumerate()
            .map(|(index, raw_node)| migrate_node(index, raw_node, &mut remapper))
            .collect::<Result<Vec<_>, _>>()?;

        let mut edge_ids = EdgeIds::reserving(legacy.edge_values());
        let edges = legacy
            .edge_values()
            .iter()
            .enumerate()
            .map(|(index, raw_edge)| migrate_edge(index, raw_edge, &remapper, &mut edge_ids))
            .collect::<Result<Vec<_>, _>>()?;

        let tags = migrate_tags(legacy.tags.as_deref().unwrap_or_default());

        let project = self.assemble(&legacy, &from_version, nodes, edges, tags);

        // Final gate: the output must pass the same check as native documents.
        let value = serde_json::to_value(&project).map_err(|e| {
            MigrationError::OutputRejected(dialogue_model::SchemaViolation::Malformed(e))
        })?;
        let project = Project::from_value(&value).map_err(MigrationError::OutputRejected)?;

        tracing::info!(
            "Migrated to v{}: {} nodes, {} edges, {} tags",
            CURRENT_SCHEMA_VERSION,
            project.nodes.len(),
            project.edges.len(),
            project.tags.len()
        );

        Ok(MigrationOutcome {
            project,
            was_migrated: true,
            from_version,
        })
    }

    fn assemble(
        &self,
        legacy: &LegacyProject,
        from_version: &str,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        tags: Vec<Tag>,
    ) -> Project {
        let now = self.now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let title = legacy
            .project_field(&["title", "name"])
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_TITLE);
        let description = legacy
            .project_field(&["description"])
            .and_then(Value::as_str)
            .map(str::to_owned);
        let created_at = legacy
            .project_field(&["createdAt", "created_at", "created"])
            .and_then(Value::as_str)
            .map_or_else(|| now.clone(), str::to_owned);

        let metadata = ProjectMetadata {
            title: title.to_string(),
            description,
            created_at,
            updated_at: now,
            node_count: nodes.len(),
            edge_count: edges.len(),
            tag_count: tags.len(),
            migrated_from: Some(from_version.to_string()),
        };

        Project {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            nodes,
            edges,
            tags,
            metadata,
        }
    }
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new()
    }
}

fn migrate_node(
    index: usize,
    raw: &Value,
    remapper: &mut IdRemapper,
) -> Result<Node, MigrationError> {
    let object = raw
        .as_object()
        .ok_or_else(|| MigrationError::invalid_node(index, None, "node is not an object"))?;

    let old_id = object
        .get("id")
        .and_then(scalar_string)
        .ok_or_else(|| MigrationError::invalid_node(index, None, "node has no usable id"))?;

    let node_type = tables::node_type(object.get("type").and_then(Value::as_str));

    let node_error = |reason: String| MigrationError::invalid_node(index, Some(old_id.clone()), reason);

    let conditions = first_array(object, CONDITION_FIELDS)
        .map(|items| items.iter().map(migrate_condition).collect::<Result<Vec<_>, _>>())
        .transpose()
        .map_err(&node_error)?
        .unwrap_or_default();

    let effects = first_array(object, EFFECT_FIELDS)
        .map(|items| items.iter().map(migrate_effect).collect::<Result<Vec<_>, _>>())
        .transpose()
        .map_err(&node_error)?
        .unwrap_or_default();

    let data = NodeData {
        text: first_str(object, TEXT_FIELDS).unwrap_or_default().to_string(),
        speaker: first_str(object, SPEAKER_FIELDS).map(str::to_owned),
        conditions,
        effects,
        tags: first_array(object, NODE_TAG_FIELDS)
            .map(|tags| tags.iter().filter_map(Value::as_str).map(str::to_owned).collect())
            .unwrap_or_default(),
        metadata: first_object(object, NODE_METADATA_FIELDS)
            .cloned()
            .unwrap_or_default(),
    };

    let id = remapper.map_node(&old_id, node_type);
    tracing::trace!("Node {old_id} -> {id}");

    Ok(Node {
        id,
        node_type,
        position: legacy_position(object),
        data,
    })
}

fn legacy_position(object: &Map<String, Value>) -> Position {
    let point = |o: &Map<String, Value>| -> Option<Position> {
        let x = o.get("x").and_then(Value::as_f64);
        let y = o.get("y").and_then(Value::as_f64);
        (x.is_some() || y.is_some()).then(|| Position::new(x.unwrap_or(0.0), y.unwrap_or(0.0)))
    };

    first_object(object, &["position", "data.position"])
        .and_then(point)
        .or_else(|| point(object))
        .unwrap_or_default()
}

fn variable_of(object: &Map<String, Value>) -> Result<String, String> {
    first_str(object, VARIABLE_FIELDS)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| "condition/effect has no variable".to_string())
}

fn migrate_condition(raw: &Value) -> Result<Condition, String> {
    let object = raw.as_object().ok_or("condition is not an object")?;
    Ok(Condition {
        variable: variable_of(object)?,
        operator: tables::comparison(first_str(object, OPERATOR_FIELDS)),
        value: object.get("value").cloned().unwrap_or(Value::Null),
        description: first_str(object, &["description", "note"]).map(str::to_owned),
    })
}

fn migrate_effect(raw: &Value) -> Result<Effect, String> {
    let object = raw.as_object().ok_or("effect is not an object")?;
    Ok(Effect {
        variable: variable_of(object)?,
        operator: tables::mutation(first_str(object, OPERATOR_FIELDS)),
        value: object.get("value").cloned().unwrap_or(Value::Null),
        description: first_str(object, &["description", "note"]).map(str::to_owned),
    })
}

fn declares_current(raw: &Value) -> bool {
    raw.get("schemaVersion").and_then(Value::as_str) == Some(CURRENT_SCHEMA_VERSION)
}

/// Edge ids taken by the document, plus those minted for id-less edges
struct EdgeIds {
    taken: HashSet<String>,
}

impl EdgeIds {
    fn reserving(raw_edges: &[Value]) -> Self {
        let taken = raw_edges
            .iter()
            .filter_map(|edge| edge.get("id"))
            .filter_map(scalar_string)
            .collect();
        Self { taken }
    }

    /// `edge_{index}`, suffixed until it clashes with nothing
    fn mint(&mut self, index: usize) -> String {
        let mut id = format!("edge_{index}");
        let mut suffix = 1;
        while self.taken.contains(&id) {
            id = format!("edge_{index}_{suffix}");
            suffix += 1;
        }
        self.taken.insert(id.clone());
        id
    }
}

fn migrate_edge(
    index: usize,
    raw: &Value,
    remapper: &IdRemapper,
    edge_ids: &mut EdgeIds,
) -> Result<Edge, MigrationError> {
    let object = raw
        .as_object()
        .ok_or_else(|| MigrationError::invalid_edge(index, None, "edge is not an object"))?;

    let id = match object.get("id").and_then(scalar_string) {
        Some(id) => id,
        None => edge_ids.mint(index),
    };

    let endpoint = |end: EdgeEnd, fields: &[&str]| -> Result<String, MigrationError> {
        let reference = fields
            .iter()
            .filter_map(|f| object.get(*f))
            .find_map(scalar_string)
            .ok_or_else(|| {
                MigrationError::invalid_edge(index, Some(id.clone()), format!("edge has no {end}"))
            })?;
        remapper
            .resolve(&reference)
            .map(str::to_owned)
            .ok_or_else(|| MigrationError::UnresolvedEndpoint {
                edge_id: id.clone(),
                end,
                reference,
            })
    };

    let source = endpoint(EdgeEnd::Source, &["source", "from", "sourceId"])?;
    let target = endpoint(EdgeEnd::Target, &["target", "to", "targetId"])?;

    Ok(Edge {
        source_handle: first_str(object, &["sourceHandle", "source_handle"]).map(str::to_owned),
        target_handle: first_str(object, &["targetHandle", "target_handle"]).map(str::to_owned),
        edge_type: first_str(object, &["type"]).map(str::to_owned),
        label: first_str(object, &["label"]).map(str::to_owned),
        animated: object.get("animated").and_then(Value::as_bool),
        style: first_present(object, &["style"]).cloned(),
        data: first_present(object, &["data"]).cloned(),
        ..Edge::new(id, source, target)
    })
}

/// Translate tags, skipping (and logging) any that cannot be migrated
fn migrate_tags(raw: &[Value]) -> Vec<Tag> {
    let mut seen = HashSet::new();
    let mut tags = Vec::with_capacity(raw.len());

    for (index, raw_tag) in raw.iter().enumerate() {
        match migrate_tag(index, raw_tag) {
            Ok(tag) if seen.insert(tag.id.clone()) => tags.push(tag),
            Ok(tag) => tracing::warn!("Skipping tag #{index}: duplicate id '{}'", tag.id),
            Err(reason) => tracing::warn!("Skipping tag #{index}: {reason}"),
        }
    }

    tags
}

fn migrate_tag(index: usize, raw: &Value) -> Result<Tag, String> {
    let object = raw.as_object().ok_or("tag is not an object")?;

    let label = first_str(object, &["label", "name"])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or("tag has no label")?;

    let importance = first_present(object, &["metadata.importance", "importance"])
        .and_then(Value::as_f64)
        .map_or(DEFAULT_IMPORTANCE, clamp_importance);

    Ok(Tag {
        id: object
            .get("id")
            .and_then(scalar_string)
            .unwrap_or_else(|| format!("tag_{index}")),
        label: label.to_string(),
        tag_type: tables::tag_type(first_str(object, &["type", "category"])),
        content: first_str(object, &["content", "description"]).map(str::to_owned),
        metadata: TagMetadata {
            importance,
            character_voice: first_str(
                object,
                &["metadata.characterVoice", "metadata.character_voice", "characterVoice", "voice"],
            )
            .map(str::to_owned),
            narrative_pacing: first_str(
                object,
                &["metadata.narrativePacing", "metadata.narrative_pacing", "narrativePacing", "pacing"],
            )
            .map(str::to_owned),
        },
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_importance(raw: f64) -> u8 {
    if raw.is_nan() {
        return DEFAULT_IMPORTANCE;
    }
    raw.round()
        .clamp(f64::from(MIN_IMPORTANCE), f64::from(MAX_IMPORTANCE)) as u8
}
