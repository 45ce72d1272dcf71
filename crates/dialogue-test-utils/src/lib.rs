//! Testing utilities for the dialogue workspace
//!
//! Shared fixtures: legacy documents as raw JSON and current projects built
//! directly from ids.

#![allow(missing_docs)]

use dialogue_model::{Edge, Node, NodeType, Project, ProjectMetadata};
use serde_json::{json, Value};

pub const FIXED_TIMESTAMP: &str = "2024-01-01T00:00:00.000Z";

pub fn fixed_metadata() -> ProjectMetadata {
    ProjectMetadata {
        title: "Fixture".to_string(),
        created_at: FIXED_TIMESTAMP.to_string(),
        updated_at: FIXED_TIMESTAMP.to_string(),
        ..ProjectMetadata::default()
    }
}

/// Legacy document with `(id, type)` nodes and `(source, target)` connections
pub fn legacy_document(nodes: &[(&str, &str)], connections: &[(&str, &str)]) -> Value {
    let nodes: Vec<Value> = nodes
        .iter()
        .map(|(id, kind)| json!({"id": id, "type": kind, "data": {"text": format!("line {id}")}}))
        .collect();
    let connections: Vec<Value> = connections
        .iter()
        .enumerate()
        .map(|(i, (source, target))| json!({"id": format!("c{i}"), "source": source, "target": target}))
        .collect();
    json!({
        "schemaVersion": "1.0.0",
        "nodes": nodes,
        "connections": connections,
    })
}

/// The canonical two-node NPC/player exchange
pub fn legacy_greeting() -> Value {
    json!({
        "schemaVersion": "1.0.0",
        "nodes": [
            {"id": "a", "type": "npc", "data": {"text": "Hi"}},
            {"id": "b", "type": "player", "data": {"text": "Hey"}}
        ],
        "connections": [{"id": "e1", "source": "a", "target": "b"}]
    })
}

/// Legacy linear chain `n0 → n1 → … → n{len-1}`
pub fn legacy_chain(len: usize) -> Value {
    let ids: Vec<String> = (0..len).map(|i| format!("n{i}")).collect();
    let nodes: Vec<(&str, &str)> = ids.iter().map(|id| (id.as_str(), "npc")).collect();
    let edges: Vec<(&str, &str)> = ids
        .windows(2)
        .map(|pair| (pair[0].as_str(), pair[1].as_str()))
        .collect();
    legacy_document(&nodes, &edges)
}

/// Current project from explicit ids; ids are used verbatim
pub fn current_project(nodes: &[(&str, NodeType)], edges: &[(&str, &str, &str)]) -> Project {
    let mut project = Project::new(fixed_metadata());
    project.nodes = nodes
        .iter()
        .map(|(id, node_type)| Node::new(*id, *node_type).with_text(format!("text of {id}")))
        .collect();
    project.edges = edges
        .iter()
        .map(|(id, source, target)| Edge::new(*id, *source, *target))
        .collect();
    project.metadata.node_count = project.nodes.len();
    project.metadata.edge_count = project.edges.len();
    project
}

/// Current project of `npcDialog` nodes named `npcDialog_<name>`
pub fn npc_graph(names: &[&str], edges: &[(&str, &str)]) -> Project {
    let ids: Vec<String> = names.iter().map(|n| format!("npcDialog_{n}")).collect();
    let nodes: Vec<(&str, NodeType)> = ids.iter().map(|id| (id.as_str(), NodeType::NpcDialog)).collect();
    let edge_ids: Vec<(String, String, String)> = edges
        .iter()
        .enumerate()
        .map(|(i, (s, t))| (format!("e{i}"), format!("npcDialog_{s}"), format!("npcDialog_{t}")))
        .collect();
    let edges: Vec<(&str, &str, &str)> = edge_ids
        .iter()
        .map(|(id, s, t)| (id.as_str(), s.as_str(), t.as_str()))
        .collect();
    current_project(&nodes, &edges)
}
