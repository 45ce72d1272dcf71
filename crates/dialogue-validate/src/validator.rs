//! Graph validator
//!
//! Validation is total: every structural problem becomes a [`Finding`] in the
//! report and nothing here returns early. Whether a finding blocks an import
//! is decided by [`FindingCode::is_critical`].

use crate::finding::{Finding, FindingCode};
use crate::graph::Graph;
use crate::report::{GraphStatistics, ValidationReport};
use dialogue_model::{Node, Project};
use std::collections::{HashMap, HashSet};

/// Cycles reported with their path; the rest are only counted
pub const MAX_REPORTED_CYCLES: usize = 100;

/// Nodes kept in a reported cycle path before the closing node
pub const MAX_CYCLE_PATH: usize = 32;

/// Structural validator for current-schema projects
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphValidator;

impl GraphValidator {
    /// Create a new validator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate a project graph
    ///
    /// Checks, in order:
    /// 1. Node ids (duplicates, prefix pattern) and node content
    /// 2. Edge ids and endpoint resolution
    /// 3. Roots, orphans and reachability
    /// 4. Cycles
    #[must_use]
    pub fn validate(&self, project: &Project) -> ValidationReport {
        let mut report = ValidationReport::default();
        let mut stats = GraphStatistics {
            node_count: project.nodes.len(),
            edge_count: project.edges.len(),
            tag_count: project.tags.len(),
            ..GraphStatistics::default()
        };

        if project.nodes.is_empty() {
            report.push(Finding::new(FindingCode::EmptyProject, "Project contains no nodes"));
        }

        // 1. Nodes
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(project.nodes.len());
        let mut ids: Vec<&str> = Vec::with_capacity(project.nodes.len());
        let mut empty_text = Vec::new();

        for node in &project.nodes {
            *stats
                .nodes_by_type
                .entry(node.node_type.as_str().to_string())
                .or_default() += 1;

            let id = node.id.as_str();
            if index.contains_key(id) {
                report.push(
                    Finding::new(
                        FindingCode::DuplicateNodeId,
                        format!("Node id '{id}' is declared more than once"),
                    )
                    .with_nodes([id]),
                );
            } else {
                index.insert(id, ids.len());
                ids.push(id);
            }

            if !node.has_valid_id() {
                report.push(
                    Finding::new(
                        FindingCode::InvalidNodeId,
                        format!("Node id '{id}' does not match '{}_<alphanumeric>'", node.node_type),
                    )
                    .with_nodes([id]),
                );
            }

            if node.data.text.trim().is_empty() {
                empty_text.push(id);
            }
            check_variables(node, &mut report);
        }

        if !empty_text.is_empty() {
            report.push(
                Finding::new(
                    FindingCode::EmptyNodeText,
                    format!("{} node(s) have no dialog text", empty_text.len()),
                )
                .with_nodes(empty_text),
            );
        }

        // 2. Edges
        let mut graph = Graph::with_nodes(ids);
        let mut edge_ids: HashSet<&str> = HashSet::with_capacity(project.edges.len());

        for edge in &project.edges {
            if !edge_ids.insert(edge.id.as_str()) {
                report.push(
                    Finding::new(
                        FindingCode::DuplicateEdgeId,
                        format!("Edge id '{}' is declared more than once", edge.id),
                    )
                    .with_edge(&edge.id),
                );
            }

            let source = index.get(edge.source.as_str()).copied();
            let target = index.get(edge.target.as_str()).copied();
            if source.is_none() {
                report.push(
                    Finding::new(
                        FindingCode::EdgeSourceMissing,
                        format!("Edge '{}' starts at unknown node '{}'", edge.id, edge.source),
                    )
                    .with_edge(&edge.id)
                    .with_nodes([edge.source.as_str()]),
                );
            }
            if target.is_none() {
                report.push(
                    Finding::new(
                        FindingCode::EdgeTargetMissing,
                        format!("Edge '{}' ends at unknown node '{}'", edge.id, edge.target),
                    )
                    .with_edge(&edge.id)
                    .with_nodes([edge.target.as_str()]),
                );
            }

            let (Some(source), Some(target)) = (source, target) else {
                continue;
            };
            if source == target {
                stats.self_loop_count += 1;
                graph.touch(source);
                report.push(
                    Finding::new(
                        FindingCode::SelfLoop,
                        format!("Edge '{}' connects node '{}' to itself", edge.id, edge.source),
                    )
                    .with_edge(&edge.id)
                    .with_nodes([edge.source.as_str()]),
                );
                continue;
            }
            graph.connect(source, target);
        }

        // 3. Roots and reachability
        if graph.len() > 0 {
            let roots = graph.roots();
            let depths = graph.depths(&roots);

            let orphans: Vec<&str> = (0..graph.len())
                .filter(|&i| !graph.is_connected(i))
                .map(|i| graph.id(i))
                .collect();
            let unreachable: Vec<&str> = (0..graph.len())
                .filter(|&i| graph.is_connected(i) && depths[i].is_none())
                .map(|i| graph.id(i))
                .collect();
            let entry_points = roots.iter().filter(|&&r| graph.is_connected(r)).count();

            if roots.is_empty() {
                report.push(Finding::new(
                    FindingCode::NoRootNodes,
                    "Every node has an incoming edge; the dialog has no entry point",
                ));
            }
            if entry_points > 1 {
                report.push(
                    Finding::new(
                        FindingCode::MultipleRoots,
                        format!("Dialog has {entry_points} entry points"),
                    )
                    .with_nodes(
                        roots
                            .iter()
                            .filter(|&&r| graph.is_connected(r))
                            .map(|&r| graph.id(r)),
                    ),
                );
            }
            if !orphans.is_empty() {
                report.push(
                    Finding::new(
                        FindingCode::OrphanedNodes,
                        format!("{} node(s) have no connections", orphans.len()),
                    )
                    .with_nodes(orphans.iter().copied()),
                );
            }
            if !unreachable.is_empty() {
                report.push(
                    Finding::new(
                        FindingCode::UnreachableNodes,
                        format!("{} node(s) cannot be reached from any entry point", unreachable.len()),
                    )
                    .with_nodes(unreachable.iter().copied()),
                );
            }

            // 4. Cycles
            let cycles = graph.cycles(MAX_REPORTED_CYCLES, MAX_CYCLE_PATH);
            for cycle in &cycles.paths {
                let path: Vec<&str> = cycle.nodes.iter().map(|&i| graph.id(i)).collect();
                let message = if cycle.is_truncated() {
                    format!(
                        "Circular dependency through {} nodes starting at '{}'",
                        cycle.len, path[0]
                    )
                } else {
                    format!("Circular dependency: {}", path.join(" -> "))
                };
                report.push(Finding::new(FindingCode::CircularDependency, message).with_nodes(path));
            }
            let unlisted = cycles.total - cycles.paths.len();
            if unlisted > 0 {
                report.push(Finding::new(
                    FindingCode::CircularDependency,
                    format!("{unlisted} more circular dependencies not listed"),
                ));
            }

            stats.root_count = roots.len();
            stats.leaf_count = graph.leaf_count();
            stats.orphan_count = orphans.len();
            stats.unreachable_count = unreachable.len();
            stats.cycle_count = cycles.total;
            stats.max_depth = depths.iter().flatten().copied().max().unwrap_or(0);
        }

        let report = report.finish(stats);
        tracing::debug!(
            "Validated project: {} errors, {} warnings, {} info",
            report.errors.len(),
            report.warnings.len(),
            report.info.len()
        );
        report
    }
}

/// Validate with the default validator
#[must_use]
pub fn validate(project: &Project) -> ValidationReport {
    GraphValidator::new().validate(project)
}

fn check_variables(node: &Node, report: &mut ValidationReport) {
    let blank_conditions = node
        .data
        .conditions
        .iter()
        .filter(|c| c.variable.trim().is_empty())
        .count();
    let blank_effects = node
        .data
        .effects
        .iter()
        .filter(|e| e.variable.trim().is_empty())
        .count();

    if blank_conditions + blank_effects > 0 {
        report.push(
            Finding::new(
                FindingCode::EmptyVariable,
                format!(
                    "Node '{}' has {blank_conditions} condition(s) and {blank_effects} effect(s) without a variable",
                    node.id
                ),
            )
            .with_nodes([node.id.as_str()]),
        );
    }
}
