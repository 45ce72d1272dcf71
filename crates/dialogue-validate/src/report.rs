//! Validation report and graph statistics

use crate::finding::{Finding, FindingCode, Severity};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts describing the shape of a project graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatistics {
    /// Declared nodes, duplicates included
    pub node_count: usize,
    /// Declared edges, duplicates included
    pub edge_count: usize,
    /// Declared tags
    pub tag_count: usize,
    /// Nodes with no incoming edge (orphans included)
    pub root_count: usize,
    /// Nodes with no outgoing edge (orphans included)
    pub leaf_count: usize,
    /// Nodes with no edges at all
    pub orphan_count: usize,
    /// Connected nodes not reachable from any root
    pub unreachable_count: usize,
    /// Distinct cycles reported
    pub cycle_count: usize,
    /// Edges whose source equals their target
    pub self_loop_count: usize,
    /// Longest shortest-path distance from the nearest root
    pub max_depth: usize,
    /// Node count per wire type name
    pub nodes_by_type: BTreeMap<String, usize>,
}

/// Outcome of validating a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True when no error-severity finding was produced
    pub is_valid: bool,
    /// Error findings
    pub errors: Vec<Finding>,
    /// Warning findings
    pub warnings: Vec<Finding>,
    /// Informational findings
    pub info: Vec<Finding>,
    /// Graph statistics
    pub statistics: GraphStatistics,
}

impl ValidationReport {
    /// File a finding under its severity
    pub fn push(&mut self, finding: Finding) {
        match finding.severity() {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
            Severity::Info => self.info.push(finding),
        }
    }

    /// Seal the report: validity follows the error list
    #[must_use]
    pub(crate) fn finish(mut self, statistics: GraphStatistics) -> Self {
        self.statistics = statistics;
        self.is_valid = self.errors.is_empty();
        self
    }

    /// All findings, errors first
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.errors.iter().chain(&self.warnings).chain(&self.info)
    }

    /// Findings carrying `code`
    pub fn with_code(&self, code: FindingCode) -> impl Iterator<Item = &Finding> {
        self.findings().filter(move |f| f.code == code)
    }

    /// Whether any finding carries `code`
    #[must_use]
    pub fn has(&self, code: FindingCode) -> bool {
        self.with_code(code).next().is_some()
    }

    /// Error findings that abort an import
    pub fn critical(&self) -> impl Iterator<Item = &Finding> {
        self.errors.iter().filter(|f| f.code.is_critical())
    }
}
