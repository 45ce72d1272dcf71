//! Successful import payload

use dialogue_migrate::MigrationOutcome;
use dialogue_model::{Project, CURRENT_SCHEMA_VERSION};
use dialogue_validate::ValidationReport;
use serde::Serialize;

/// What the migrator did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationInfo {
    /// Whether the input was legacy
    pub was_migrated: bool,
    /// Version the input declared
    pub from_version: String,
    /// Always the current schema version
    pub to_version: String,
}

impl From<&MigrationOutcome> for MigrationInfo {
    fn from(outcome: &MigrationOutcome) -> Self {
        Self {
            was_migrated: outcome.was_migrated,
            from_version: outcome.from_version.clone(),
            to_version: CURRENT_SCHEMA_VERSION.to_string(),
        }
    }
}

/// Finding counts of the validation stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// No error findings
    pub is_valid: bool,
    /// Error findings
    pub error_count: usize,
    /// Warning findings
    pub warning_count: usize,
    /// Informational findings
    pub info_count: usize,
}

impl From<&ValidationReport> for ValidationSummary {
    fn from(report: &ValidationReport) -> Self {
        Self {
            is_valid: report.is_valid,
            error_count: report.errors.len(),
            warning_count: report.warnings.len(),
            info_count: report.info.len(),
        }
    }
}

/// A migrated, certified project
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSuccess {
    /// Current-schema project
    pub project: Project,
    /// Migration summary
    pub migration_info: MigrationInfo,
    /// Validation summary
    pub validation_summary: ValidationSummary,
}
