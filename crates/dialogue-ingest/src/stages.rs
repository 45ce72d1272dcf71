//! The eight import stages
//!
//! Both execution paths call [`run_stages`]; the isolated worker and the
//! in-process fallback cannot drift apart.

use crate::config::ImportConfig;
use crate::error::ImportFailure;
use crate::gates;
use crate::outcome::{ImportSuccess, MigrationInfo, ValidationSummary};
use crate::sanitize::sanitize;
use dialogue_migrate::Migrator;
use dialogue_validate::{validate, Finding};
use std::borrow::Cow;

/// Result of one import
pub type ImportResult = Result<ImportSuccess, ImportFailure>;

/// Run every stage over `raw`, stopping at the first failing gate
///
/// 1. Size
/// 2. Sanitization
/// 3. Parse
/// 4. Reference cycles
/// 5. Cardinality
/// 6. Migration
/// 7. Validation (critical findings only)
/// 8. Assembly
///
/// # Errors
/// The [`ImportFailure`] of the first gate that rejects the input.
pub fn run_stages(raw: &str, config: &ImportConfig) -> ImportResult {
    gates::check_size(raw, config.max_bytes)?;

    let text = if config.sanitize {
        let sanitized = sanitize(raw);
        if sanitized.removed > 0 {
            tracing::warn!("Sanitizer removed {} script-like fragment(s)", sanitized.removed);
        }
        sanitized.text
    } else {
        Cow::Borrowed(raw)
    };

    let document = gates::parse(&text)?;
    gates::check_references(&document)?;
    gates::check_cardinality(&document, config)?;

    let outcome = Migrator::new()
        .migrate(&document)
        .map_err(|e| ImportFailure::migration(&e))?;
    if outcome.was_migrated {
        tracing::info!(
            "Migrated project from schema {} ({} nodes, {} edges)",
            outcome.from_version,
            outcome.project.nodes.len(),
            outcome.project.edges.len()
        );
    }

    let report = validate(&outcome.project);
    let critical: Vec<Finding> = report.critical().cloned().collect();
    if !critical.is_empty() {
        return Err(ImportFailure::validation(critical));
    }

    let migration_info = MigrationInfo::from(&outcome);
    Ok(ImportSuccess {
        project: outcome.project,
        migration_info,
        validation_summary: ValidationSummary::from(&report),
    })
}
