//! Import failure taxonomy
//!
//! Every failure leaving the pipeline is an [`ImportFailure`] with one of a
//! closed set of codes. Only migration and critical-validation failures carry
//! an [`ImportDetail`]; it is logged, never serialized for end users.

use dialogue_migrate::MigrationError;
use dialogue_validate::Finding;
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use std::fmt;

/// Closed set of import failure codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportErrorCode {
    /// Payload exceeds the byte ceiling
    FileTooLarge,
    /// Payload is not JSON
    InvalidJson,
    /// Document refers to one of its own ancestors
    CircularReference,
    /// Node count exceeds the ceiling
    TooManyNodes,
    /// Edge count exceeds the ceiling
    TooManyEdges,
    /// Legacy translation failed
    MigrationFailed,
    /// Critical structural defect
    ValidationFailed,
    /// Isolated worker did not answer in time
    Timeout,
    /// Isolated worker died or dropped its reply
    IsolationBoundaryError,
    /// Anything else
    UnknownError,
}

impl ImportErrorCode {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FileTooLarge => "FILE_TOO_LARGE",
            Self::InvalidJson => "INVALID_JSON",
            Self::CircularReference => "CIRCULAR_REFERENCE",
            Self::TooManyNodes => "TOO_MANY_NODES",
            Self::TooManyEdges => "TOO_MANY_EDGES",
            Self::MigrationFailed => "MIGRATION_FAILED",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::Timeout => "TIMEOUT",
            Self::IsolationBoundaryError => "ISOLATION_BOUNDARY_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ImportErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured diagnostics for operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ImportDetail {
    /// Why the migrator refused the document
    #[serde(rename_all = "camelCase")]
    Migration {
        /// Machine-readable category
        category: String,
        /// Full error message
        reason: String,
        /// Node or edge id at fault
        #[serde(skip_serializing_if = "Option::is_none")]
        offending_id: Option<String>,
        /// Underlying cause
        #[serde(skip_serializing_if = "Option::is_none")]
        cause: Option<String>,
    },
    /// The critical findings that blocked the import
    Validation {
        /// Critical findings in report order
        findings: Vec<Finding>,
    },
}

/// A classified import failure; never accompanied by a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{error_code}: {human_message}")]
pub struct ImportFailure {
    /// Failure code
    pub error_code: ImportErrorCode,
    /// Message safe to show end users
    pub human_message: String,
    /// Operator-only diagnostics
    #[serde(skip)]
    pub internal_detail: Option<ImportDetail>,
}

impl ImportFailure {
    /// Create a failure without detail
    #[must_use]
    pub fn new(error_code: ImportErrorCode, human_message: impl Into<String>) -> Self {
        Self {
            error_code,
            human_message: human_message.into(),
            internal_detail: None,
        }
    }

    /// Attach operator diagnostics
    #[must_use]
    pub fn with_detail(mut self, detail: ImportDetail) -> Self {
        self.internal_detail = Some(detail);
        self
    }

    /// Payload over the byte ceiling
    #[must_use]
    pub fn too_large(len: usize, max: usize) -> Self {
        Self::new(
            ImportErrorCode::FileTooLarge,
            format!("File is too large ({len} bytes, limit {max} bytes)"),
        )
    }

    /// Migration refused the document
    #[must_use]
    pub fn migration(err: &MigrationError) -> Self {
        let detail = ImportDetail::Migration {
            category: err.kind().to_string(),
            reason: err.to_string(),
            offending_id: err.offending_id().map(str::to_string),
            cause: err.source().map(ToString::to_string),
        };
        Self::new(
            ImportErrorCode::MigrationFailed,
            "The project could not be upgraded to the current format",
        )
        .with_detail(detail)
    }

    /// Critical findings blocked the import
    #[must_use]
    pub fn validation(findings: Vec<Finding>) -> Self {
        Self::new(
            ImportErrorCode::ValidationFailed,
            format!(
                "The project has {} critical structural error(s)",
                findings.len()
            ),
        )
        .with_detail(ImportDetail::Validation { findings })
    }

    /// Unexpected failure
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(
            ImportErrorCode::UnknownError,
            "An unexpected error occurred while importing the project",
        )
    }

    /// Failure code
    #[inline]
    #[must_use]
    pub fn code(&self) -> ImportErrorCode {
        self.error_code
    }
}
