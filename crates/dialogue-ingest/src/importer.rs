//! Importer
//!
//! The single externally called entry point. Chooses between the isolated
//! worker and the in-process path; both run [`run_stages`].

use crate::config::ImportConfig;
use crate::error::{ImportErrorCode, ImportFailure};
use crate::isolation::{isolate, panic_message, BoundaryError};
use crate::stages::{run_stages, ImportResult};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

const WORKER_NAME: &str = "dialogue-import";
const DEFAULT_ORIGIN: &str = "<memory>";

type Stages = fn(&str, &ImportConfig) -> ImportResult;

/// Ingestion pipeline front door
#[derive(Debug, Clone)]
pub struct Importer {
    config: ImportConfig,
    timeout: Duration,
    stages: Stages,
}

impl Default for Importer {
    fn default() -> Self {
        Self::new(ImportConfig::default())
    }
}

impl Importer {
    /// Create an importer
    #[must_use]
    pub fn new(config: ImportConfig) -> Self {
        Self {
            timeout: config.timeout(),
            config,
            stages: run_stages,
        }
    }

    /// Override the isolated worker's deadline, which defaults to
    /// [`ImportConfig::timeout`]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg(test)]
    fn with_stages(mut self, stages: Stages) -> Self {
        self.stages = stages;
        self
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Import one document
    ///
    /// `origin` names the source (usually a file name) in logs only.
    ///
    /// # Errors
    /// A classified [`ImportFailure`]; no project accompanies a failure.
    pub async fn import_project(&self, raw: impl Into<Arc<str>>, origin: Option<&str>) -> ImportResult {
        let raw: Arc<str> = raw.into();
        let origin = origin.unwrap_or(DEFAULT_ORIGIN);
        tracing::info!("Importing project from {} ({} bytes)", origin, raw.len());

        let result = if self.config.isolation {
            self.import_isolated(Arc::clone(&raw)).await
        } else {
            self.import_in_process(&raw)
        };

        match &result {
            Ok(success) => tracing::info!(
                "Imported {}: {} nodes, {} edges, {} warnings",
                origin,
                success.project.nodes.len(),
                success.project.edges.len(),
                success.validation_summary.warning_count
            ),
            Err(failure) => tracing::error!(
                "Import of {} failed: {} (detail: {:?})",
                origin,
                failure,
                failure.internal_detail
            ),
        }
        result
    }

    /// Run the stages on the calling thread
    ///
    /// # Errors
    /// As [`Importer::import_project`]; a panic becomes `UNKNOWN_ERROR`.
    pub fn import_in_process(&self, raw: &str) -> ImportResult {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.stages)(raw, &self.config))) {
            Ok(result) => result,
            Err(payload) => {
                tracing::error!("Import stages panicked: {}", panic_message(payload.as_ref()));
                Err(ImportFailure::unknown())
            }
        }
    }

    async fn import_isolated(&self, raw: Arc<str>) -> ImportResult {
        let job_raw = Arc::clone(&raw);
        let job_config = self.config.clone();
        let stages = self.stages;
        let job = move || stages(&job_raw, &job_config);

        match isolate(WORKER_NAME, self.timeout, job).await {
            Ok(result) => result,
            Err(BoundaryError::Spawn(e)) => {
                tracing::warn!("Isolation unavailable ({}), importing in process", e);
                self.import_in_process(&raw)
            }
            Err(other) => Err(boundary_failure(&other)),
        }
    }
}

/// Classify a boundary error that left no result
fn boundary_failure(err: &BoundaryError) -> ImportFailure {
    tracing::error!("Isolation boundary failed: {}", err);
    match err {
        BoundaryError::Timeout(limit) => ImportFailure::new(
            ImportErrorCode::Timeout,
            format!("Import timed out after {} s", limit.as_secs_f64()),
        ),
        BoundaryError::Spawn(_) | BoundaryError::Panicked(_) | BoundaryError::Disconnected => {
            ImportFailure::new(
                ImportErrorCode::IsolationBoundaryError,
                "The import worker failed unexpectedly",
            )
        }
    }
}
