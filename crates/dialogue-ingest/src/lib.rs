//! Dialogue Ingest
//!
//! Hardened ingestion pipeline: untrusted text in, certified current-schema
//! project or classified failure out.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────── isolated worker (timeout) ────────────┐
//! raw text ──► Importer                                               ├──► ImportSuccess
//!                 └──────────── in-process fallback ──────────────────┘     | ImportFailure
//!                                      │
//!                                 run_stages:
//!     size ─► sanitize ─► parse ─► $ref cycles ─► cardinality ─► migrate ─► validate ─► assemble
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use dialogue_ingest::{ImportConfig, Importer};
//!
//! let importer = Importer::new(ImportConfig::default());
//! match importer.import_project(text, Some("quest.json")).await {
//!     Ok(success) => println!("{} nodes", success.project.nodes.len()),
//!     Err(failure) => eprintln!("{}", failure.human_message),
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod gates;
pub mod importer;
pub mod isolation;
pub mod outcome;
pub mod sanitize;
pub mod stages;

// Re-exports for convenience
pub use config::{ConfigError, ImportConfig};
pub use error::{ImportDetail, ImportErrorCode, ImportFailure};
pub use importer::Importer;
pub use outcome::{ImportSuccess, MigrationInfo, ValidationSummary};
pub use stages::{run_stages, ImportResult};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
