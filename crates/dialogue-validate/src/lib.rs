//! Dialogue Validate
//!
//! Structural integrity checks for current-schema dialog projects: id
//! uniqueness, endpoint resolution, cycles, roots, orphans and reachability.
//!
//! # Example
//!
//! ```rust,ignore
//! use dialogue_validate::{validate, FindingCode};
//!
//! let report = validate(&project);
//! if report.critical().next().is_some() {
//!     // refuse the import
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod finding;
mod graph;
pub mod report;
pub mod validator;

// Re-exports for convenience
pub use finding::{Finding, FindingCode, Severity};
pub use report::{GraphStatistics, ValidationReport};
pub use validator::{validate, GraphValidator, MAX_CYCLE_PATH, MAX_REPORTED_CYCLES};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
