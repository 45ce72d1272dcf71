//! Dialogue Migrate
//!
//! Upgrades legacy dialog-project documents to the current schema.
//!
//! # Architecture
//!
//! ```text
//! raw JSON ──► current? ──yes──► unchanged
//!                 │no
//!                 ▼
//!            LegacyProject ──► nodes ──► edges ──► tags ──► assemble ──► strict check
//!                                 │         ▲
//!                                 ▼         │
//!                              IdRemapper ──┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use dialogue_migrate::Migrator;
//!
//! let outcome = Migrator::new().migrate(&raw)?;
//! if outcome.was_migrated {
//!     println!("upgraded from {}", outcome.from_version);
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod legacy;
pub mod migrator;
pub mod remap;
pub mod tables;

// Re-exports for convenience
pub use error::{EdgeEnd, MigrationError};
pub use migrator::{MigrationOutcome, Migrator};
pub use remap::IdRemapper;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
