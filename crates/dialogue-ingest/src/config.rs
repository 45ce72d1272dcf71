//! Import configuration
//!
//! Defaults cover the common case. A TOML file can override any field and
//! `DIALOGUE_*` environment variables override the file.
//!
//! ```toml
//! max_bytes = 1048576
//! timeout_secs = 10
//! isolation = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment override for [`ImportConfig::max_bytes`]
pub const ENV_MAX_BYTES: &str = "DIALOGUE_MAX_BYTES";
/// Environment override for [`ImportConfig::max_nodes`]
pub const ENV_MAX_NODES: &str = "DIALOGUE_MAX_NODES";
/// Environment override for [`ImportConfig::max_edges`]
pub const ENV_MAX_EDGES: &str = "DIALOGUE_MAX_EDGES";
/// Environment override for [`ImportConfig::timeout_secs`]
pub const ENV_TIMEOUT_SECS: &str = "DIALOGUE_TIMEOUT_SECS";
/// Environment override for [`ImportConfig::isolation`]
pub const ENV_ISOLATION: &str = "DIALOGUE_ISOLATION";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`ImportConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment variable holds an unusable value
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Value it held
        value: String,
    },

    /// A limit is out of range
    #[error("invalid {field}: {reason}")]
    OutOfRange {
        /// Offending field
        field: &'static str,
        /// Why the value was refused
        reason: &'static str,
    },
}

/// Ceilings and switches for the ingestion pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Largest accepted payload in bytes
    pub max_bytes: usize,
    /// Largest accepted node count
    pub max_nodes: usize,
    /// Largest accepted edge count; `connections` counts only when `edges` is empty
    pub max_edges: usize,
    /// Wall-clock limit for the isolated worker
    pub timeout_secs: u64,
    /// Run the stages on a dedicated worker thread
    pub isolation: bool,
    /// Strip script-like content before parsing
    pub sanitize: bool,
}

impl ImportConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With byte ceiling
    #[inline]
    #[must_use]
    pub fn with_max_bytes(mut self, max: usize) -> Self {
        self.max_bytes = max;
        self
    }

    /// With node ceiling
    #[inline]
    #[must_use]
    pub fn with_max_nodes(mut self, max: usize) -> Self {
        self.max_nodes = max;
        self
    }

    /// With edge ceiling
    #[inline]
    #[must_use]
    pub fn with_max_edges(mut self, max: usize) -> Self {
        self.max_edges = max;
        self
    }

    /// With worker timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// With or without the isolated worker
    #[inline]
    #[must_use]
    pub fn with_isolation(mut self, enabled: bool) -> Self {
        self.isolation = enabled;
        self
    }

    /// With or without sanitization
    #[inline]
    #[must_use]
    pub fn with_sanitize(mut self, enabled: bool) -> Self {
        self.sanitize = enabled;
        self
    }

    /// Worker timeout as a [`Duration`]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse TOML; missing fields keep their defaults
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed TOML or unknown keys,
    /// [`ConfigError::OutOfRange`] on zero limits.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`ImportConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded import config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Apply `DIALOGUE_*` overrides from the process environment
    ///
    /// # Errors
    /// [`ConfigError::InvalidEnv`] when a variable does not parse.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary lookup
    ///
    /// # Errors
    /// [`ConfigError::InvalidEnv`] when a value does not parse,
    /// [`ConfigError::OutOfRange`] when it yields a zero limit.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_BYTES) {
            self.max_bytes = parse_number(ENV_MAX_BYTES, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_NODES) {
            self.max_nodes = parse_number(ENV_MAX_NODES, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_EDGES) {
            self.max_edges = parse_number(ENV_MAX_EDGES, &value)?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = parse_number(ENV_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = lookup(ENV_ISOLATION) {
            self.isolation = parse_switch(ENV_ISOLATION, &value)?;
        }
        self.check()?;
        Ok(self)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let zero = |field: &'static str| ConfigError::OutOfRange {
            field,
            reason: "must be greater than zero",
        };
        if self.max_bytes == 0 {
            return Err(zero("max_bytes"));
        }
        if self.max_nodes == 0 {
            return Err(zero("max_nodes"));
        }
        if self.max_edges == 0 {
            return Err(zero("max_edges"));
        }
        if self.timeout_secs == 0 {
            return Err(zero("timeout_secs"));
        }
        Ok(())
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_bytes: 15 * 1024 * 1024,
            max_nodes: 10_000,
            max_edges: 20_000,
            timeout_secs: 30,
            isolation: true,
            sanitize: true,
        }
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}

fn parse_switch(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.max_bytes, 15_728_640);
        assert_eq!(config.max_nodes, 10_000);
        assert_eq!(config.max_edges, 20_000);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.isolation);
        assert!(config.sanitize);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ImportConfig::from_toml_str("max_nodes = 5\nisolation = false\n").unwrap();
        assert_eq!(config.max_nodes, 5);
        assert!(!config.isolation);
        assert_eq!(config.max_edges, 20_000);
    }

    #[test]
    fn unknown_key_rejected() {
        let err = ImportConfig::from_toml_str("max_nodez = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_limit_rejected() {
        let err = ImportConfig::from_toml_str("timeout_secs = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "timeout_secs",
                ..
            }
        ));
    }

    #[test]
    fn overrides_apply() {
        let config = ImportConfig::new()
            .with_overrides(lookup(&[
                (ENV_MAX_BYTES, "1024"),
                (ENV_TIMEOUT_SECS, " 5 "),
                (ENV_ISOLATION, "off"),
            ]))
            .unwrap();
        assert_eq!(config.max_bytes, 1024);
        assert_eq!(config.timeout_secs, 5);
        assert!(!config.isolation);
    }

    #[test]
    fn bad_override_names_variable() {
        let err = ImportConfig::new()
            .with_overrides(lookup(&[(ENV_MAX_NODES, "many")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid value \"many\" for DIALOGUE_MAX_NODES");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ImportConfig::from_toml_file("/nonexistent/dialogue.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
