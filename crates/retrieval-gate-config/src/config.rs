// crates/retrieval-gate-config/src/config.rs
// ============================================================================
// Module: Retrieval Gate Configuration
// Description: Configuration loading and validation for Retrieval Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: retrieval-gate-core, serde, time, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional and defaults to the production posture:
//! checks enabled, all axes required, no admin bypass, audit logging on.
//! Missing or invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use retrieval_gate_core::AccessControlEngine;
use retrieval_gate_core::AccessPolicyConfig;
use retrieval_gate_core::AuditSink;
use retrieval_gate_core::BatchMode;
use retrieval_gate_core::DEFAULT_MAX_FILTER_TERMS;
use retrieval_gate_core::PolicyCache;
use retrieval_gate_core::runtime::DEFAULT_CACHE_ENTRIES;
use serde::Deserialize;
use thiserror::Error;
use time::UtcOffset;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "retrieval-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "RETRIEVAL_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum policy cache capacity.
pub const MAX_CACHE_ENTRIES: usize = 4_096;
/// Default documents per parallel work unit.
pub const DEFAULT_CHUNK_SIZE: usize = 100;
/// Maximum documents per parallel work unit.
pub const MAX_CHUNK_SIZE: usize = 10_000;
/// Maximum number of values in one filter `terms` leaf.
pub const MAX_FILTER_TERMS: usize = 100_000;
/// Default local offset for hour and weekday checks.
const DEFAULT_UTC_OFFSET: &str = "+00:00";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Retrieval Gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetrievalGateConfig {
    /// Decision policy switches.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Advisory policy cache.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Batch evaluation settings.
    #[serde(default)]
    pub batch: BatchConfig,
    /// Filter size limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl RetrievalGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config = Self::parse(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration when one is named or present; otherwise returns defaults.
    ///
    /// An explicit path or a set `RETRIEVAL_GATE_CONFIG` must load successfully.
    /// Without either, `retrieval-gate.toml` is loaded only if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a named or present file fails to load.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if path.is_none() && env::var_os(CONFIG_ENV_VAR).is_none() {
            let default_path = Path::new(DEFAULT_CONFIG_NAME);
            if !default_path.exists() {
                return Ok(Self::default());
            }
            return Self::load(Some(default_path));
        }
        Self::load(path)
    }

    /// Parses TOML without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the TOML is malformed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy.validate()?;
        self.cache.validate()?;
        self.batch.validate()?;
        self.limits.validate()?;
        Ok(())
    }

    /// Converts the configuration into core policy settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `policy.utc_offset` is malformed.
    pub fn policy_settings(&self) -> Result<AccessPolicyConfig, ConfigError> {
        let offset = parse_utc_offset(&self.policy.utc_offset)?;
        Ok(AccessPolicyConfig {
            enabled: self.policy.enabled,
            admin_bypass: self.policy.admin_bypass,
            default_deny: self.policy.default_deny,
            audit_logging: self.policy.audit_logging,
            utc_offset_seconds: offset.whole_seconds(),
            max_filter_terms: self.limits.max_filter_terms,
        })
    }

    /// Returns the configured batch mode.
    #[must_use]
    pub const fn batch_mode(&self) -> BatchMode {
        if self.batch.parallel {
            BatchMode::Parallel {
                chunk_size: self.batch.chunk_size,
            }
        } else {
            BatchMode::Sequential
        }
    }

    /// Returns a fresh policy cache when caching is enabled.
    #[must_use]
    pub fn policy_cache(&self) -> Option<Arc<PolicyCache>> {
        self.cache.enabled.then(|| Arc::new(PolicyCache::new(self.cache.max_entries)))
    }

    /// Builds an engine wired with the configured cache, batch mode and `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is invalid.
    pub fn build_engine(
        &self,
        sink: Arc<dyn AuditSink>,
    ) -> Result<AccessControlEngine, ConfigError> {
        self.validate()?;
        let mut engine = AccessControlEngine::new(self.policy_settings()?)
            .with_audit_sink(sink)
            .with_batch_mode(self.batch_mode());
        if let Some(cache) = self.policy_cache() {
            engine = engine.with_cache(cache);
        }
        Ok(engine)
    }
}

/// Decision policy switches.
#[allow(clippy::struct_excessive_bools, reason = "Config flags mirror user-facing toggles.")]
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Globally enable permission checks.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Let admins skip all axis checks.
    #[serde(default)]
    pub admin_bypass: bool,
    /// Require every applicable axis to pass (false: any axis suffices).
    #[serde(default = "default_true")]
    pub default_deny: bool,
    /// Publish audit records to the configured sink.
    #[serde(default = "default_true")]
    pub audit_logging: bool,
    /// Local offset (`+HH:MM` / `-HH:MM`) for hour and weekday checks.
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            admin_bypass: false,
            default_deny: true,
            audit_logging: true,
            utc_offset: default_utc_offset(),
        }
    }
}

impl PolicyConfig {
    /// Validates policy configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        parse_utc_offset(&self.utc_offset).map(|_| ())
    }
}

/// Advisory policy cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Attach a policy cache to the engine.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum number of cached plans.
    #[serde(default = "default_cache_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_cache_entries(),
        }
    }
}

impl CacheConfig {
    /// Validates cache configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_range("cache.max_entries", self.max_entries, MAX_CACHE_ENTRIES)
    }
}

/// Batch evaluation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Evaluate batches on the rayon pool.
    #[serde(default)]
    pub parallel: bool,
    /// Documents per parallel work unit.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: default_chunk_size(),
        }
    }
}

impl BatchConfig {
    /// Validates batch configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_range("batch.chunk_size", self.chunk_size, MAX_CHUNK_SIZE)
    }
}

/// Filter size limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum number of values in one `terms` leaf.
    #[serde(default = "default_max_filter_terms")]
    pub max_filter_terms: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_filter_terms: default_max_filter_terms(),
        }
    }
}

impl LimitsConfig {
    /// Validates limit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_range("limits.max_filter_terms", self.max_filter_terms, MAX_FILTER_TERMS)
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Serde default for flags that are on unless disabled.
const fn default_true() -> bool {
    true
}

/// Default local offset.
fn default_utc_offset() -> String {
    DEFAULT_UTC_OFFSET.to_string()
}

/// Default policy cache capacity.
const fn default_cache_entries() -> usize {
    DEFAULT_CACHE_ENTRIES
}

/// Default documents per parallel work unit.
const fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

/// Default maximum values per `terms` leaf.
const fn default_max_filter_terms() -> usize {
    DEFAULT_MAX_FILTER_TERMS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates that `value` lies in `1..=max`.
fn validate_range(field: &str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::Invalid(format!("{field} must be between 1 and {max}")));
    }
    Ok(())
}

/// Parses a `+HH:MM` / `-HH:MM` offset.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the offset is malformed or out of range.
pub fn parse_utc_offset(value: &str) -> Result<UtcOffset, ConfigError> {
    let format = format_description!("[offset_hour sign:mandatory]:[offset_minute]");
    UtcOffset::parse(value.trim(), &format).map_err(|_| {
        ConfigError::Invalid(format!("policy.utc_offset must look like +HH:MM, got {value}"))
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_path_rejects_long_components() {
        let path = PathBuf::from("a".repeat(MAX_PATH_COMPONENT_LENGTH + 1));
        let result = validate_path(&path);
        assert!(result.is_err(), "oversized component should fail");
    }

    #[test]
    fn validate_path_accepts_relative_file() {
        assert!(validate_path(Path::new("./retrieval-gate.toml")).is_ok());
    }

    #[test]
    fn explicit_path_wins_over_defaults() {
        let resolved = resolve_path(Some(Path::new("custom.toml")));
        assert_eq!(resolved.ok(), Some(PathBuf::from("custom.toml")));
    }
}
