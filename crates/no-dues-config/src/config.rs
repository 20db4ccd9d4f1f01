// crates/no-dues-config/src/config.rs
// ============================================================================
// Module: No Dues Configuration
// Description: Configuration loading and validation for the No Dues workflow.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: no-dues-core, no-dues-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional and falls back to defaults, but whatever is
//! present must validate: duplicate or empty department codes, a file audit
//! sink without a path, or a malformed certificate prefix all fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use no_dues_core::CertificateNumbering;
use no_dues_core::CertificateServiceConfig;
use no_dues_core::DEFAULT_CERTIFICATE_PREFIX;
use no_dues_core::Department;
use no_dues_core::DepartmentCode;
use no_dues_core::DepartmentRegistry;
use no_dues_store_sqlite::SqliteStoreConfig;
use no_dues_store_sqlite::SqliteStoreMode;
use no_dues_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "no-dues.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "NO_DUES_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of departments in a registry.
const MAX_DEPARTMENTS: usize = 256;
/// Maximum length of a department code.
const MAX_DEPARTMENT_CODE_LENGTH: usize = 64;
/// Maximum length of a certificate number prefix.
const MAX_PREFIX_LENGTH: usize = 16;
/// Default `SQLite` busy timeout (ms).
const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level No Dues configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoDuesConfig {
    /// Departments every new certificate must clear.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Certificate store backend.
    #[serde(default)]
    pub store: StoreConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Certificate numbering.
    #[serde(default)]
    pub numbering: NumberingConfig,
    /// Optional roster backing the in-memory collaborators.
    #[serde(default)]
    pub roster: RosterConfig,
}

impl NoDuesConfig {
    /// Loads configuration from disk using the default resolution rules:
    /// the explicit path, then `NO_DUES_CONFIG`, then `no-dues.toml` in the
    /// working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let content = read_bounded_utf8(&resolved, "config")?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.registry.validate()?;
        self.store.validate()?;
        self.audit.validate()?;
        self.numbering.validate()?;
        self.roster.validate()
    }

    /// Builds the certificate service configuration.
    #[must_use]
    pub fn service_config(&self) -> CertificateServiceConfig {
        CertificateServiceConfig {
            registry: self.registry.to_registry(),
            numbering: self.numbering.to_numbering(),
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// One configured department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepartmentEntry {
    /// Department code (normalized to upper case).
    pub code: String,
    /// Display name.
    pub name: String,
}

/// Department registry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Configured departments; the institution default applies when unset.
    #[serde(default)]
    pub departments: Option<Vec<DepartmentEntry>>,
}

impl RegistryConfig {
    /// Validates department entries.
    fn validate(&self) -> Result<(), ConfigError> {
        let Some(departments) = &self.departments else {
            return Ok(());
        };
        if departments.len() > MAX_DEPARTMENTS {
            return Err(ConfigError::Invalid(format!(
                "registry.departments exceeds {MAX_DEPARTMENTS} entries"
            )));
        }
        let mut seen = BTreeSet::new();
        for entry in departments {
            let code = entry.code.trim();
            if code.is_empty() {
                return Err(ConfigError::Invalid(
                    "registry.departments code must be non-empty".to_string(),
                ));
            }
            if code.len() > MAX_DEPARTMENT_CODE_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "registry.departments code {code} exceeds max length"
                )));
            }
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "registry.departments name for {code} must be non-empty"
                )));
            }
            let normalized = DepartmentCode::new(code);
            if !seen.insert(normalized.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "registry.departments duplicate code {normalized}"
                )));
            }
        }
        Ok(())
    }

    /// Builds the department registry.
    #[must_use]
    pub fn to_registry(&self) -> DepartmentRegistry {
        self.departments.as_ref().map_or_else(DepartmentRegistry::institution_default, |entries| {
            DepartmentRegistry::new(
                entries.iter().map(|entry| Department::new(&entry.code, entry.name.trim())).collect(),
            )
        })
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Certificate store backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Use the in-memory store.
    #[default]
    Memory,
    /// Use the `SQLite`-backed durable store.
    Sqlite,
}

/// Certificate store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Validates store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            StoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid("memory store must not set path".to_string()));
                }
                Ok(())
            }
            StoreType::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires path".to_string())
                })?;
                validate_path_string("store.path", &path.to_string_lossy())?;
                if self.busy_timeout_ms == 0 {
                    return Err(ConfigError::Invalid(
                        "store.busy_timeout_ms must be greater than zero".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Returns the `SQLite` configuration when the sqlite backend is selected.
    #[must_use]
    pub fn sqlite_config(&self) -> Option<SqliteStoreConfig> {
        match (self.store_type, &self.path) {
            (StoreType::Sqlite, Some(path)) => Some(SqliteStoreConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
            }),
            _ => None,
        }
    }
}

/// Returns the default store busy timeout.
const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkType {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Audit disabled.
    None,
}

/// Audit configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink type.
    #[serde(default)]
    pub sink: AuditSinkType,
    /// Audit log path for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkType::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkType::File, None) => {
                Err(ConfigError::Invalid("audit.sink = \"file\" requires audit.path".to_string()))
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid with audit.sink = \"file\"".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Numbering
// ============================================================================

/// Certificate numbering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberingConfig {
    /// Certificate number prefix.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

impl NumberingConfig {
    /// Validates the prefix.
    fn validate(&self) -> Result<(), ConfigError> {
        let length = self.prefix.len();
        if length == 0 || length > MAX_PREFIX_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "numbering.prefix must be 1..={MAX_PREFIX_LENGTH} characters"
            )));
        }
        if !self.prefix.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(ConfigError::Invalid(
                "numbering.prefix must be ascii alphanumeric".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the numbering strategy.
    #[must_use]
    pub fn to_numbering(&self) -> CertificateNumbering {
        CertificateNumbering::new(self.prefix.clone())
    }
}

/// Returns the default certificate number prefix.
fn default_prefix() -> String {
    DEFAULT_CERTIFICATE_PREFIX.to_string()
}

// ============================================================================
// SECTION: Roster
// ============================================================================

/// Roster file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterConfig {
    /// Path to a JSON roster of students, dues and e-signatures.
    #[serde(default)]
    pub path: Option<String>,
}

impl RosterConfig {
    /// Validates the roster path.
    fn validate(&self) -> Result<(), ConfigError> {
        match &self.path {
            Some(path) => validate_path_string("roster.path", path),
            None => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML or JSON parsing error.
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

/// Validates a resolved path against security limits.
pub(crate) fn validate_path(path: &Path) -> Result<(), ConfigError> {
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

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Reads a file as UTF-8 text, enforcing the config size limit.
pub(crate) fn read_bounded_utf8(path: &Path, label: &str) -> Result<String, ConfigError> {
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(format!("{label}: {err}")))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid(format!("{label} file exceeds size limit")));
    }
    String::from_utf8(bytes)
        .map_err(|_| ConfigError::Invalid(format!("{label} file must be utf-8")))
}
