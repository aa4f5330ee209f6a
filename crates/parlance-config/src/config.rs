// crates/parlance-config/src/config.rs
// ============================================================================
// Module: Parlance Configuration
// Description: Configuration loading and validation for parlance.toml.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: parlance-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown fields and contradictory settings are rejected rather than ignored,
//! so a typo never silently selects a default policy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use parlance_core::ArgumentAdapter;
use parlance_core::ArgumentPolicy;
use parlance_core::BindingAuditSink;
use parlance_core::ComponentTransformer;
use parlance_core::FileAuditSink;
use parlance_core::FormatStyle;
use parlance_core::InvocationConfiguration;
use parlance_core::KeyPolicy;
use parlance_core::NameResolver;
use parlance_core::NoopAuditSink;
use parlance_core::ResultPolicy;
use parlance_core::StderrAuditSink;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "parlance.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "PARLANCE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Parlance dispatcher configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParlanceConfig {
    /// Argument adaptation settings.
    #[serde(default)]
    pub arguments: ArgumentsConfig,
    /// Result transformation settings.
    #[serde(default)]
    pub result: ResultConfig,
    /// Binding audit settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ParlanceConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path);
        check_path_limits("config path", &resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
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
        self.arguments.validate()?;
        self.audit.validate()
    }

    /// Builds the policy set this configuration describes.
    ///
    /// Keys always come from declared metadata; `adapter` backs argument
    /// adaptation and `transformer` backs the standard result mode.
    #[must_use]
    pub fn invocation_configuration(
        &self,
        adapter: ArgumentAdapter,
        transformer: ComponentTransformer,
    ) -> InvocationConfiguration {
        let argument_policy = match self.arguments.style {
            ArgumentStyle::Positional => ArgumentPolicy::positional(adapter),
            ArgumentStyle::Named => {
                ArgumentPolicy::named(adapter, self.arguments.names.unwrap_or_default().resolver())
            }
        };
        let result_policy = match self.result.mode {
            ResultMode::NoOperation => ResultPolicy::NoOperation,
            ResultMode::Standard => ResultPolicy::Standard(transformer),
        };
        InvocationConfiguration::new(KeyPolicy::Declared, argument_policy, result_policy)
    }

    /// Opens the configured binding audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn audit_sink(&self) -> Result<Box<dyn BindingAuditSink>, ConfigError> {
        match (self.audit.sink, self.audit.path.as_deref()) {
            (AuditSinkKind::None, _) => Ok(Box::new(NoopAuditSink)),
            (AuditSinkKind::Stderr, _) => Ok(Box::new(StderrAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Box::new(sink))
            }
            (AuditSinkKind::File, None) => Err(ConfigError::Invalid(
                "audit.path is required when audit.sink is file".to_string(),
            )),
        }
    }
}

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// Argument adaptation settings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgumentsConfig {
    /// Formatting style of the message templates.
    #[serde(default)]
    pub style: ArgumentStyle,
    /// Name resolution for named style; unset means declared names only.
    #[serde(default)]
    pub names: Option<NameStyle>,
}

impl ArgumentsConfig {
    /// Validates argument settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.style == ArgumentStyle::Positional && self.names.is_some() {
            return Err(ConfigError::Invalid(
                "arguments.names is only valid with named style".to_string(),
            ));
        }
        Ok(())
    }
}

/// Formatting style selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentStyle {
    /// Named placeholders, tags, and targets.
    #[default]
    Named,
    /// Index-based placeholders.
    Positional,
}

impl From<ArgumentStyle> for FormatStyle {
    fn from(style: ArgumentStyle) -> Self {
        match style {
            ArgumentStyle::Named => Self::Named,
            ArgumentStyle::Positional => Self::Positional,
        }
    }
}

/// Name resolution selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameStyle {
    /// Explicit parameter names only.
    #[default]
    Declared,
    /// Explicit names, then the snake-cased identifier.
    DeclaredOrIdentifier,
}

impl NameStyle {
    /// Returns the resolver for this selector.
    #[must_use]
    pub const fn resolver(self) -> NameResolver {
        match self {
            Self::Declared => NameResolver::Declared,
            Self::DeclaredOrIdentifier => NameResolver::DeclaredOrIdentifier,
        }
    }
}

// ============================================================================
// SECTION: Result
// ============================================================================

/// Result transformation settings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResultConfig {
    /// Result mode.
    #[serde(default)]
    pub mode: ResultMode,
}

/// Result mode selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultMode {
    /// Return the node unchanged.
    #[default]
    NoOperation,
    /// Apply registered transformers.
    Standard,
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Binding audit settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink selector.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, self.path.as_deref()) {
            (AuditSinkKind::File, Some(path)) => {
                check_path_limits("audit.path", Path::new(path.trim()))
            }
            (AuditSinkKind::File, None) => Err(ConfigError::Invalid(
                "audit.path is required when audit.sink is file".to_string(),
            )),
            (AuditSinkKind::None | AuditSinkKind::Stderr, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid when audit.sink is file".to_string(),
            )),
            (AuditSinkKind::None | AuditSinkKind::Stderr, None) => Ok(()),
        }
    }
}

/// Audit sink selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
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

/// Picks the config path: the caller's, then `PARLANCE_CONFIG`, then
/// `parlance.toml` in the working directory.
fn resolve_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Checks a path against the length limits; `label` names it in errors.
fn check_path_limits(label: &str, path: &Path) -> Result<(), ConfigError> {
    let length = path.as_os_str().len();
    if length == 0 {
        return Err(ConfigError::Invalid(format!("{label} must be non-empty")));
    }
    if length > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{label} exceeds max length")));
    }
    let oversized = path
        .components()
        .any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH);
    if oversized {
        return Err(ConfigError::Invalid(format!("{label} component too long")));
    }
    Ok(())
}
