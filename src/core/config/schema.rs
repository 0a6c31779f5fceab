//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Values are validated after parsing: prefixes must match the tag prefix
//! grammar and log directives must parse as a tracing filter.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::ConfigError;
use crate::version::Prefix;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// prefix = "my-product@"
/// log = "gitversion=debug"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default tag prefix
    pub prefix: Option<String>,

    /// Log filter directive, in `tracing_subscriber::EnvFilter` syntax
    pub log: Option<String>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_prefix(self.prefix.as_deref())?;

        if let Some(log) = &self.log {
            EnvFilter::try_new(log).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid log directive '{}': {}", log, e))
            })?;
        }

        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// prefix = "my-product@"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Tag prefix for this repository
    pub prefix: Option<String>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_prefix(self.prefix.as_deref())
    }
}

fn validate_prefix(prefix: Option<&str>) -> Result<(), ConfigError> {
    if let Some(prefix) = prefix {
        Prefix::new(prefix).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
    }
    Ok(())
}
