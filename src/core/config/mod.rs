//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! gitversion has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! Configuration is a binary concern. The library resolves whatever prefix
//! it is handed and never reads these files itself.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$GITVERSION_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitversion/config.toml`
//! 3. `~/.gitversion/config.toml`
//!
//! # Repo Config Locations
//!
//! Searched in order:
//! 1. `.gitversion.toml` in the working tree root (committed with the project)
//! 2. `.git/gitversion/config.toml` (local to one clone)
//!
//! # Example
//!
//! ```no_run
//! use gitversion::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/repo"))).unwrap();
//! println!("Prefix: {:?}", result.config.prefix());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, RepoConfig};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Environment variable naming an explicit global config file.
pub const CONFIG_ENV: &str = "GITVERSION_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence automatically: repo config overrides global
/// config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo)
    pub repo: Option<RepoConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `repo_root` is provided, also loads repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be read, parsed,
    /// or validated. Missing config files are not an error.
    pub fn load(repo_root: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        Self::load_from(&Self::global_candidates(), repo_root)
    }

    /// Load configuration, taking the first existing global candidate.
    pub fn load_from(
        global_candidates: &[PathBuf],
        repo_root: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = match global_candidates.iter().find(|p| p.is_file()) {
            Some(path) => (read_config::<GlobalConfig>(path)?, Some(path.clone())),
            None => (GlobalConfig::default(), None),
        };

        let (repo, repo_path) = match repo_root {
            Some(root) => Self::load_repo(root, &mut warnings)?,
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                repo,
                global_path,
                repo_path,
            },
            warnings,
        })
    }

    /// Global config locations, in search order.
    pub fn global_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            candidates.push(PathBuf::from(path));
        }
        if let Some(xdg_home) = std::env::var_os("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("gitversion/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".gitversion/config.toml"));
        }
        candidates
    }

    /// Load repository configuration from standard locations.
    fn load_repo(
        repo_root: &Path,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(Option<RepoConfig>, Option<PathBuf>), ConfigError> {
        let shared = Self::repo_config_path(repo_root);
        let local = Self::local_config_path(repo_root);

        if shared.is_file() {
            if local.is_file() {
                warnings.push(ConfigWarning {
                    message: format!("Ignoring config file; '{}' takes precedence", shared.display()),
                    path: local,
                });
            }
            let config = read_config::<RepoConfig>(&shared)?;
            return Ok((Some(config), Some(shared)));
        }

        if local.is_file() {
            let config = read_config::<RepoConfig>(&local)?;
            return Ok((Some(config), Some(local)));
        }

        Ok((None, None))
    }

    /// Path of the committed repo config: `.gitversion.toml` in the root.
    pub fn repo_config_path(repo_root: &Path) -> PathBuf {
        repo_root.join(".gitversion.toml")
    }

    /// Path of the clone-local repo config under `.git`.
    pub fn local_config_path(repo_root: &Path) -> PathBuf {
        repo_root.join(".git/gitversion/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Get the configured tag prefix.
    ///
    /// Repo config wins over global config; `None` if neither sets one.
    pub fn prefix(&self) -> Option<&str> {
        self.repo
            .as_ref()
            .and_then(|r| r.prefix.as_deref())
            .or(self.global.prefix.as_deref())
    }

    /// Get the configured log filter directive.
    pub fn log(&self) -> Option<&str> {
        self.global.log.as_deref()
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

/// Read and parse a config file.
fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn load_empty_defaults() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");

        let result = Config::load_from(&[missing], Some(temp.path())).unwrap();

        assert_eq!(result.config.prefix(), None);
        assert_eq!(result.config.log(), None);
        assert!(result.config.global_config_loaded_from().is_none());
        assert!(result.config.repo_config_loaded_from().is_none());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn first_existing_global_candidate_wins() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("a/config.toml");
        let second = temp.path().join("b/config.toml");
        write(&second, "prefix = \"second@\"");

        let candidates = [first.clone(), second.clone()];
        let result = Config::load_from(&candidates, None).unwrap();
        assert_eq!(result.config.prefix(), Some("second@"));
        assert_eq!(result.config.global_config_loaded_from(), Some(second.as_path()));

        write(&first, "prefix = \"first@\"\nlog = \"debug\"");
        let result = Config::load_from(&candidates, None).unwrap();
        assert_eq!(result.config.prefix(), Some("first@"));
        assert_eq!(result.config.log(), Some("debug"));
    }

    #[test]
    fn load_repo_config() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join(".gitversion.toml"), "prefix = \"my-product@\"");

        let result = Config::load_from(&[], Some(temp.path())).unwrap();

        assert_eq!(result.config.prefix(), Some("my-product@"));
        assert_eq!(
            result.config.repo_config_loaded_from(),
            Some(Config::repo_config_path(temp.path()).as_path())
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn load_local_repo_config() {
        let temp = TempDir::new().unwrap();
        write(&Config::local_config_path(temp.path()), "prefix = \"local@\"");

        let result = Config::load_from(&[], Some(temp.path())).unwrap();
        assert_eq!(result.config.prefix(), Some("local@"));
    }

    #[test]
    fn shared_repo_config_shadows_local_and_warns() {
        let temp = TempDir::new().unwrap();
        write(&Config::repo_config_path(temp.path()), "prefix = \"shared@\"");
        write(&Config::local_config_path(temp.path()), "prefix = \"local@\"");

        let result = Config::load_from(&[], Some(temp.path())).unwrap();

        assert_eq!(result.config.prefix(), Some("shared@"));
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].path, Config::local_config_path(temp.path()));
    }

    #[test]
    fn invalid_prefix_rejected() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join(".gitversion.toml"), "prefix = \"1.0@\"");

        let err = Config::load_from(&[], Some(temp.path())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        write(
            &temp.path().join(".gitversion.toml"),
            r#"
            prefix = "foo@"
            unknown_field = true
            "#,
        );

        let err = Config::load_from(&[], Some(temp.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn precedence_repo_overrides_global() {
        let config = Config {
            global: GlobalConfig {
                prefix: Some("global@".to_string()),
                log: None,
            },
            repo: Some(RepoConfig {
                prefix: Some("repo@".to_string()),
            }),
            global_path: None,
            repo_path: None,
        };
        assert_eq!(config.prefix(), Some("repo@"));

        let config = Config {
            repo: Some(RepoConfig::default()),
            ..config
        };
        assert_eq!(config.prefix(), Some("global@"));
    }
}
