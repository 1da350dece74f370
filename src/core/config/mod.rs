//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$RESETIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/resetit/config.toml`
//! 3. `~/.resetit/config.toml`
//!
//! A missing file is not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use resetit::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("Branch: {}", config.branch());
//! println!("Provider: {}", config.provider());
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::types::{Provider, DEFAULT_GITLAB_URL};

/// Default primary branch.
pub const DEFAULT_BRANCH: &str = "main";

/// Default commit message for non-interactive runs.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Initial commit";

/// Default per-command timeout for git invocations.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);

/// Default per-request timeout for provider API calls.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

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

/// Loaded configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Raw file contents (all keys optional)
    pub file: FileConfig,
    /// Path the file was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated.
    pub fn load() -> Result<Self, ConfigError> {
        let located = Self::locate(|key| std::env::var(key).ok(), dirs::home_dir());
        match located {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Find the first existing config file.
    ///
    /// `env` looks up environment variables; `home` is the user's home
    /// directory. Both are parameters so lookup can be tested without
    /// touching the process environment.
    pub fn locate(
        env: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Option<PathBuf> {
        let candidates = [
            env("RESETIT_CONFIG").map(PathBuf::from),
            env("XDG_CONFIG_HOME").map(|xdg| PathBuf::from(xdg).join("resetit/config.toml")),
            home.map(|h| h.join(".resetit/config.toml")),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }

    /// Path the configuration was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the default provider.
    ///
    /// Defaults to GitHub if not configured.
    pub fn provider(&self) -> Provider {
        self.file
            .provider
            .as_deref()
            .and_then(Provider::parse)
            .unwrap_or_default()
    }

    /// Get the GitLab base URL.
    pub fn gitlab_url(&self) -> &str {
        self.file.gitlab_url.as_deref().unwrap_or(DEFAULT_GITLAB_URL)
    }

    /// Get the primary branch name.
    pub fn branch(&self) -> &str {
        self.file.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    /// Get the default commit message.
    pub fn message(&self) -> &str {
        self.file.message.as_deref().unwrap_or(DEFAULT_COMMIT_MESSAGE)
    }

    /// Check if interactive mode is enabled by default.
    ///
    /// Defaults to `true` if not configured.
    pub fn interactive(&self) -> bool {
        self.file.interactive.unwrap_or(true)
    }

    /// Get the per git command timeout.
    pub fn command_timeout(&self) -> Duration {
        self.file
            .command_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_COMMAND_TIMEOUT)
    }

    /// Get the per HTTP request timeout.
    pub fn http_timeout(&self) -> Duration {
        self.file
            .http_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT)
    }

    /// Get the parent directory for per-run workspaces.
    pub fn workspace(&self) -> PathBuf {
        self.file.workspace.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &PathBuf)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.display().to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.provider(), Provider::GitHub);
        assert_eq!(config.gitlab_url(), "https://gitlab.com");
        assert_eq!(config.branch(), "main");
        assert_eq!(config.message(), "Initial commit");
        assert!(config.interactive());
        assert_eq!(config.command_timeout(), DEFAULT_COMMAND_TIMEOUT);
        assert_eq!(config.http_timeout(), DEFAULT_HTTP_TIMEOUT);
        assert_eq!(config.workspace(), std::env::temp_dir());
        assert!(config.path().is_none());
    }

    #[test]
    fn load_from_applies_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "provider = \"gitlab\"\nbranch = \"master\"\nhttp_timeout_secs = 5\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.provider(), Provider::GitLab);
        assert_eq!(config.branch(), "master");
        assert_eq!(config.http_timeout(), Duration::from_secs(5));
        assert_eq!(config.path(), Some(path.as_path()));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "provider = ").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn load_from_reports_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "provider = \"svn\"\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn load_from_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load_from(&dir.path().join("nope.toml")),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn locate_prefers_explicit_env() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("explicit.toml");
        fs::write(&explicit, "").unwrap();
        fs::create_dir_all(dir.path().join(".resetit")).unwrap();
        fs::write(dir.path().join(".resetit/config.toml"), "").unwrap();

        let found = Config::locate(
            env_from(&[("RESETIT_CONFIG", &explicit)]),
            Some(dir.path().to_path_buf()),
        );
        assert_eq!(found, Some(explicit));
    }

    #[test]
    fn locate_uses_xdg_then_home() {
        let dir = TempDir::new().unwrap();
        let xdg = dir.path().join("xdg");
        fs::create_dir_all(xdg.join("resetit")).unwrap();
        fs::write(xdg.join("resetit/config.toml"), "").unwrap();

        let found = Config::locate(env_from(&[("XDG_CONFIG_HOME", &xdg)]), None);
        assert_eq!(found, Some(xdg.join("resetit/config.toml")));

        let home = dir.path().join("home");
        fs::create_dir_all(home.join(".resetit")).unwrap();
        fs::write(home.join(".resetit/config.toml"), "").unwrap();

        let found = Config::locate(|_| None, Some(home.clone()));
        assert_eq!(found, Some(home.join(".resetit/config.toml")));
    }

    #[test]
    fn locate_skips_missing_candidates() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let found = Config::locate(
            env_from(&[("RESETIT_CONFIG", &missing)]),
            Some(dir.path().to_path_buf()),
        );
        assert_eq!(found, None);
    }
}
