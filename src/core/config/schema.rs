//! core::config::schema
//!
//! Configuration schema types.
//!
//! Located at (in order of precedence):
//! 1. `$RESETIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/resetit/config.toml`
//! 3. `~/.resetit/config.toml`
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., branch must be a valid branch name).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::{BranchName, Provider};

/// User configuration file.
///
/// # Example
///
/// ```toml
/// provider = "gitlab"
/// gitlab_url = "https://gitlab.example.com"
/// branch = "main"
/// message = "Initial commit"
/// interactive = true
/// command_timeout_secs = 600
/// http_timeout_secs = 30
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Default provider ("github" or "gitlab")
    pub provider: Option<String>,

    /// GitLab instance URL
    pub gitlab_url: Option<String>,

    /// Primary branch to rewrite
    pub branch: Option<String>,

    /// Default commit message for non-interactive runs
    pub message: Option<String>,

    /// Default interactive mode
    pub interactive: Option<bool>,

    /// Per git command timeout
    pub command_timeout_secs: Option<u64>,

    /// Per HTTP request timeout
    pub http_timeout_secs: Option<u64>,

    /// Parent directory for per-run temporary clones
    pub workspace: Option<PathBuf>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(provider) = &self.provider {
            if Provider::parse(provider).is_none() {
                let names: Vec<_> = Provider::all().iter().map(Provider::name).collect();
                return Err(ConfigError::InvalidValue(format!(
                    "invalid provider '{}', must be one of: {}",
                    provider,
                    names.join(", ")
                )));
            }
        }

        if let Some(url) = &self.gitlab_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "gitlab_url must be an http(s) URL, got '{}'",
                    url
                )));
            }
        }

        if let Some(branch) = &self.branch {
            BranchName::new(branch.as_str())
                .map_err(|e| ConfigError::InvalidValue(format!("invalid branch: {}", e)))?;
        }

        if let Some(message) = &self.message {
            if message.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "message cannot be empty".to_string(),
                ));
            }
        }

        for (key, value) in [
            ("command_timeout_secs", self.command_timeout_secs),
            ("http_timeout_secs", self.http_timeout_secs),
        ] {
            if value == Some(0) {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must be greater than zero",
                    key
                )));
            }
        }

        if let Some(workspace) = &self.workspace {
            if workspace.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "workspace cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(FileConfig::default().validate().is_ok());
    }

    #[test]
    fn parses_full_file() {
        let toml = r#"
            provider = "GitLab"
            gitlab_url = "https://gitlab.example.com"
            branch = "trunk"
            message = "chore: squash"
            interactive = false
            command_timeout_secs = 120
            http_timeout_secs = 10
            workspace = "/tmp/resetit"
        "#;
        let config: FileConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider.as_deref(), Some("GitLab"));
        assert_eq!(config.branch.as_deref(), Some("trunk"));
        assert_eq!(config.interactive, Some(false));
        assert_eq!(config.command_timeout_secs, Some(120));
        assert_eq!(config.workspace, Some(PathBuf::from("/tmp/resetit")));
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<FileConfig, _> = toml::from_str("colour = true");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_provider() {
        let config = FileConfig {
            provider: Some("bitbucket".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(msg)) if msg.contains("bitbucket")
        ));
    }

    #[test]
    fn rejects_invalid_branch() {
        let config = FileConfig {
            branch: Some("bad..name".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = FileConfig {
            http_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_blank_message() {
        let config = FileConfig {
            message: Some("   ".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_http_gitlab_url() {
        let config = FileConfig {
            gitlab_url: Some("gitlab.example.com".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
