//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Provider`] - Hosting provider of the remote repository
//! - [`RepositoryTarget`] - The remote repository a reset operates on
//! - [`CommitMessage`] - Non-empty message for the fresh root commit
//! - [`BranchName`] - Validated Git branch name
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so the engine never has to re-check them.
//!
//! # Examples
//!
//! ```
//! use resetit::core::types::{BranchName, CommitMessage, Provider, RepositoryTarget};
//!
//! let target = RepositoryTarget::parse(Provider::GitHub, "octocat/hello-world", "ghp_xxx").unwrap();
//! assert_eq!(target.clone_url(), "https://github.com/octocat/hello-world.git");
//!
//! assert!(BranchName::new("main").is_ok());
//! assert!(CommitMessage::new("").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Public GitLab instance, used when no base URL is configured.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error(
        "invalid repository path '{0}': use the full path format \
         (e.g., owner/repo or group/subgroup/repo)"
    )]
    InvalidRepositoryPath(String),

    #[error("invalid provider '{0}': use 'github' or 'gitlab'")]
    UnknownProvider(String),

    #[error("access token cannot be empty")]
    EmptyToken,

    #[error("commit message cannot be empty")]
    EmptyCommitMessage,
}

/// Supported hosting providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provider {
    /// github.com
    #[default]
    GitHub,
    /// gitlab.com or a self-managed GitLab instance
    GitLab,
}

impl Provider {
    /// Get all providers.
    pub fn all() -> &'static [Provider] {
        &[Provider::GitHub, Provider::GitLab]
    }

    /// Get the provider name as used on the command line and in config files.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::GitHub => "github",
            Provider::GitLab => "gitlab",
        }
    }

    /// Parse a provider name, case-insensitively.
    ///
    /// ```
    /// use resetit::core::types::Provider;
    ///
    /// assert_eq!(Provider::parse("GitLab"), Some(Provider::GitLab));
    /// assert_eq!(Provider::parse("bitbucket"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "github" => Some(Provider::GitHub),
            "gitlab" => Some(Provider::GitLab),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Provider {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TypeError::UnknownProvider(s.to_string()))
    }
}

/// The remote repository a reset operates on.
///
/// `owner_path` is everything before the last `/` of the repository path
/// (it may itself contain `/` for nested GitLab groups) and `repo_name`
/// is the final segment. Both are guaranteed non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    provider: Provider,
    owner_path: String,
    repo_name: String,
    token: String,
    base_url: Option<String>,
    dry_run: bool,
}

// Custom Debug to avoid exposing the token
impl fmt::Debug for RepositoryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryTarget")
            .field("provider", &self.provider)
            .field("owner_path", &self.owner_path)
            .field("repo_name", &self.repo_name)
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl RepositoryTarget {
    /// Build a target from a slash-separated repository path.
    ///
    /// # Errors
    ///
    /// - `InvalidRepositoryPath` if the path has fewer than two segments or
    ///   any segment is empty
    /// - `EmptyToken` if the token is empty
    pub fn parse(
        provider: Provider,
        repo_path: &str,
        token: impl Into<String>,
    ) -> Result<Self, TypeError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(TypeError::EmptyToken);
        }

        let trimmed = repo_path.trim().trim_matches('/');
        let (owner_path, repo_name) = trimmed
            .rsplit_once('/')
            .ok_or_else(|| TypeError::InvalidRepositoryPath(repo_path.to_string()))?;

        if owner_path.split('/').any(str::is_empty) || repo_name.is_empty() {
            return Err(TypeError::InvalidRepositoryPath(repo_path.to_string()));
        }

        Ok(Self {
            provider,
            owner_path: owner_path.to_string(),
            repo_name: repo_name.to_string(),
            token,
            base_url: match provider {
                Provider::GitHub => None,
                Provider::GitLab => Some(DEFAULT_GITLAB_URL.to_string()),
            },
            dry_run: false,
        })
    }

    /// Set the GitLab base URL (self-managed instances).
    ///
    /// Ignored for GitHub, which always uses the public endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        if self.provider == Provider::GitLab {
            let url = base_url.into();
            self.base_url = Some(url.trim_end_matches('/').to_string());
        }
        self
    }

    /// Enable or disable dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Get the hosting provider.
    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Get the owner or group path (everything before the repository name).
    pub fn owner_path(&self) -> &str {
        &self.owner_path
    }

    /// Get the repository name.
    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    /// Get the access token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Get the GitLab base URL (`None` for GitHub).
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Whether remote mutations are suppressed.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Get the combined `owner/.../repo` path.
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.owner_path, self.repo_name)
    }

    /// Build the HTTPS clone URL.
    ///
    /// The token is never embedded; pushing relies on the user's
    /// credential helper.
    pub fn clone_url(&self) -> String {
        match self.provider {
            Provider::GitHub => format!(
                "https://github.com/{}/{}.git",
                self.owner_path, self.repo_name
            ),
            Provider::GitLab => format!(
                "{}/{}/{}.git",
                self.base_url.as_deref().unwrap_or(DEFAULT_GITLAB_URL),
                self.owner_path,
                self.repo_name
            ),
        }
    }
}

/// Message for the new root commit. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage(String);

impl CommitMessage {
    /// Create a commit message.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::EmptyCommitMessage` for empty or whitespace-only input.
    pub fn new(message: impl Into<String>) -> Result<Self, TypeError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(TypeError::EmptyCommitMessage);
        }
        Ok(Self(message))
    }

    /// Get the message as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated Git branch name.
///
/// Branch names must conform to Git's refname rules (see `git check-ref-format`):
/// - Cannot be empty
/// - Cannot start with `.` or `-`
/// - Cannot end with `.lock` or `/`
/// - Cannot contain `..`, `@{`, `//`, or ASCII control characters
/// - Cannot contain spaces, `~`, `^`, `:`, `\`, `?`, `*`, `[`
/// - Cannot be exactly `@`
///
/// # Example
///
/// ```
/// use resetit::core::types::BranchName;
///
/// let name = BranchName::new("main").unwrap();
/// assert_eq!(name.as_str(), "main");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new("-main").is_err());
/// assert!(BranchName::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// The conventional primary branch, `main`.
    pub fn main() -> Self {
        Self("main".to_string())
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        let reject = |why: &str| Err(TypeError::InvalidBranchName(format!("'{}' {}", name, why)));

        if name.is_empty() {
            return reject("is empty");
        }
        if name == "@" {
            return reject("is reserved");
        }
        if name.starts_with('.') || name.starts_with('-') {
            return reject("cannot start with '.' or '-'");
        }
        if name.ends_with(".lock") || name.ends_with('/') {
            return reject("cannot end with '.lock' or '/'");
        }
        if name.contains("..") || name.contains("@{") || name.contains("//") {
            return reject("cannot contain '..', '@{' or '//'");
        }
        if name
            .chars()
            .any(|c| c.is_ascii_control() || " ~^:\\?*[".contains(c))
        {
            return reject("contains a forbidden character");
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
