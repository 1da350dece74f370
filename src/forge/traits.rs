//! forge::traits
//!
//! Forge trait definition for the release APIs of hosting services.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! A forge is bound to one repository when it is constructed, so callers
//! never pass owner/project paths around; the GitHub and GitLab specifics
//! (numeric ids versus tag-keyed releases, path encoding) stay inside the
//! implementations.
//!
//! # Example
//!
//! ```ignore
//! use resetit::forge::{Forge, ForgeError};
//!
//! async fn purge(forge: &dyn Forge) -> Result<(), ForgeError> {
//!     for release in forge.list_releases().await? {
//!         forge.delete_release(&release).await?;
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with remote hosting services like GitHub and GitLab.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForgeError {
    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error (including request timeouts).
    #[error("network error: {0}")]
    NetworkError(String),

    /// The forge could not be configured (bad base URL, unusable token).
    #[error("invalid forge configuration: {0}")]
    InvalidConfig(String),

    /// A release lacks the identifier this forge deletes by.
    #[error("release '{0}' has no identifier")]
    MissingReleaseId(String),
}

/// A hosted release, in provider-neutral form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Numeric id (GitHub); `None` where releases are keyed by tag (GitLab)
    pub id: Option<u64>,
    /// Display name (may be empty)
    pub name: String,
    /// Tag the release is attached to
    pub tag_name: String,
}

impl Release {
    /// Name to show to users, falling back to the tag when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.tag_name
        } else {
            &self.name
        }
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(
                f,
                "Release {}: {} (tag: {})",
                id,
                self.display_name(),
                self.tag_name
            ),
            None => write!(
                f,
                "Release: {} (tag: {})",
                self.display_name(),
                self.tag_name
            ),
        }
    }
}

/// The Forge trait for the release API of a hosting service.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. A failed listing means the
/// set of releases is unknown; a failed deletion concerns one release only.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github", "gitlab").
    fn name(&self) -> &'static str;

    /// List every release of the repository.
    ///
    /// Implementations follow pagination to the end; a partial list is
    /// never returned.
    ///
    /// # Errors
    ///
    /// - `AuthFailed` if the token is invalid or lacks permissions
    /// - `NotFound` if the repository does not exist
    async fn list_releases(&self) -> Result<Vec<Release>, ForgeError>;

    /// Delete one release.
    ///
    /// # Errors
    ///
    /// - `MissingReleaseId` if the release lacks the key this forge needs
    /// - `NotFound` if the release no longer exists
    async fn delete_release(&self, release: &Release) -> Result<(), ForgeError>;
}
