//! forge::factory
//!
//! Forge selection and creation.
//!
//! # Design
//!
//! This module is the one place that maps a [`Provider`] to a concrete
//! forge. Callers receive a `Box<dyn Forge>` built once per run and never
//! branch on the provider again.
//!
//! # Example
//!
//! ```
//! use resetit::core::types::{Provider, RepositoryTarget};
//! use resetit::forge::create_forge;
//! use std::time::Duration;
//!
//! let target = RepositoryTarget::parse(Provider::GitLab, "team/sub/proj", "glpat-xxx").unwrap();
//! let forge = create_forge(&target, Duration::from_secs(30)).unwrap();
//! assert_eq!(forge.name(), "gitlab");
//! ```

use std::time::Duration;

use super::github::GitHubForge;
use super::gitlab::GitLabForge;
use super::traits::{Forge, ForgeError};
use crate::core::types::{Provider, RepositoryTarget, DEFAULT_GITLAB_URL};

/// Create the release client for a repository target.
///
/// GitHub is addressed by owner and repository name; GitLab by the
/// combined project path on the target's base URL.
///
/// # Errors
///
/// Returns `ForgeError::InvalidConfig` if the client cannot be built
/// (e.g., an unparseable GitLab base URL).
pub fn create_forge(
    target: &RepositoryTarget,
    timeout: Duration,
) -> Result<Box<dyn Forge>, ForgeError> {
    match target.provider() {
        Provider::GitHub => {
            let forge = GitHubForge::new(
                target.token(),
                target.owner_path(),
                target.repo_name(),
                timeout,
            )?;
            Ok(Box::new(forge))
        }
        Provider::GitLab => {
            let forge = GitLabForge::new(
                target.token(),
                target.base_url().unwrap_or(DEFAULT_GITLAB_URL),
                target.full_path(),
                timeout,
            )?;
            Ok(Box::new(forge))
        }
    }
}
