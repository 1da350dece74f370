//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge stores releases in memory and allows configuring failure
//! scenarios. Every call is recorded so tests can assert on exactly which
//! API operations a run performed.
//!
//! # Example
//!
//! ```
//! use resetit::forge::mock::{MockForge, MockOperation};
//! use resetit::forge::{Forge, Release};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new().with_release(Release {
//!     id: Some(1),
//!     name: "First".to_string(),
//!     tag_name: "v1.0.0".to_string(),
//! });
//!
//! let releases = forge.list_releases().await.unwrap();
//! forge.delete_release(&releases[0]).await.unwrap();
//!
//! assert!(forge.releases().is_empty());
//! assert_eq!(forge.operations().len(), 2);
//! # });
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{Forge, ForgeError, Release};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockForge {
    name: &'static str,
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockForgeInner {
    /// Stored releases, in listing order.
    releases: Vec<Release>,
    /// Error returned by list_releases, if set.
    list_error: Option<ForgeError>,
    /// Per-tag errors returned by delete_release.
    delete_errors: Vec<(String, ForgeError)>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    ListReleases,
    DeleteRelease { tag_name: String },
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

impl MockForge {
    /// Create a new empty mock forge.
    pub fn new() -> Self {
        Self::named("mock")
    }

    /// Create a mock that reports the given forge name.
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(MockForgeInner::default())),
        }
    }

    /// Add a pre-existing release.
    pub fn with_release(self, release: Release) -> Self {
        self.inner.lock().unwrap().releases.push(release);
        self
    }

    /// Add a release with a numeric id, named after its tag.
    pub fn with_tagged_release(self, id: u64, tag_name: &str) -> Self {
        self.with_release(Release {
            id: Some(id),
            name: tag_name.to_string(),
            tag_name: tag_name.to_string(),
        })
    }

    /// Make `list_releases` fail with the given error.
    pub fn fail_list(self, error: ForgeError) -> Self {
        self.inner.lock().unwrap().list_error = Some(error);
        self
    }

    /// Make `delete_release` fail for the release attached to `tag_name`.
    pub fn fail_delete(self, tag_name: &str, error: ForgeError) -> Self {
        self.inner
            .lock()
            .unwrap()
            .delete_errors
            .push((tag_name.to_string(), error));
        self
    }

    /// Get the releases still present.
    pub fn releases(&self) -> Vec<Release> {
        self.inner.lock().unwrap().releases.clone()
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Count recorded deletions.
    pub fn delete_count(&self) -> usize {
        self.operations()
            .iter()
            .filter(|op| matches!(op, MockOperation::DeleteRelease { .. }))
            .count()
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn list_releases(&self) -> Result<Vec<Release>, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::ListReleases);

        match &inner.list_error {
            Some(error) => Err(error.clone()),
            None => Ok(inner.releases.clone()),
        }
    }

    async fn delete_release(&self, release: &Release) -> Result<(), ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::DeleteRelease {
            tag_name: release.tag_name.clone(),
        });

        if let Some((_, error)) = inner
            .delete_errors
            .iter()
            .find(|(tag, _)| *tag == release.tag_name)
        {
            return Err(error.clone());
        }

        let before = inner.releases.len();
        inner.releases.retain(|r| r.tag_name != release.tag_name);
        if inner.releases.len() == before {
            return Err(ForgeError::NotFound(format!(
                "release for tag {}",
                release.tag_name
            )));
        }
        Ok(())
    }
}
