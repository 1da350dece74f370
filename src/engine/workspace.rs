//! engine::workspace
//!
//! The transient directory a reset run clones into.
//!
//! # Invariants
//!
//! - Each run gets its own freshly created directory, uniquely named
//!   inside a parent directory; the parent and anything else in it are
//!   never touched
//! - Concurrent runs sharing a parent never see each other's directories
//! - The run directory is removed when the [`Workspace`] is dropped, on
//!   every exit path including unwinding
//! - The process working directory is never changed

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::error::ResetError;

/// Prefix of every run directory.
pub const WORKSPACE_PREFIX: &str = "resetit-";

/// Exclusively owned scratch directory for one run.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a new run directory inside `parent`.
    ///
    /// `parent` is created if missing but is otherwise left alone.
    ///
    /// # Errors
    ///
    /// Returns `ResetError::Workspace` if the parent or the run directory
    /// cannot be created.
    pub fn prepare(parent: impl Into<PathBuf>) -> Result<Self, ResetError> {
        let parent = parent.into();

        fs::create_dir_all(&parent).map_err(|e| ResetError::Workspace {
            action: "create parent of",
            path: parent.clone(),
            source: e,
        })?;

        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(&parent)
            .map_err(|e| ResetError::Workspace {
                action: "create",
                path: parent.clone(),
                source: e,
            })?;

        Ok(Self { dir })
    }

    /// The run directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory a clone of `repo_name` lands in.
    pub fn repo_dir(&self, repo_name: &str) -> PathBuf {
        self.path().join(repo_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_creates_unique_directory_inside_parent() {
        let temp = TempDir::new().unwrap();
        let parent = temp.path().join("ws");

        let ws = Workspace::prepare(&parent).unwrap();
        assert!(ws.path().is_dir());
        assert_eq!(ws.path().parent(), Some(parent.as_path()));
        let name = ws.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(WORKSPACE_PREFIX));
        assert_eq!(ws.repo_dir("proj"), ws.path().join("proj"));
    }

    #[test]
    fn existing_parent_contents_survive() {
        let temp = TempDir::new().unwrap();
        let parent = temp.path();
        fs::write(parent.join("precious.txt"), "keep me").unwrap();
        fs::create_dir_all(parent.join("project/src")).unwrap();

        {
            let ws = Workspace::prepare(parent).unwrap();
            fs::write(ws.path().join("file"), "x").unwrap();
            assert_eq!(
                fs::read_to_string(parent.join("precious.txt")).unwrap(),
                "keep me"
            );
        }

        assert_eq!(
            fs::read_to_string(parent.join("precious.txt")).unwrap(),
            "keep me"
        );
        assert!(parent.join("project/src").is_dir());
    }

    #[test]
    fn runs_sharing_a_parent_are_isolated() {
        let temp = TempDir::new().unwrap();
        let first = Workspace::prepare(temp.path()).unwrap();
        fs::create_dir_all(first.repo_dir("repo")).unwrap();

        let second = Workspace::prepare(temp.path()).unwrap();
        assert_ne!(first.path(), second.path());
        assert!(first.repo_dir("repo").is_dir());

        let second_path = second.path().to_path_buf();
        drop(first);
        assert!(second_path.is_dir());
        drop(second);
        assert!(!second_path.exists());
    }

    #[test]
    fn drop_removes_only_the_run_directory() {
        let temp = TempDir::new().unwrap();
        let path = {
            let ws = Workspace::prepare(temp.path()).unwrap();
            fs::write(ws.path().join("file"), "x").unwrap();
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
        assert!(temp.path().is_dir());
    }

    #[test]
    fn prepare_fails_when_parent_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = Workspace::prepare(blocker.join("ws")).unwrap_err();
        assert!(matches!(err, ResetError::Workspace { .. }));
        assert!(blocker.is_file());
    }
}
