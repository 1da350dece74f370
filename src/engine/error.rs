//! engine::error
//!
//! Fatal errors of a reset run.
//!
//! # Design
//!
//! Only failures that stop the run are errors. Tolerated failures (old
//! branch deletion, single tag or release deletions) are reported as
//! [`ResetWarning`](super::events::ResetWarning) values instead, so a
//! `Result` of `Err` always means "the run stopped here".

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::forge::ForgeError;
use crate::git::CommandError;

/// A fatal git step of the reset workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    Clone,
    CreateOrphanBranch,
    StageFiles,
    Commit,
    RenameBranch,
    ListTags,
    ForcePush,
}

impl ResetStep {
    /// Short human description of the step.
    pub fn describe(&self) -> &'static str {
        match self {
            ResetStep::Clone => "clone repository",
            ResetStep::CreateOrphanBranch => "create orphan branch",
            ResetStep::StageFiles => "stage files",
            ResetStep::Commit => "create commit",
            ResetStep::RenameBranch => "rename branch",
            ResetStep::ListTags => "list tags",
            ResetStep::ForcePush => "force push",
        }
    }
}

impl fmt::Display for ResetStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Errors that abort a reset run.
#[derive(Debug, Error)]
pub enum ResetError {
    /// The workspace directory could not be prepared.
    #[error("failed to {action} workspace '{}': {source}", path.display())]
    Workspace {
        /// What was being done ("create", "create parent of")
        action: &'static str,
        /// Workspace path
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        source: io::Error,
    },

    /// A fatal git step failed.
    #[error("failed to {step}: {source}")]
    Command {
        /// The step that failed
        step: ResetStep,
        /// The failed invocation
        #[source]
        source: CommandError,
    },

    /// Releases could not be listed, so none were deleted.
    #[error("failed to list {provider} releases: {source}")]
    ReleaseList {
        /// Forge name
        provider: &'static str,
        /// Underlying forge error
        #[source]
        source: ForgeError,
    },
}

impl ResetError {
    /// The git step that failed, if this is a command failure.
    pub fn step(&self) -> Option<ResetStep> {
        match self {
            ResetError::Command { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Check whether a command timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ResetError::Command { source, .. } if source.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::CommandFailure;

    #[test]
    fn command_error_display_names_step() {
        let err = ResetError::Command {
            step: ResetStep::ForcePush,
            source: CommandError::new(
                &["push", "-f", "origin", "main"],
                "rejected",
                CommandFailure::Exit(Some(1)),
            ),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to force push: command 'git push -f origin main' failed"));
        assert_eq!(err.step(), Some(ResetStep::ForcePush));
        assert!(!err.is_timeout());
    }

    #[test]
    fn release_list_display() {
        let err = ResetError::ReleaseList {
            provider: "gitlab",
            source: ForgeError::RateLimited,
        };
        assert_eq!(err.to_string(), "failed to list gitlab releases: rate limited");
        assert_eq!(err.step(), None);
    }

    #[test]
    fn workspace_display() {
        let err = ResetError::Workspace {
            action: "create",
            path: PathBuf::from("/tmp/ws"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "failed to create workspace '/tmp/ws': denied");
    }
}
