//! engine::events
//!
//! Progress and warning events emitted by a reset run.
//!
//! # Design
//!
//! The engine never prints. Everything an operator should see is emitted
//! as a [`ResetEvent`] to an injected [`Reporter`]; the UI layer decides
//! how (and whether) to render it. Events never carry the access token.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::forge::Release;

/// A tolerated failure. The run continues after one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetWarning {
    /// The old primary branch could not be deleted.
    OldBranchNotDeleted { branch: String, error: String },
    /// A local tag could not be deleted.
    LocalTagNotDeleted { tag: String, error: String },
    /// A remote tag could not be deleted.
    RemoteTagNotDeleted { tag: String, error: String },
    /// A hosted release could not be deleted.
    ReleaseNotDeleted { release: String, error: String },
}

impl fmt::Display for ResetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetWarning::OldBranchNotDeleted { branch, error } => {
                write!(f, "failed to delete old branch '{}': {}", branch, error)
            }
            ResetWarning::LocalTagNotDeleted { tag, error } => {
                write!(f, "failed to delete local tag '{}': {}", tag, error)
            }
            ResetWarning::RemoteTagNotDeleted { tag, error } => {
                write!(f, "failed to delete remote tag '{}': {}", tag, error)
            }
            ResetWarning::ReleaseNotDeleted { release, error } => {
                write!(f, "failed to delete release '{}': {}", release, error)
            }
        }
    }
}

/// What a dry run would have done remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunPlan {
    /// Remote tags that would be deleted
    pub tags: Vec<String>,
    /// Branch that would be force-pushed
    pub branch: String,
    /// Releases that would be deleted
    pub releases: Vec<Release>,
}

impl DryRunPlan {
    /// The force-push command the real run would execute.
    pub fn push_command(&self) -> String {
        format!("git push -f origin {}", self.branch)
    }
}

/// One observable step of a reset run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetEvent {
    /// A fresh workspace is ready.
    WorkspaceReady { path: PathBuf },
    /// Cloning is about to start.
    Cloning { url: String },
    /// A git command is about to run.
    Executing { command: String },
    /// Output captured from the last git command.
    CommandOutput { output: String },
    /// Tags were found in the clone.
    TagsFound { tags: Vec<String> },
    /// The clone has no tags.
    NoTags,
    /// A local tag was deleted.
    LocalTagDeleted { tag: String },
    /// A remote tag was deleted.
    RemoteTagDeleted { tag: String },
    /// The rewritten branch was force-pushed.
    Pushed { branch: String },
    /// Releases were listed.
    ReleasesFound { provider: &'static str, releases: Vec<Release> },
    /// The repository has no releases.
    NoReleases { provider: &'static str },
    /// A release was deleted.
    ReleaseDeleted { release: Release },
    /// Dry run stopped before any remote mutation.
    DryRunPlan(DryRunPlan),
    /// A tolerated failure.
    Warning(ResetWarning),
}

/// Receiver of reset events.
pub trait Reporter: Send + Sync {
    /// Handle one event.
    fn report(&self, event: &ResetEvent);
}

/// Reporter that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: &ResetEvent) {}
}

/// Reporter that keeps events in order, for tests.
///
/// Clones share the same event list.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<ResetEvent>>>,
}

impl RecordingReporter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded events.
    pub fn events(&self) -> Vec<ResetEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Get the recorded warnings.
    pub fn warnings(&self) -> Vec<ResetWarning> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ResetEvent::Warning(w) => Some(w),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &ResetEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
