//! engine
//!
//! Orchestrates the reset workflow: workspace, clone, history rewrite, tag
//! cleanup, force push and release cleanup.
//!
//! # Architecture
//!
//! The engine is the only component that sequences git commands and forge
//! calls. It owns no I/O of its own beyond the workspace directory:
//!
//! - every git command goes through an injected [`GitRunner`](crate::git::GitRunner)
//!   with an explicit working directory
//! - every release call goes through an injected [`Forge`](crate::forge::Forge)
//! - every observable step is emitted as a [`ResetEvent`] to a [`Reporter`]
//!
//! # Invariants
//!
//! - Steps run one at a time, in a fixed order, and never go back
//! - The first fatal failure ends the run; no later step executes
//! - A dry run never mutates the remote
//! - The workspace is removed on every exit path
//!
//! # Modules
//!
//! - [`reset`] - The workflow itself
//! - [`events`] - Events, warnings and reporters
//! - [`workspace`] - Scoped scratch directory
//! - [`error`] - Fatal errors

pub mod error;
pub mod events;
pub mod reset;
pub mod workspace;

pub use error::{ResetError, ResetStep};
pub use events::{
    DryRunPlan, NullReporter, RecordingReporter, Reporter, ResetEvent, ResetWarning,
};
pub use reset::{ResetOptions, ResetOutcome, ResetReport, Resetter, ORPHAN_BRANCH};
pub use workspace::Workspace;
