//! resetit - Reset a remote Git repository to a single clean commit
//!
//! resetit clones a repository, replaces its primary branch with a fresh
//! orphan commit holding the current tree, deletes every tag locally and
//! remotely, force-pushes the rewritten branch, and removes all releases
//! hosted on GitHub or GitLab. A dry run does all local work but never
//! touches the remote.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, prompts, delegates to engine)
//! - [`engine`] - Runs the reset workflow step by step
//! - [`core`] - Domain types and configuration
//! - [`git`] - Single doorway for all Git invocations
//! - [`forge`] - Release APIs of GitHub and GitLab
//! - [`ui`] - Output and prompts
//!
//! # Correctness Invariants
//!
//! 1. No step runs after a fatal failure
//! 2. A dry run never mutates the remote
//! 3. The scratch workspace is removed on every exit path
//! 4. The access token never appears in output or errors

pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod git;
pub mod ui;
