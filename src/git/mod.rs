//! git
//!
//! Single doorway to the `git` executable.
//!
//! All Git interactions flow through the [`GitRunner`] trait, which takes an
//! explicit working directory for every call and returns captured output
//! or a structured [`CommandError`].
//!
//! # Modules
//!
//! - `runner`: `GitRunner` trait, `SystemGit` implementation, errors
//! - `tags`: tag enumeration for a local clone
//! - [`mock`]: scripted runner for deterministic testing

pub mod mock;
mod runner;
mod tags;

pub use runner::{command_line, CommandError, CommandFailure, GitOutput, GitRunner, SystemGit};
pub use tags::{list_tags, parse_tag_list};
