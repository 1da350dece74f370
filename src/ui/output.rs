//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! Progress goes to stdout; warnings, errors and debug lines go to stderr.
//! Engine events are turned into lines by [`render_event`] and printed by
//! [`ConsoleReporter`].

use std::fmt::Display;

use crate::engine::{Reporter, ResetEvent};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// How a rendered line is printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Regular progress
    Info(String),
    /// Completed action
    Success(String),
    /// Tolerated failure
    Warning(String),
    /// Shown only with `--debug`
    Debug(String),
}

/// Turn an engine event into output lines.
pub fn render_event(event: &ResetEvent) -> Vec<Line> {
    match event {
        ResetEvent::WorkspaceReady { path } => {
            vec![Line::Debug(format!("Using workspace {}", path.display()))]
        }
        ResetEvent::Cloning { url } => vec![Line::Info(format!("Cloning repository: {}", url))],
        ResetEvent::Executing { command } => vec![Line::Info(format!("Executing: {}", command))],
        ResetEvent::CommandOutput { output } => vec![Line::Debug(output.trim_end().to_string())],
        ResetEvent::TagsFound { tags } => {
            vec![Line::Info(format!("Found {} tags to delete", tags.len()))]
        }
        ResetEvent::NoTags => vec![Line::Info("No local tags found".to_string())],
        ResetEvent::LocalTagDeleted { tag } => {
            vec![Line::Info(format!("Removed local tag: {}", tag))]
        }
        ResetEvent::RemoteTagDeleted { tag } => {
            vec![Line::Success(format!("Deleted remote tag: {}", tag))]
        }
        ResetEvent::Pushed { branch } => {
            vec![Line::Success(format!("Force-pushed new history to {}", branch))]
        }
        ResetEvent::ReleasesFound { provider, releases } => vec![Line::Info(format!(
            "Found {} {} releases",
            releases.len(),
            provider
        ))],
        ResetEvent::NoReleases { .. } => vec![Line::Info("No releases found to delete".to_string())],
        ResetEvent::ReleaseDeleted { release } => vec![Line::Success(format!(
            "Deleted release: {}",
            release.display_name()
        ))],
        ResetEvent::DryRunPlan(plan) => {
            let mut lines = Vec::new();
            if plan.tags.is_empty() {
                lines.push(Line::Info("Would delete no remote tags".to_string()));
            } else {
                lines.push(Line::Info(format!(
                    "Would delete {} remote tags: {}",
                    plan.tags.len(),
                    plan.tags.join(", ")
                )));
            }
            lines.push(Line::Info(format!("Would execute: {}", plan.push_command())));
            if !plan.releases.is_empty() {
                lines.push(Line::Info(format!(
                    "The following releases would be deleted:\n{}",
                    format_list(&plan.releases, "- ")
                )));
            }
            lines
        }
        ResetEvent::Warning(warning) => vec![Line::Warning(warning.to_string())],
    }
}

/// Reporter that prints events to the console.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    verbosity: Verbosity,
}

impl ConsoleReporter {
    /// Create a reporter with the given verbosity.
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &ResetEvent) {
        for line in render_event(event) {
            match line {
                Line::Info(text) => print(text, self.verbosity),
                Line::Success(text) => success(text, self.verbosity),
                Line::Warning(text) => warn(text, self.verbosity),
                Line::Debug(text) => debug(text, self.verbosity),
            }
        }
    }
}
