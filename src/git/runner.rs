//! git::runner
//!
//! Process runner for the `git` executable.
//!
//! Every invocation takes an explicit working directory; nothing in this
//! crate changes the process-wide current directory. Output is captured
//! (stdout and stderr separately) and returned to the caller, which decides
//! whether and how to show it.
//!
//! A single attempt is made per call. Callers decide whether a failure is
//! fatal.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::config::DEFAULT_COMMAND_TIMEOUT;

/// Why a git invocation failed.
#[derive(Debug, Error)]
pub enum CommandFailure {
    /// The process could not be started.
    #[error("could not start process: {0}")]
    Spawn(#[source] std::io::Error),

    /// The process exited unsuccessfully.
    #[error("{}", describe_exit(.0))]
    Exit(Option<i32>),

    /// The process did not finish in time and was killed.
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// A git invocation that did not succeed.
///
/// Carries the reconstructed command line and whatever output was captured
/// before the failure.
#[derive(Debug, Error)]
#[error("command '{command}' failed: {failure}{}", output_suffix(.output))]
pub struct CommandError {
    /// Reconstructed command line, e.g. `git push -f origin main`
    pub command: String,
    /// Combined stdout/stderr captured from the process
    pub output: String,
    /// Underlying cause
    pub failure: CommandFailure,
}

fn output_suffix(output: &str) -> String {
    let trimmed = output.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\nOutput: {}", trimmed)
    }
}

impl CommandError {
    /// Create an error for the given argument vector.
    pub fn new(args: &[&str], output: impl Into<String>, failure: CommandFailure) -> Self {
        Self {
            command: command_line(args),
            output: output.into(),
            failure,
        }
    }

    /// Whether the command was killed because it exceeded its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.failure, CommandFailure::Timeout(_))
    }
}

/// Captured output of a successful git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// Create output with only stdout populated.
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Stdout followed by stderr, as a terminal would show them.
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        combined.push_str(&self.stderr);
        combined
    }

    /// Whether the command printed nothing.
    pub fn is_empty(&self) -> bool {
        self.stdout.trim().is_empty() && self.stderr.trim().is_empty()
    }
}

/// Reconstruct a printable command line for an argument vector.
///
/// Arguments containing whitespace are double-quoted.
///
/// ```
/// use resetit::git::command_line;
///
/// assert_eq!(command_line(&["push", "-f", "origin", "main"]), "git push -f origin main");
/// assert_eq!(command_line(&["commit", "-m", "fresh start"]), "git commit -m \"fresh start\"");
/// ```
pub fn command_line(args: &[&str]) -> String {
    let mut line = String::from("git");
    for arg in args {
        line.push(' ');
        if arg.is_empty() || arg.chars().any(char::is_whitespace) {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}

/// Executes git subcommands.
///
/// The engine receives an implementation through its constructor, so tests
/// substitute [`crate::git::mock::MockGit`] without touching global state.
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run `git <args>` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if the process cannot be started, exits
    /// non-zero, or exceeds the configured timeout.
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput, CommandError>;
}

/// Runs the real `git` executable.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
    timeout: Duration,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

impl SystemGit {
    /// Use `git` from `PATH` with the given per-command timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: PathBuf::from("git"),
            timeout,
        }
    }

    /// Use a specific executable instead of `git` from `PATH`.
    pub fn with_program(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Get the per-command timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl GitRunner for SystemGit {
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput, CommandError> {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(CommandError::new(args, "", CommandFailure::Spawn(e)));
            }
            Err(_) => {
                return Err(CommandError::new(
                    args,
                    "",
                    CommandFailure::Timeout(self.timeout),
                ));
            }
        };

        let captured = GitOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if output.status.success() {
            Ok(captured)
        } else {
            Err(CommandError::new(
                args,
                captured.combined(),
                CommandFailure::Exit(output.status.code()),
            ))
        }
    }
}
