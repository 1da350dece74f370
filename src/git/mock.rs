//! git::mock
//!
//! Scripted git runner for deterministic testing.
//!
//! # Design
//!
//! `MockGit` records every invocation and answers from a list of rules
//! matched by argument prefix. Unmatched invocations succeed with empty
//! output, so a test only scripts the calls it cares about. When several
//! rules match, the most recently added one wins.
//!
//! # Example
//!
//! ```
//! use resetit::git::mock::MockGit;
//! use resetit::git::GitRunner;
//! use std::path::Path;
//!
//! # tokio_test::block_on(async {
//! let git = MockGit::new()
//!     .with_tags(&["v1.0.0"])
//!     .fail_on(&["push", "-f"]);
//!
//! let out = git.run(Path::new("/repo"), &["tag"]).await.unwrap();
//! assert_eq!(out.stdout, "v1.0.0\n");
//! assert!(git.run(Path::new("/repo"), &["push", "-f", "origin", "main"]).await.is_err());
//! assert_eq!(git.command_lines(), vec!["git tag", "git push -f origin main"]);
//! # });
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::runner::{command_line, CommandError, CommandFailure, GitOutput, GitRunner};

/// Mock git runner for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state,
/// so a test can keep a handle after moving one into the engine.
#[derive(Debug, Clone, Default)]
pub struct MockGit {
    inner: Arc<Mutex<MockGitInner>>,
}

#[derive(Debug, Default)]
struct MockGitInner {
    rules: Vec<Rule>,
    calls: Vec<GitCall>,
}

#[derive(Debug, Clone)]
struct Rule {
    prefix: Vec<String>,
    response: Response,
}

#[derive(Debug, Clone)]
enum Response {
    Succeed(String),
    Fail { output: String, code: i32 },
    Timeout,
}

/// A recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCall {
    /// Working directory the command ran in
    pub dir: PathBuf,
    /// Arguments after `git`
    pub args: Vec<String>,
}

impl GitCall {
    /// The printable command line, e.g. `git branch -D main`.
    pub fn command_line(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        command_line(&args)
    }
}

impl MockGit {
    /// Create a mock where every command succeeds with no output.
    pub fn new() -> Self {
        Self::default()
    }

    fn push_rule(self, prefix: &[&str], response: Response) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.rules.push(Rule {
                prefix: prefix.iter().map(|s| s.to_string()).collect(),
                response,
            });
        }
        self
    }

    /// Answer `git tag` with the given tag names.
    pub fn with_tags(self, tags: &[&str]) -> Self {
        let stdout: String = tags.iter().map(|t| format!("{}\n", t)).collect();
        self.respond(&["tag"], &stdout)
    }

    /// Succeed with `stdout` for commands starting with `prefix`.
    pub fn respond(self, prefix: &[&str], stdout: &str) -> Self {
        self.push_rule(prefix, Response::Succeed(stdout.to_string()))
    }

    /// Fail (exit status 1) for commands starting with `prefix`.
    pub fn fail_on(self, prefix: &[&str]) -> Self {
        self.fail_with(prefix, "error: mock failure", 1)
    }

    /// Fail with specific output and exit code for commands starting with `prefix`.
    pub fn fail_with(self, prefix: &[&str], output: &str, code: i32) -> Self {
        self.push_rule(
            prefix,
            Response::Fail {
                output: output.to_string(),
                code,
            },
        )
    }

    /// Time out for commands starting with `prefix`.
    pub fn timeout_on(self, prefix: &[&str]) -> Self {
        self.push_rule(prefix, Response::Timeout)
    }

    /// Get all recorded invocations, in order.
    pub fn calls(&self) -> Vec<GitCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Get all recorded command lines, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(GitCall::command_line).collect()
    }

    /// Count invocations starting with `prefix`.
    pub fn count(&self, prefix: &[&str]) -> usize {
        self.calls()
            .iter()
            .filter(|call| starts_with(&call.args, prefix))
            .count()
    }
}

fn starts_with(args: &[String], prefix: &[impl AsRef<str>]) -> bool {
    args.len() >= prefix.len()
        && args
            .iter()
            .zip(prefix)
            .all(|(arg, want)| arg == want.as_ref())
}

#[async_trait]
impl GitRunner for MockGit {
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput, CommandError> {
        let response = {
            let mut inner = self.inner.lock().unwrap();
            let owned: Vec<String> = args.iter().map(|s| s.to_string()).collect();
            let response = inner
                .rules
                .iter()
                .rev()
                .find(|rule| starts_with(&owned, &rule.prefix))
                .map(|rule| rule.response.clone());
            inner.calls.push(GitCall {
                dir: dir.to_path_buf(),
                args: owned,
            });
            response
        };

        match response {
            None => Ok(GitOutput::default()),
            Some(Response::Succeed(stdout)) => Ok(GitOutput::stdout(stdout)),
            Some(Response::Fail { output, code }) => Err(CommandError::new(
                args,
                output,
                CommandFailure::Exit(Some(code)),
            )),
            Some(Response::Timeout) => Err(CommandError::new(
                args,
                "",
                CommandFailure::Timeout(Duration::from_secs(0)),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unmatched_commands_succeed_silently() {
        let git = MockGit::new();
        let out = git.run(Path::new("/r"), &["add", "-A"]).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(git.count(&["add"]), 1);
    }

    #[tokio::test]
    async fn latest_rule_wins() {
        let git = MockGit::new()
            .fail_on(&["push"])
            .respond(&["push", "-f"], "ok");

        assert!(git
            .run(Path::new("/r"), &["push", "-f", "origin", "main"])
            .await
            .is_ok());
        assert!(git
            .run(Path::new("/r"), &["push", "origin", "--delete", "refs/tags/v1"])
            .await
            .is_err());
    }

    #[tokio::test]
    async fn prefix_must_match_whole_arguments() {
        let git = MockGit::new().fail_on(&["tag", "-d", "v1"]);
        assert!(git.run(Path::new("/r"), &["tag", "-d", "v10"]).await.is_ok());
        assert!(git.run(Path::new("/r"), &["tag", "-d", "v1"]).await.is_err());
    }

    #[tokio::test]
    async fn failure_carries_output_and_command() {
        let git = MockGit::new().fail_with(&["clone"], "fatal: not found", 128);
        let err = git
            .run(Path::new("/w"), &["clone", "https://example.com/a/b.git"])
            .await
            .unwrap_err();
        assert_eq!(err.command, "git clone https://example.com/a/b.git");
        assert_eq!(err.output, "fatal: not found");
        assert!(matches!(err.failure, CommandFailure::Exit(Some(128))));
    }

    #[tokio::test]
    async fn timeout_rule() {
        let git = MockGit::new().timeout_on(&["push"]);
        let err = git
            .run(Path::new("/w"), &["push", "-f", "origin", "main"])
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn clones_share_recorded_calls() {
        let git = MockGit::new();
        let handle = git.clone();
        git.run(Path::new("/w"), &["tag"]).await.unwrap();
        assert_eq!(handle.command_lines(), vec!["git tag"]);
    }
}
