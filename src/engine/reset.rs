//! engine::reset
//!
//! The reset workflow.
//!
//! # Lifecycle
//!
//! ```text
//! PrepareWorkspace -> Clone -> RewriteHistory -> LocalTagCleanup
//!     -> [DryRunCheckpoint] -> RemoteTagCleanup -> ForcePush -> ReleaseCleanup
//! ```
//!
//! Steps run strictly one after another and never go back. The first
//! fatal failure ends the run with a [`ResetError`]; tolerated failures
//! become [`ResetWarning`]s and the run continues.
//!
//! | Step                     | On failure |
//! |--------------------------|------------|
//! | prepare workspace        | fatal      |
//! | clone                    | fatal      |
//! | orphan, add, commit      | fatal      |
//! | delete old branch        | warning    |
//! | rename branch            | fatal      |
//! | list tags                | fatal      |
//! | delete local/remote tag  | warning    |
//! | force push               | fatal      |
//! | list releases            | fatal      |
//! | delete release           | warning    |
//!
//! # Dry run
//!
//! A dry run performs every local step (the workspace is disposable) and
//! lists releases, which is read-only, then stops with a [`DryRunPlan`]
//! before the first remote mutation.
//!
//! # Example
//!
//! ```ignore
//! let resetter = Resetter::new(target, Box::new(SystemGit::default()), forge, options)
//!     .with_reporter(Box::new(reporter));
//! let report = resetter.run(&CommitMessage::new("Initial commit")?).await?;
//! ```

use std::path::{Path, PathBuf};

use super::error::{ResetError, ResetStep};
use super::events::{DryRunPlan, NullReporter, Reporter, ResetEvent, ResetWarning};
use super::workspace::Workspace;
use crate::core::types::{BranchName, CommitMessage, RepositoryTarget};
use crate::forge::{Forge, Release};
use crate::git::{command_line, list_tags, CommandError, GitOutput, GitRunner};

/// Name of the temporary branch holding the new root commit.
pub const ORPHAN_BRANCH: &str = "temp_branch";

/// Settings of a reset run that are not part of the target.
#[derive(Debug, Clone)]
pub struct ResetOptions {
    /// Parent of the per-run scratch directory; never removed itself
    pub workspace: PathBuf,
    /// Primary branch to rewrite
    pub branch: BranchName,
    /// Temporary orphan branch name
    pub orphan_branch: String,
}

impl ResetOptions {
    /// Options with the default `main` branch.
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            branch: BranchName::main(),
            orphan_branch: ORPHAN_BRANCH.to_string(),
        }
    }

    /// Rewrite a different primary branch.
    pub fn with_branch(mut self, branch: BranchName) -> Self {
        self.branch = branch;
        self
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    /// History was rewritten and pushed.
    Completed,
    /// Dry run; nothing reached the remote.
    DryRun(DryRunPlan),
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetReport {
    /// How the run ended
    pub outcome: ResetOutcome,
    /// Tags found in the clone
    pub tags: Vec<String>,
    /// Remote tags that were deleted
    pub remote_tags_deleted: Vec<String>,
    /// Releases that were deleted
    pub releases_deleted: Vec<Release>,
    /// Tolerated failures, in order
    pub warnings: Vec<ResetWarning>,
}

impl ResetReport {
    fn new() -> Self {
        Self {
            outcome: ResetOutcome::Completed,
            tags: Vec::new(),
            remote_tags_deleted: Vec::new(),
            releases_deleted: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Whether the run was a dry run.
    pub fn is_dry_run(&self) -> bool {
        matches!(self.outcome, ResetOutcome::DryRun(_))
    }

    /// The dry-run plan, if any.
    pub fn dry_run_plan(&self) -> Option<&DryRunPlan> {
        match &self.outcome {
            ResetOutcome::DryRun(plan) => Some(plan),
            ResetOutcome::Completed => None,
        }
    }
}

/// Drives one reset of one repository.
///
/// Collaborators are injected at construction; the forge is already bound
/// to the target's provider, so the workflow never branches on it.
pub struct Resetter {
    target: RepositoryTarget,
    git: Box<dyn GitRunner>,
    forge: Box<dyn Forge>,
    reporter: Box<dyn Reporter>,
    options: ResetOptions,
}

impl Resetter {
    /// Create a resetter that reports nowhere.
    pub fn new(
        target: RepositoryTarget,
        git: Box<dyn GitRunner>,
        forge: Box<dyn Forge>,
        options: ResetOptions,
    ) -> Self {
        Self {
            target,
            git,
            forge,
            reporter: Box::new(NullReporter),
            options,
        }
    }

    /// Send events to `reporter`.
    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Get the target.
    pub fn target(&self) -> &RepositoryTarget {
        &self.target
    }

    /// Run the whole workflow.
    ///
    /// The workspace is removed before this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns the first fatal failure; no later step runs after it.
    pub async fn run(&self, message: &CommitMessage) -> Result<ResetReport, ResetError> {
        let mut report = ResetReport::new();

        let workspace = Workspace::prepare(&self.options.workspace)?;
        self.emit(ResetEvent::WorkspaceReady {
            path: workspace.path().to_path_buf(),
        });

        let url = self.target.clone_url();
        self.emit(ResetEvent::Cloning { url: url.clone() });
        // Announced by `Cloning` above, so no `Executing` line.
        self.exec(workspace.path(), &["clone", url.as_str()])
            .await
            .map_err(|source| ResetError::Command {
                step: ResetStep::Clone,
                source,
            })?;

        let repo_dir = workspace.repo_dir(self.target.repo_name());
        self.rewrite_history(&repo_dir, message, &mut report).await?;

        self.delete_local_tags(&repo_dir, &mut report).await?;

        if self.target.dry_run() {
            let releases = self.list_releases().await?;
            let plan = DryRunPlan {
                tags: report.tags.clone(),
                branch: self.options.branch.to_string(),
                releases,
            };
            self.emit(ResetEvent::DryRunPlan(plan.clone()));
            report.outcome = ResetOutcome::DryRun(plan);
            return Ok(report);
        }

        self.delete_remote_tags(&repo_dir, &mut report).await;

        let branch = self.options.branch.as_str();
        self.step(&repo_dir, &["push", "-f", "origin", branch], ResetStep::ForcePush)
            .await?;
        self.emit(ResetEvent::Pushed {
            branch: branch.to_string(),
        });

        self.delete_releases(&mut report).await?;

        Ok(report)
    }

    async fn rewrite_history(
        &self,
        repo_dir: &Path,
        message: &CommitMessage,
        report: &mut ResetReport,
    ) -> Result<(), ResetError> {
        let orphan = self.options.orphan_branch.as_str();
        let branch = self.options.branch.as_str();

        self.step(
            repo_dir,
            &["checkout", "--orphan", orphan],
            ResetStep::CreateOrphanBranch,
        )
        .await?;
        self.step(repo_dir, &["add", "-A"], ResetStep::StageFiles)
            .await?;
        self.step(
            repo_dir,
            &["commit", "-m", message.as_str()],
            ResetStep::Commit,
        )
        .await?;

        // The old branch may be missing or protected; the rename below
        // decides whether the rewrite worked.
        if let Err(e) = self.git(repo_dir, &["branch", "-D", branch]).await {
            self.warn(
                report,
                ResetWarning::OldBranchNotDeleted {
                    branch: branch.to_string(),
                    error: e.to_string(),
                },
            );
        }

        self.step(repo_dir, &["branch", "-m", branch], ResetStep::RenameBranch)
            .await?;
        Ok(())
    }

    async fn delete_local_tags(
        &self,
        repo_dir: &Path,
        report: &mut ResetReport,
    ) -> Result<(), ResetError> {
        self.emit(ResetEvent::Executing {
            command: command_line(&["tag"]),
        });
        let tags = list_tags(self.git.as_ref(), repo_dir)
            .await
            .map_err(|source| ResetError::Command {
                step: ResetStep::ListTags,
                source,
            })?;

        if tags.is_empty() {
            self.emit(ResetEvent::NoTags);
            return Ok(());
        }
        self.emit(ResetEvent::TagsFound { tags: tags.clone() });

        for tag in &tags {
            match self.git(repo_dir, &["tag", "-d", tag.as_str()]).await {
                Ok(_) => self.emit(ResetEvent::LocalTagDeleted { tag: tag.clone() }),
                Err(e) => self.warn(
                    report,
                    ResetWarning::LocalTagNotDeleted {
                        tag: tag.clone(),
                        error: e.to_string(),
                    },
                ),
            }
        }
        report.tags = tags;
        Ok(())
    }

    async fn delete_remote_tags(&self, repo_dir: &Path, report: &mut ResetReport) {
        let tags = report.tags.clone();
        for tag in tags {
            let refname = format!("refs/tags/{}", tag);
            match self
                .git(repo_dir, &["push", "origin", "--delete", refname.as_str()])
                .await
            {
                Ok(_) => {
                    self.emit(ResetEvent::RemoteTagDeleted { tag: tag.clone() });
                    report.remote_tags_deleted.push(tag);
                }
                Err(e) => self.warn(
                    report,
                    ResetWarning::RemoteTagNotDeleted {
                        tag,
                        error: e.to_string(),
                    },
                ),
            }
        }
    }

    async fn list_releases(&self) -> Result<Vec<Release>, ResetError> {
        let provider = self.forge.name();
        let releases = self
            .forge
            .list_releases()
            .await
            .map_err(|source| ResetError::ReleaseList { provider, source })?;

        if releases.is_empty() {
            self.emit(ResetEvent::NoReleases { provider });
        } else {
            self.emit(ResetEvent::ReleasesFound {
                provider,
                releases: releases.clone(),
            });
        }
        Ok(releases)
    }

    async fn delete_releases(&self, report: &mut ResetReport) -> Result<(), ResetError> {
        for release in self.list_releases().await? {
            match self.forge.delete_release(&release).await {
                Ok(()) => {
                    self.emit(ResetEvent::ReleaseDeleted {
                        release: release.clone(),
                    });
                    report.releases_deleted.push(release);
                }
                Err(e) => self.warn(
                    report,
                    ResetWarning::ReleaseNotDeleted {
                        release: release.display_name().to_string(),
                        error: e.to_string(),
                    },
                ),
            }
        }
        Ok(())
    }

    /// Run a git command whose failure is fatal.
    async fn step(&self, dir: &Path, args: &[&str], step: ResetStep) -> Result<(), ResetError> {
        self.git(dir, args)
            .await
            .map(|_| ())
            .map_err(|source| ResetError::Command { step, source })
    }

    /// Run a git command, reporting it and its output.
    async fn git(&self, dir: &Path, args: &[&str]) -> Result<GitOutput, CommandError> {
        self.emit(ResetEvent::Executing {
            command: command_line(args),
        });
        self.exec(dir, args).await
    }

    /// Run a git command, reporting only its output.
    async fn exec(&self, dir: &Path, args: &[&str]) -> Result<GitOutput, CommandError> {
        let output = self.git.run(dir, args).await?;
        if !output.is_empty() {
            self.emit(ResetEvent::CommandOutput {
                output: output.combined(),
            });
        }
        Ok(output)
    }

    fn warn(&self, report: &mut ResetReport, warning: ResetWarning) {
        self.emit(ResetEvent::Warning(warning.clone()));
        report.warnings.push(warning);
    }

    fn emit(&self, event: ResetEvent) {
        self.reporter.report(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Provider;
    use crate::engine::events::RecordingReporter;
    use crate::forge::mock::MockForge;
    use crate::git::mock::MockGit;
    use tempfile::TempDir;

    fn target(dry_run: bool) -> RepositoryTarget {
        RepositoryTarget::parse(Provider::GitHub, "owner/repo", "secret-token")
            .unwrap()
            .with_dry_run(dry_run)
    }

    fn resetter(
        temp: &TempDir,
        target: RepositoryTarget,
        git: &MockGit,
        forge: &MockForge,
        reporter: &RecordingReporter,
    ) -> Resetter {
        Resetter::new(
            target,
            Box::new(git.clone()),
            Box::new(forge.clone()),
            ResetOptions::new(temp.path().join("ws")),
        )
        .with_reporter(Box::new(reporter.clone()))
    }

    fn message() -> CommitMessage {
        CommitMessage::new("Initial commit").unwrap()
    }

    #[tokio::test]
    async fn runs_git_in_workspace_and_clone() {
        let temp = TempDir::new().unwrap();
        let git = MockGit::new();
        let forge = MockForge::new();
        let reporter = RecordingReporter::new();

        resetter(&temp, target(false), &git, &forge, &reporter)
            .run(&message())
            .await
            .unwrap();

        let calls = git.calls();
        let parent = temp.path().join("ws");
        let run_dir = calls[0].dir.clone();
        assert_eq!(run_dir.parent(), Some(parent.as_path()));
        assert!(run_dir
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("resetit-"));
        assert!(calls[1..].iter().all(|c| c.dir == run_dir.join("repo")));
        assert!(!run_dir.exists());
        assert!(parent.is_dir());
    }

    #[tokio::test]
    async fn clone_is_announced_once() {
        let temp = TempDir::new().unwrap();
        let git = MockGit::new();
        let forge = MockForge::new();
        let reporter = RecordingReporter::new();

        resetter(&temp, target(false), &git, &forge, &reporter)
            .run(&message())
            .await
            .unwrap();

        let events = reporter.events();
        let cloning = events
            .iter()
            .filter(|e| matches!(e, ResetEvent::Cloning { .. }))
            .count();
        assert_eq!(cloning, 1);
        assert!(!events.iter().any(|e| matches!(
            e,
            ResetEvent::Executing { command } if command.starts_with("git clone")
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            ResetEvent::Executing { command } if command.starts_with("git checkout")
        )));
        assert_eq!(git.count(&["clone"]), 1);
    }

    #[tokio::test]
    async fn clone_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let git = MockGit::new().fail_on(&["clone"]);
        let forge = MockForge::new();
        let reporter = RecordingReporter::new();

        let err = resetter(&temp, target(false), &git, &forge, &reporter)
            .run(&message())
            .await
            .unwrap_err();

        assert_eq!(err.step(), Some(ResetStep::Clone));
        assert_eq!(git.calls().len(), 1);
    }

    #[tokio::test]
    async fn old_branch_failure_is_a_warning() {
        let temp = TempDir::new().unwrap();
        let git = MockGit::new().fail_on(&["branch", "-D"]);
        let forge = MockForge::new();
        let reporter = RecordingReporter::new();

        let report = resetter(&temp, target(false), &git, &forge, &reporter)
            .run(&message())
            .await
            .unwrap();

        assert!(matches!(
            report.warnings.as_slice(),
            [ResetWarning::OldBranchNotDeleted { branch, .. }] if branch == "main"
        ));
        assert_eq!(git.count(&["branch", "-m", "main"]), 1);
        assert_eq!(reporter.warnings(), report.warnings);
    }

    #[tokio::test]
    async fn rename_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let git = MockGit::new().fail_on(&["branch", "-m"]);
        let forge = MockForge::new();
        let reporter = RecordingReporter::new();

        let err = resetter(&temp, target(false), &git, &forge, &reporter)
            .run(&message())
            .await
            .unwrap_err();

        assert_eq!(err.step(), Some(ResetStep::RenameBranch));
        assert_eq!(git.count(&["tag"]), 0);
        assert!(forge.operations().is_empty());
    }

    #[tokio::test]
    async fn push_timeout_is_fatal() {
        let temp = TempDir::new().unwrap();
        let git = MockGit::new().timeout_on(&["push", "-f"]);
        let forge = MockForge::new();
        let reporter = RecordingReporter::new();

        let err = resetter(&temp, target(false), &git, &forge, &reporter)
            .run(&message())
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(err.step(), Some(ResetStep::ForcePush));
        assert!(forge.operations().is_empty());
    }

    #[tokio::test]
    async fn custom_branch_is_pushed() {
        let temp = TempDir::new().unwrap();
        let git = MockGit::new();
        let forge = MockForge::new();

        Resetter::new(
            target(false),
            Box::new(git.clone()),
            Box::new(forge.clone()),
            ResetOptions::new(temp.path().join("ws"))
                .with_branch(BranchName::new("trunk").unwrap()),
        )
        .run(&message())
        .await
        .unwrap();

        assert_eq!(git.count(&["branch", "-D", "trunk"]), 1);
        assert_eq!(git.count(&["push", "-f", "origin", "trunk"]), 1);
    }

    #[tokio::test]
    async fn events_never_contain_token() {
        let temp = TempDir::new().unwrap();
        let git = MockGit::new().with_tags(&["v1"]);
        let forge = MockForge::new().with_tagged_release(1, "v1");
        let reporter = RecordingReporter::new();

        resetter(&temp, target(false), &git, &forge, &reporter)
            .run(&message())
            .await
            .unwrap();

        let rendered = format!("{:?}", reporter.events());
        assert!(!rendered.contains("secret-token"));
    }
}
