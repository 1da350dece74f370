//! Integration tests for the reset workflow.
//!
//! These tests drive `Resetter` end to end with a scripted git runner and
//! an in-memory forge, and check:
//! - The exact git command sequence for a full run
//! - Fatal steps stop everything after them
//! - Tolerated failures become warnings and the run still succeeds
//! - Dry runs never mutate the remote and are repeatable
//! - Each run cleans up its own scratch directory and nothing else

use std::path::PathBuf;

use tempfile::TempDir;

use resetit::core::types::{CommitMessage, Provider, RepositoryTarget};
use resetit::engine::{
    RecordingReporter, ResetError, ResetEvent, ResetOptions, ResetReport, ResetStep,
    ResetWarning, Resetter,
};
use resetit::forge::mock::{MockForge, MockOperation};
use resetit::forge::ForgeError;
use resetit::git::mock::MockGit;

// =============================================================================
// Test Fixtures
// =============================================================================

/// One scripted run: mocks plus the workspace location.
struct Harness {
    temp: TempDir,
    git: MockGit,
    forge: MockForge,
    reporter: RecordingReporter,
}

impl Harness {
    fn new(git: MockGit, forge: MockForge) -> Self {
        Self {
            temp: TempDir::new().expect("failed to create temp dir"),
            git,
            forge,
            reporter: RecordingReporter::new(),
        }
    }

    /// Parent directory handed to the resetter.
    fn workspace(&self) -> PathBuf {
        self.temp.path().join("scratch")
    }

    /// Run directories still present under the parent.
    fn leftover_runs(&self) -> usize {
        std::fs::read_dir(self.workspace())
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| e.file_name().to_string_lossy().starts_with("resetit-"))
                    .count()
            })
            .unwrap_or(0)
    }

    async fn run(&self, target: RepositoryTarget) -> Result<ResetReport, ResetError> {
        let resetter = Resetter::new(
            target,
            Box::new(self.git.clone()),
            Box::new(self.forge.clone()),
            ResetOptions::new(self.workspace()),
        )
        .with_reporter(Box::new(self.reporter.clone()));

        resetter
            .run(&CommitMessage::new("Initial commit").unwrap())
            .await
    }
}

fn github(dry_run: bool) -> RepositoryTarget {
    RepositoryTarget::parse(Provider::GitHub, "owner/repo", "ghp_test")
        .unwrap()
        .with_dry_run(dry_run)
}

fn pushes(git: &MockGit) -> usize {
    git.count(&["push"])
}

// =============================================================================
// Full runs
// =============================================================================

mod full_run {
    use super::*;

    #[tokio::test]
    async fn github_single_tag_single_release() {
        let h = Harness::new(
            MockGit::new().with_tags(&["v1.0.0"]),
            MockForge::named("github").with_tagged_release(1, "v1.0.0"),
        );

        let report = h.run(github(false)).await.unwrap();

        assert_eq!(
            h.git.command_lines(),
            vec![
                "git clone https://github.com/owner/repo.git",
                "git checkout --orphan temp_branch",
                "git add -A",
                "git commit -m \"Initial commit\"",
                "git branch -D main",
                "git branch -m main",
                "git tag",
                "git tag -d v1.0.0",
                "git push origin --delete refs/tags/v1.0.0",
                "git push -f origin main",
            ]
        );
        assert_eq!(
            h.forge.operations(),
            vec![
                MockOperation::ListReleases,
                MockOperation::DeleteRelease {
                    tag_name: "v1.0.0".into()
                },
            ]
        );
        assert!(!report.is_dry_run());
        assert!(report.warnings.is_empty());
        assert_eq!(report.remote_tags_deleted, vec!["v1.0.0"]);
        assert_eq!(report.releases_deleted.len(), 1);
        assert!(h.forge.releases().is_empty());
    }

    #[tokio::test]
    async fn gitlab_custom_instance_clone_url() {
        let h = Harness::new(MockGit::new(), MockForge::named("gitlab"));
        let target = RepositoryTarget::parse(Provider::GitLab, "team/sub/proj", "glpat")
            .unwrap()
            .with_base_url("https://gitlab.example.com");

        h.run(target).await.unwrap();

        let calls = h.git.calls();
        assert_eq!(
            calls[0].args,
            vec!["clone", "https://gitlab.example.com/team/sub/proj.git"]
        );
        assert_eq!(calls[0].dir.parent(), Some(h.workspace().as_path()));
        assert_eq!(calls[1].dir, calls[0].dir.join("proj"));
    }

    #[tokio::test]
    async fn no_tags_and_no_releases() {
        let h = Harness::new(MockGit::new(), MockForge::new());

        let report = h.run(github(false)).await.unwrap();

        assert!(report.tags.is_empty());
        assert_eq!(h.git.count(&["tag", "-d"]), 0);
        assert_eq!(h.git.count(&["push", "origin", "--delete"]), 0);
        let events = h.reporter.events();
        assert!(events.contains(&ResetEvent::NoTags));
        assert!(events
            .iter()
            .any(|e| matches!(e, ResetEvent::NoReleases { .. })));
    }

    #[tokio::test]
    async fn workspace_is_removed_after_success() {
        let h = Harness::new(MockGit::new(), MockForge::new());
        h.run(github(false)).await.unwrap();
        assert!(h.workspace().is_dir());
        assert_eq!(h.leftover_runs(), 0);
    }

    #[tokio::test]
    async fn existing_files_in_workspace_parent_survive() {
        let h = Harness::new(MockGit::new(), MockForge::new());
        std::fs::create_dir_all(h.workspace().join("repo")).unwrap();
        std::fs::write(h.workspace().join("repo/notes.txt"), "mine").unwrap();
        std::fs::write(h.workspace().join("precious.txt"), "keep").unwrap();

        h.run(github(false)).await.unwrap();

        let ready = h.reporter.events().into_iter().find_map(|e| match e {
            ResetEvent::WorkspaceReady { path } => Some(path),
            _ => None,
        });
        let ready = ready.expect("workspace event");
        assert_ne!(ready, h.workspace());
        assert!(!ready.exists());
        assert_eq!(
            std::fs::read_to_string(h.workspace().join("repo/notes.txt")).unwrap(),
            "mine"
        );
        assert_eq!(
            std::fs::read_to_string(h.workspace().join("precious.txt")).unwrap(),
            "keep"
        );
        assert_eq!(h.leftover_runs(), 0);
    }
}

// =============================================================================
// Fatal failures
// =============================================================================

mod fatal {
    use super::*;

    #[tokio::test]
    async fn clone_failure_stops_everything() {
        let h = Harness::new(
            MockGit::new()
                .with_tags(&["v1"])
                .fail_with(&["clone"], "fatal: repository not found", 128),
            MockForge::new().with_tagged_release(1, "v1"),
        );

        let err = h.run(github(false)).await.unwrap_err();

        assert_eq!(err.step(), Some(ResetStep::Clone));
        assert!(err.to_string().contains("repository not found"));
        assert_eq!(h.git.command_lines(), vec!["git clone https://github.com/owner/repo.git"]);
        assert!(h.forge.operations().is_empty());
        assert_eq!(h.leftover_runs(), 0);
    }

    #[tokio::test]
    async fn commit_failure_stops_before_tags() {
        let h = Harness::new(MockGit::new().fail_on(&["commit"]), MockForge::new());

        let err = h.run(github(false)).await.unwrap_err();

        assert_eq!(err.step(), Some(ResetStep::Commit));
        assert_eq!(h.git.count(&["branch"]), 0);
        assert_eq!(h.git.count(&["tag"]), 0);
    }

    #[tokio::test]
    async fn tag_listing_failure_is_fatal() {
        let h = Harness::new(MockGit::new().fail_on(&["tag"]), MockForge::new());

        let err = h.run(github(false)).await.unwrap_err();

        assert_eq!(err.step(), Some(ResetStep::ListTags));
        assert_eq!(pushes(&h.git), 0);
    }

    #[tokio::test]
    async fn push_failure_skips_release_cleanup() {
        let h = Harness::new(
            MockGit::new().fail_on(&["push", "-f"]),
            MockForge::new().with_tagged_release(1, "v1"),
        );

        let err = h.run(github(false)).await.unwrap_err();

        assert_eq!(err.step(), Some(ResetStep::ForcePush));
        assert!(h.forge.operations().is_empty());
    }

    #[tokio::test]
    async fn release_list_failure_is_fatal() {
        let h = Harness::new(
            MockGit::new(),
            MockForge::named("github").fail_list(ForgeError::AuthFailed("bad credentials".into())),
        );

        let err = h.run(github(false)).await.unwrap_err();

        assert!(matches!(
            err,
            ResetError::ReleaseList {
                provider: "github",
                source: ForgeError::AuthFailed(_)
            }
        ));
        assert_eq!(h.forge.delete_count(), 0);
        // The push already happened; only cleanup failed.
        assert_eq!(h.git.count(&["push", "-f", "origin", "main"]), 1);
    }
}

// =============================================================================
// Tolerated failures
// =============================================================================

mod tolerated {
    use super::*;

    #[tokio::test]
    async fn one_of_three_remote_tag_deletions_fails() {
        let h = Harness::new(
            MockGit::new()
                .with_tags(&["v1", "v2", "v3"])
                .fail_on(&["push", "origin", "--delete", "refs/tags/v2"]),
            MockForge::new(),
        );

        let report = h.run(github(false)).await.unwrap();

        assert_eq!(h.git.count(&["push", "origin", "--delete"]), 3);
        assert_eq!(h.git.count(&["push", "-f", "origin", "main"]), 1);
        assert_eq!(report.remote_tags_deleted, vec!["v1", "v3"]);
        assert!(matches!(
            report.warnings.as_slice(),
            [ResetWarning::RemoteTagNotDeleted { tag, .. }] if tag == "v2"
        ));
    }

    #[tokio::test]
    async fn old_branch_deletion_failure_continues() {
        let h = Harness::new(
            MockGit::new().fail_with(&["branch", "-D"], "error: branch 'main' not found.", 1),
            MockForge::new(),
        );

        let report = h.run(github(false)).await.unwrap();

        assert_eq!(h.git.count(&["branch", "-m", "main"]), 1);
        assert!(matches!(
            report.warnings.as_slice(),
            [ResetWarning::OldBranchNotDeleted { .. }]
        ));
    }

    #[tokio::test]
    async fn local_tag_deletion_failure_continues() {
        let h = Harness::new(
            MockGit::new()
                .with_tags(&["v1", "v2"])
                .fail_on(&["tag", "-d", "v1"]),
            MockForge::new(),
        );

        let report = h.run(github(false)).await.unwrap();

        assert_eq!(h.git.count(&["tag", "-d"]), 2);
        assert_eq!(h.git.count(&["push", "origin", "--delete"]), 2);
        assert_eq!(report.warnings.len(), 1);
    }

    #[tokio::test]
    async fn release_deletion_failure_continues() {
        let h = Harness::new(
            MockGit::new(),
            MockForge::new()
                .with_tagged_release(1, "v1")
                .with_tagged_release(2, "v2")
                .fail_delete("v1", ForgeError::RateLimited),
        );

        let report = h.run(github(false)).await.unwrap();

        assert_eq!(h.forge.delete_count(), 2);
        assert_eq!(report.releases_deleted.len(), 1);
        assert_eq!(report.releases_deleted[0].tag_name, "v2");
        assert!(matches!(
            report.warnings.as_slice(),
            [ResetWarning::ReleaseNotDeleted { release, .. }] if release == "v1"
        ));
        assert_eq!(h.reporter.warnings(), report.warnings);
    }
}

// =============================================================================
// Dry run
// =============================================================================

mod dry_run {
    use super::*;

    #[tokio::test]
    async fn two_tags_one_release() {
        let h = Harness::new(
            MockGit::new().with_tags(&["v1.0.0", "v1.1.0"]),
            MockForge::new().with_tagged_release(5, "v1.1.0"),
        );

        let report = h.run(github(true)).await.unwrap();

        assert!(report.is_dry_run());
        assert_eq!(pushes(&h.git), 0);
        assert_eq!(h.forge.operations(), vec![MockOperation::ListReleases]);

        let plan = report.dry_run_plan().unwrap();
        assert_eq!(plan.tags, vec!["v1.0.0", "v1.1.0"]);
        assert_eq!(plan.branch, "main");
        assert_eq!(plan.releases.len(), 1);
        assert_eq!(plan.push_command(), "git push -f origin main");

        // Local, disposable work still happens.
        assert_eq!(h.git.count(&["tag", "-d"]), 2);
        assert_eq!(h.git.count(&["commit"]), 1);
        assert_eq!(h.leftover_runs(), 0);
    }

    #[tokio::test]
    async fn repeated_dry_runs_report_the_same_plan() {
        let h = Harness::new(
            MockGit::new().with_tags(&["v1", "v2"]),
            MockForge::new().with_tagged_release(1, "v1"),
        );

        let first = h.run(github(true)).await.unwrap();
        let second = h.run(github(true)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(pushes(&h.git), 0);
        assert_eq!(h.forge.releases().len(), 1);
        assert_eq!(h.forge.delete_count(), 0);
    }

    #[tokio::test]
    async fn plan_is_reported_as_event() {
        let h = Harness::new(MockGit::new().with_tags(&["v1"]), MockForge::new());

        h.run(github(true)).await.unwrap();

        let last = h.reporter.events().pop().unwrap();
        assert!(matches!(last, ResetEvent::DryRunPlan(plan) if plan.tags == vec!["v1"]));
    }
}
