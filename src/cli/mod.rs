//! cli
//!
//! Command-line interface layer for resetit.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and merge them over the config file
//! - Ask for the token, confirmation and commit message when interactive
//! - Build the git runner, forge and reporter, then hand off to the engine
//! - Does NOT run git or call forge APIs directly
//!
//! # Architecture
//!
//! The CLI layer is thin. Precedence is defaults < config file < flags.
//! All repository changes flow through [`crate::engine::Resetter`].

pub mod args;

pub use args::Cli;

use anyhow::{anyhow, bail, Result};

use crate::core::config::Config;
use crate::core::types::{BranchName, CommitMessage, RepositoryTarget};
use crate::engine::{ResetOptions, ResetReport, Resetter};
use crate::forge::create_forge;
use crate::git::SystemGit;
use crate::ui::output::{self, ConsoleReporter, Verbosity};
use crate::ui::prompts::{self, PromptError};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = Config::load()?;
    execute(cli, &config)
}

fn execute(cli: Cli, config: &Config) -> Result<()> {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    let interactive = cli.interactive(config.interactive());
    if let Some(path) = config.path() {
        output::debug(format!("Loaded config from {}", path.display()), verbosity);
    }

    let token = match resolve_token(cli.token.clone(), interactive, || {
        prompts::password("Enter access token", true)
    }) {
        Ok(token) => token,
        Err(PromptError::Cancelled) => return cancelled(verbosity),
        Err(PromptError::NotInteractive) => {
            bail!("an access token is required: use --token or set RESETIT_TOKEN")
        }
        Err(e) => bail!("failed to read access token: {}", e),
    };

    let provider = cli.provider.unwrap_or_else(|| config.provider());
    let gitlab_url = cli
        .gitlab_url
        .clone()
        .unwrap_or_else(|| config.gitlab_url().to_string());
    let target = RepositoryTarget::parse(provider, &cli.repo, token)?
        .with_base_url(gitlab_url)
        .with_dry_run(cli.dry_run);

    let branch = BranchName::new(cli.branch.clone().unwrap_or_else(|| config.branch().to_string()))?;

    if interactive {
        let question = confirmation_prompt(&target, &branch);
        match prompts::confirm(&question, true) {
            Ok(true) => {}
            Ok(false) | Err(PromptError::Cancelled) => return cancelled(verbosity),
            Err(e) => bail!("failed to read confirmation: {}", e),
        }
    } else {
        output::warn(non_interactive_notice(&target, &branch), verbosity);
    }

    let message = match resolve_message(cli.message.clone(), interactive, config.message(), || {
        prompts::input("Enter commit message", true)
    }) {
        Ok(message) => CommitMessage::new(message)?,
        Err(PromptError::Cancelled) => return cancelled(verbosity),
        Err(e) => bail!("failed to read commit message: {}", e),
    };

    let workspace = cli.workspace.clone().unwrap_or_else(|| config.workspace());
    output::debug(format!("Target: {:?}", target), verbosity);

    let git = SystemGit::new(config.command_timeout());
    let forge = create_forge(&target, config.http_timeout())?;
    let options = ResetOptions::new(workspace).with_branch(branch);
    let resetter = Resetter::new(target, Box::new(git), forge, options)
        .with_reporter(Box::new(ConsoleReporter::new(verbosity)));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow!("failed to start async runtime: {}", e))?;
    let report = runtime.block_on(resetter.run(&message))?;

    for line in summary(&report, resetter.target(), &message) {
        output::success(line, verbosity);
    }
    Ok(())
}

fn cancelled(verbosity: Verbosity) -> Result<()> {
    output::print("Operation cancelled by user", verbosity);
    Ok(())
}

/// Pick the access token: the flag or environment first, then the prompt.
fn resolve_token(
    explicit: Option<String>,
    interactive: bool,
    prompt: impl FnOnce() -> Result<String, PromptError>,
) -> Result<String, PromptError> {
    match explicit {
        Some(token) if !token.trim().is_empty() => Ok(token),
        _ if interactive => prompt(),
        _ => Err(PromptError::NotInteractive),
    }
}

/// Pick the commit message: an explicit message wins, non-interactive
/// runs use the configured default, and interactive runs ask.
///
/// A blank explicit message counts as no message.
fn resolve_message(
    explicit: Option<String>,
    interactive: bool,
    default: &str,
    prompt: impl FnOnce() -> Result<String, PromptError>,
) -> Result<String, PromptError> {
    match explicit {
        Some(message) if !message.trim().is_empty() => Ok(message),
        _ if !interactive => Ok(default.to_string()),
        _ => prompt(),
    }
}

fn confirmation_prompt(target: &RepositoryTarget, branch: &BranchName) -> String {
    if target.dry_run() {
        format!(
            "DRY RUN: This will simulate squashing all commits on the {} branch of {} into a single commit. Continue?",
            branch,
            target.full_path()
        )
    } else {
        format!(
            "This will squash all commits on the {} branch of {} into a single commit and delete all tags and releases. This cannot be undone. Continue?",
            branch,
            target.full_path()
        )
    }
}

fn non_interactive_notice(target: &RepositoryTarget, branch: &BranchName) -> String {
    if target.dry_run() {
        format!(
            "DRY RUN: Will simulate squashing all commits on {} branch",
            branch
        )
    } else {
        format!(
            "Will squash all commits on {} branch (no interactive confirmation requested)",
            branch
        )
    }
}

fn summary(report: &ResetReport, target: &RepositoryTarget, message: &CommitMessage) -> Vec<String> {
    if report.is_dry_run() {
        return vec!["Dry run completed. No changes were pushed to remote.".to_string()];
    }

    let mut lines = vec![format!(
        "Repository {} has been reset with message: '{}'",
        target.full_path(),
        message
    )];
    if report.warnings.is_empty() {
        lines.push("All tags and releases have been deleted.".to_string());
    } else {
        lines.push(format!(
            "Completed with {} warning(s); some tags or releases may remain.",
            report.warnings.len()
        ));
    }
    lines
}
