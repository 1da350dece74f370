//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Flags
//!
//! - `--repo` / `-r`: Repository path (`owner/repo` or `group/subgroup/repo`)
//! - `--token` / `-t`: Access token (also `RESETIT_TOKEN`)
//! - `--provider` / `-p`: `github` or `gitlab`
//! - `--gitlab-url` / `-g`: GitLab instance URL
//! - `--dry-run` / `-d`: Simulate without touching the remote
//! - `--no-interactive` / `-n`: Never prompt
//! - `--message` / `-m`: Commit message for the new root commit
//! - `--branch` / `-b`: Primary branch to rewrite
//! - `--workspace`: Parent directory for the scratch clone
//! - `--debug`: Show git output and internal details
//! - `--quiet` / `-q`: Minimal output; implies --no-interactive

use clap::Parser;
use std::path::PathBuf;

use crate::core::types::Provider;

/// resetit - Reset a remote Git repository to a single clean commit
#[derive(Parser, Debug)]
#[command(name = "resetit")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Examples:
  # Interactive mode with custom commit message:
  resetit -r owner/repo -t <token> -m \"feat: fresh start\"

  # Non-interactive mode with custom commit message:
  resetit -r owner/repo -t <token> -n -m \"feat: fresh start\"

  # Dry run with default commit message:
  resetit -r owner/repo -t <token> -d -n")]
pub struct Cli {
    /// Repository path (e.g., owner/repo or group/subgroup/repo)
    #[arg(short, long)]
    pub repo: String,

    /// Personal access token
    #[arg(short, long, env = "RESETIT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Git provider (github or gitlab) [default: github]
    #[arg(short, long)]
    pub provider: Option<Provider>,

    /// GitLab instance URL (for private instances) [default: https://gitlab.com]
    #[arg(short, long)]
    pub gitlab_url: Option<String>,

    /// Perform a dry run without pushing anything
    #[arg(short, long)]
    pub dry_run: bool,

    /// Run without interactive prompts (uses the default commit message if -m is not provided)
    #[arg(short, long)]
    pub no_interactive: bool,

    /// Commit message (skips the message prompt)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Primary branch to rewrite [default: main]
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Parent directory for the per-run scratch clone [default: system temp]
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// `--no-interactive` and `--quiet` always win; otherwise the
    /// configured default applies.
    pub fn interactive(&self, configured: bool) -> bool {
        if self.no_interactive || self.quiet {
            false
        } else {
            configured
        }
    }
}
