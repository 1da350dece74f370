//! git::tags
//!
//! Tag enumeration for a local clone.

use std::path::Path;

use super::runner::{CommandError, GitRunner};

/// List all tags of the repository checked out at `repo_dir`.
///
/// A repository without tags yields an empty list.
///
/// # Errors
///
/// Returns `CommandError` if `git tag` fails.
pub async fn list_tags(git: &dyn GitRunner, repo_dir: &Path) -> Result<Vec<String>, CommandError> {
    let output = git.run(repo_dir, &["tag"]).await?;
    Ok(parse_tag_list(&output.stdout))
}

/// Parse the newline-delimited output of `git tag`.
///
/// Blank lines are dropped, so empty output is an empty list rather than a
/// list holding one empty name.
///
/// ```
/// use resetit::git::parse_tag_list;
///
/// assert!(parse_tag_list("").is_empty());
/// assert_eq!(parse_tag_list("v1.0.0\nv1.1.0\n"), vec!["v1.0.0", "v1.1.0"]);
/// ```
pub fn parse_tag_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
