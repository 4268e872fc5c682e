//! Git operations for the release flow.
//!
//! Shells out to `git` for all operations. This ensures we inherit the
//! user's SSH keys, GPG signing, hooks, and other configuration. Every
//! operation runs against an explicit project root.

use std::process::Command;

use camino::Utf8Path;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::classify::Commit;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// Failed to execute the `git` command.
    #[error("failed to run git: {0}")]
    Exec(#[from] std::io::Error),

    /// `git` returned a non-zero exit code.
    #[error("git {command} failed: {stderr}")]
    Command {
        /// The git subcommand that failed (e.g., "push").
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// Not inside a git repository.
    #[error("not a git repository (or any parent up to mount point)")]
    NotARepo,
}

/// Result alias for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// Get the current branch name.
///
/// Returns `None` if in a detached HEAD state.
#[instrument]
pub fn current_branch(root: &Utf8Path) -> GitResult<Option<String>> {
    let output = git(root, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    let branch = output.trim().to_string();
    if branch == "HEAD" {
        debug!("detached HEAD");
        Ok(None)
    } else {
        debug!(%branch, "current branch");
        Ok(Some(branch))
    }
}

/// Commit all tracked modifications in one commit.
#[instrument]
pub fn commit_all(root: &Utf8Path, message: &str) -> GitResult<()> {
    git(root, &["commit", "-am", message])?;
    Ok(())
}

/// Create an annotated tag at HEAD.
#[instrument]
pub fn create_tag(root: &Utf8Path, tag: &str, message: &str) -> GitResult<()> {
    git(root, &["tag", tag, "-m", message])?;
    Ok(())
}

/// Push the branch and its tags together, setting the upstream.
#[instrument]
pub fn push(root: &Utf8Path, remote: &str, branch: &str) -> GitResult<()> {
    git(
        root,
        &["push", "--follow-tags", "--set-upstream", remote, branch],
    )?;
    Ok(())
}

/// Commits reachable from HEAD but not from `since`, newest first.
///
/// With `since = None`, every commit on the current branch is returned.
#[instrument]
pub fn commits_since(root: &Utf8Path, since: Option<&str>) -> GitResult<Vec<Commit>> {
    let range = since.map_or_else(|| "HEAD".to_string(), |tag| format!("{tag}..HEAD"));

    let output = git(root, &["log", &range, "--format=%h %s"])?;

    let commits: Vec<Commit> = output
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (hash, subject) = line.split_once(' ').unwrap_or((line, ""));
            Commit::new(hash, subject)
        })
        .collect();

    debug!(count = commits.len(), "commits since {range}");
    Ok(commits)
}

/// Run a git command in the project root and return its stdout.
fn git(root: &Utf8Path, args: &[&str]) -> GitResult<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root.as_std_path())
        .output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        // Detect "not a git repo" specifically
        if stderr.contains("not a git repository") {
            return Err(GitError::NotARepo);
        }

        Err(GitError::Command {
            command: args.first().unwrap_or(&"").to_string(),
            stderr,
        })
    }
}
