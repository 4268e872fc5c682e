//! Release orchestration — the version and publish steps.
//!
//! [`ReleaseFlow`] sequences the two host-driven steps of a release:
//!
//! 1. **Version** — resolve the next version from the store and the
//!    requested bump kind; unless dry-running, persist it, create the
//!    version-bump commit, and create the annotated tag.
//! 2. **Publish** — run the optional external publish script, then push
//!    the branch and its tags together.
//!
//! Each step is a single external call; no step is retried. Any failure
//! aborts the remaining sequence. An unresolvable bump aborts a live run
//! before anything is written; on a dry run it logs and reports a skipped
//! outcome instead.

use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use semver::Version;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::git;
use crate::provider::VersionProvider;
use crate::version;

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Errors from the release flow.
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// The next version could not be resolved on a live run.
    #[error("cannot resolve next version from {previous:?} with bump {bump:?}")]
    UnresolvableBump {
        /// The stored previous version.
        previous: String,
        /// The requested bump kind.
        bump: String,
    },

    /// The external publish script failed.
    #[error("publish script {script} failed: {message}")]
    PublishScriptFailed {
        /// The configured script path.
        script: String,
        /// Captured stderr, or the spawn error.
        message: String,
    },

    /// Version store error.
    #[error(transparent)]
    Provider(#[from] crate::provider::ProviderError),

    /// Git error.
    #[error(transparent)]
    Git(#[from] crate::git::GitError),
}

/// Result alias for release operations.
pub type ReleaseResult<T> = Result<T, ReleaseError>;

// ──────────────────────────────────────────────
// Requests and outcomes
// ──────────────────────────────────────────────

/// A version-step request, as supplied by the host.
#[derive(Debug, Clone)]
pub struct VersionRequest {
    /// Requested bump kind (e.g. `"patch"`), still in host string form.
    pub bump: String,
    /// Compute and report without mutating anything.
    pub dry_run: bool,
    /// On a dry run, keep reporting down to the computed tag alone.
    pub quiet: bool,
}

impl VersionRequest {
    /// A live (mutating) request for the given bump kind.
    pub fn live(bump: impl Into<String>) -> Self {
        Self {
            bump: bump.into(),
            dry_run: false,
            quiet: false,
        }
    }

    /// A dry-run request for the given bump kind.
    pub fn dry_run(bump: impl Into<String>) -> Self {
        Self {
            bump: bump.into(),
            dry_run: true,
            quiet: false,
        }
    }
}

/// Outcome of the version step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum VersionOutcome {
    /// Dry run: the tag that would have been created. Nothing was mutated.
    DryRun {
        /// The computed (prefixed) tag.
        tag: String,
    },
    /// Live run: version written, bump commit and annotated tag created.
    Released {
        /// The new version.
        version: Version,
        /// The created tag.
        tag: String,
    },
    /// Dry run with an unresolvable bump: nothing to do.
    Skipped {
        /// Why no release was computed.
        reason: String,
    },
}

/// Outcome of the publish step.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    /// The branch that was pushed.
    pub branch: String,
    /// The remote that was pushed to.
    pub remote: String,
    /// Whether the external publish script ran.
    pub script_ran: bool,
}

// ──────────────────────────────────────────────
// Flow
// ──────────────────────────────────────────────

/// Sequences version write, commit, tag, publish script, and push.
pub struct ReleaseFlow {
    provider: Box<dyn VersionProvider>,
    config: Config,
    root: Utf8PathBuf,
}

impl ReleaseFlow {
    /// Create a flow over an already-selected version provider.
    pub fn new(
        root: impl Into<Utf8PathBuf>,
        provider: Box<dyn VersionProvider>,
        config: Config,
    ) -> Self {
        Self {
            provider,
            config,
            root: root.into(),
        }
    }

    /// Read the previous version from the store.
    pub fn previous_version(&self) -> ReleaseResult<Version> {
        Ok(self.provider.previous_version()?)
    }

    /// Format the release tag for a version using the configured prefix.
    pub fn tag_for(&self, version: &Version) -> String {
        format!("{}{version}", self.config.tag_prefix)
    }

    /// Execute the version step.
    ///
    /// Order: resolve, then (live runs only) write the new version, create
    /// the bump commit, create the annotated tag. A dry run stops after
    /// resolution and reports the computed tag; an unresolvable bump is
    /// fatal on a live run and a logged no-op on a dry run.
    #[instrument(skip(self), fields(bump = %request.bump, dry_run = request.dry_run))]
    pub fn version(&self, request: &VersionRequest) -> ReleaseResult<VersionOutcome> {
        let previous = self.provider.previous_version()?;
        let previous = previous.to_string();

        let Some(next) = version::resolve(&previous, &request.bump) else {
            if request.dry_run {
                info!(%previous, bump = %request.bump, "no release computable, doing nothing");
                return Ok(VersionOutcome::Skipped {
                    reason: format!(
                        "no release computable from {previous} with bump {:?}",
                        request.bump
                    ),
                });
            }
            return Err(ReleaseError::UnresolvableBump {
                previous,
                bump: request.bump.clone(),
            });
        };

        info!(%next, "calculated new version");
        let tag = self.tag_for(&next);

        if request.dry_run {
            if request.quiet {
                debug!(%tag, "dry run");
            } else {
                info!(%tag, "would have published");
            }
            return Ok(VersionOutcome::DryRun { tag });
        }

        self.provider.write_version(&next)?;
        git::commit_all(&self.root, &format!("Bump version to: {tag} [skip ci]"))?;
        git::create_tag(&self.root, &tag, &format!("Update version to {tag}"))?;

        info!(%tag, "versioned repository");
        Ok(VersionOutcome::Released { version: next, tag })
    }

    /// Execute the publish step.
    ///
    /// Runs the publish script (when one is configured) as
    /// `<script> release <remote> <branch>`, then pushes the branch and
    /// its tags together. The branch is the current branch, falling back
    /// to the configured base branch when HEAD is detached.
    #[instrument(skip(self, publish_script))]
    pub fn publish(&self, publish_script: Option<&str>) -> ReleaseResult<PublishOutcome> {
        let branch = git::current_branch(&self.root)?
            .unwrap_or_else(|| self.config.base_branch.clone());
        let remote = self.config.remote.as_str();

        let script_ran = if let Some(script) = publish_script {
            info!(%script, "calling publish script");
            run_publish_script(&self.root, script, remote, &branch)?;
            true
        } else {
            info!("no publish script configured, skipping");
            false
        };

        info!(%remote, %branch, "pushing branch and tags");
        git::push(&self.root, remote, &branch)?;

        Ok(PublishOutcome {
            branch,
            remote: remote.to_string(),
            script_ran,
        })
    }
}

/// Invoke the publish script with the fixed argument shape.
fn run_publish_script(
    root: &Utf8Path,
    script: &str,
    remote: &str,
    branch: &str,
) -> ReleaseResult<()> {
    let output = Command::new(script)
        .args(["release", remote, branch])
        .current_dir(root.as_std_path())
        .output()
        .map_err(|e| ReleaseError::PublishScriptFailed {
            script: script.to_string(),
            message: format!("failed to execute: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ReleaseError::PublishScriptFailed {
            script: script.to_string(),
            message: stderr,
        });
    }

    Ok(())
}
