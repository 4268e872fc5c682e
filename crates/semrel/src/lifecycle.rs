//! Lifecycle events — the host-facing extension points.
//!
//! A release host drives plugins through a fixed set of named events.
//! Handlers run strictly sequentially: each runs to completion (including
//! any subprocess it awaits) before the next event fires. There is no
//! parallelism and no cancellation; a handler error propagates to the
//! host's dispatch, which decides overall run failure.

use std::fmt;

use semrel_core::classify::Commit;
use semrel_core::release::{PublishOutcome, VersionOutcome, VersionRequest};
use semrel_core::semver::Version;
use serde::Serialize;
use serde_json::Value;

use crate::plugin::PluginResult;

/// Named extension points a release host dispatches, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleEvent {
    /// Check host-supplied plugin options before anything else runs.
    ValidateConfig,
    /// Attach bump labels to a commit from the log.
    ParseCommit,
    /// Decide whether a commit is excluded from release consideration.
    OmitCommit,
    /// Report the current version from the version store.
    PreviousVersion,
    /// Compute and (unless dry-running) persist, commit, and tag the next version.
    Version,
    /// Run the optional publish script and push branch and tags.
    Publish,
}

impl LifecycleEvent {
    /// All events, in dispatch order.
    pub const ALL: &[Self] = &[
        Self::ValidateConfig,
        Self::ParseCommit,
        Self::OmitCommit,
        Self::PreviousVersion,
        Self::Version,
        Self::Publish,
    ];

    /// The stable event name hosts use for registration.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ValidateConfig => "validate-config",
            Self::ParseCommit => "parse-commit",
            Self::OmitCommit => "omit-commit",
            Self::PreviousVersion => "previous-version",
            Self::Version => "version",
            Self::Publish => "publish",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handlers for the release lifecycle, one per [`LifecycleEvent`].
///
/// The contracts are fixed; a host may dispatch however it likes as long
/// as it honors them and the sequential execution model.
pub trait ReleaseHooks {
    /// `validate-config`: inspect the options the host holds for the
    /// plugin addressed by `name`. Returns human-readable findings; an
    /// empty result means valid. Options addressed to another plugin must
    /// come back untouched (no findings).
    fn validate_config(&self, name: &str, options: &Value) -> Vec<String>;

    /// `parse-commit`: attach derived bump labels to the commit.
    /// Pull-request commits and subjects carrying the skip marker pass
    /// through with their existing labels unchanged.
    fn parse_commit(&self, commit: &mut Commit);

    /// `omit-commit`: `true` excludes the commit from release
    /// consideration entirely.
    fn omit_commit(&self, commit: &Commit) -> bool;

    /// `previous-version`: the current version from the version store.
    fn previous_version(&self) -> PluginResult<Version>;

    /// `version`: resolve the next version per the request and, on a live
    /// run, persist it, create the bump commit, and create the tag.
    fn version(&self, request: &VersionRequest) -> PluginResult<VersionOutcome>;

    /// `publish`: run the configured publish script (if any), then push
    /// the branch and its tags.
    fn publish(&self) -> PluginResult<PublishOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_kebab_case() {
        assert_eq!(LifecycleEvent::ValidateConfig.to_string(), "validate-config");
        assert_eq!(LifecycleEvent::ParseCommit.to_string(), "parse-commit");
        assert_eq!(LifecycleEvent::OmitCommit.to_string(), "omit-commit");
        assert_eq!(LifecycleEvent::PreviousVersion.to_string(), "previous-version");
        assert_eq!(LifecycleEvent::Version.to_string(), "version");
        assert_eq!(LifecycleEvent::Publish.to_string(), "publish");
    }

    #[test]
    fn serialization_matches_names() {
        for event in LifecycleEvent::ALL {
            let json = serde_json::to_string(event).unwrap();
            assert_eq!(json, format!("\"{event}\""));
        }
    }

    #[test]
    fn dispatch_order_starts_with_validation() {
        assert_eq!(LifecycleEvent::ALL.first(), Some(&LifecycleEvent::ValidateConfig));
        assert_eq!(LifecycleEvent::ALL.last(), Some(&LifecycleEvent::Publish));
    }
}
