//! Bump kinds and next-version computation.
//!
//! The resolver applies the increment rules hosts expect from npm-style
//! `semver.inc`: the plain kinds strip a pre-release before incrementing,
//! the `pre*` kinds start or advance a numeric pre-release sequence.

use std::fmt;
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from version operations.
#[derive(Error, Debug)]
pub enum VersionError {
    /// Failed to parse a semver string.
    #[error("invalid semver: {0}")]
    InvalidSemver(#[from] semver::Error),

    /// The requested bump kind is not one of the supported kinds.
    #[error("unrecognized bump kind: {0:?}")]
    UnknownBumpKind(String),
}

/// Result alias for version operations.
pub type VersionResult<T> = Result<T, VersionError>;

/// Requested magnitude of a version increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    /// Major release (X.0.0).
    Major,
    /// Minor release (x.Y.0).
    Minor,
    /// Patch release (x.y.Z).
    Patch,
    /// Next major, as a pre-release (X.0.0-0).
    Premajor,
    /// Next minor, as a pre-release (x.Y.0-0).
    Preminor,
    /// Next patch, as a pre-release (x.y.Z-0).
    Prepatch,
    /// Advance the pre-release sequence (or start one on the next patch).
    Prerelease,
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
            Self::Premajor => write!(f, "premajor"),
            Self::Preminor => write!(f, "preminor"),
            Self::Prepatch => write!(f, "prepatch"),
            Self::Prerelease => write!(f, "prerelease"),
        }
    }
}

impl FromStr for BumpKind {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            "premajor" => Ok(Self::Premajor),
            "preminor" => Ok(Self::Preminor),
            "prepatch" => Ok(Self::Prepatch),
            "prerelease" => Ok(Self::Prerelease),
            _ => Err(VersionError::UnknownBumpKind(s.to_string())),
        }
    }
}

/// Compute the next version by applying a bump kind.
///
/// A pre-release version "completes" to its release on the matching plain
/// kind (`1.3.0-2` + minor → `1.3.0`) rather than skipping ahead. Build
/// metadata is always dropped.
pub fn next_version(current: &Version, kind: BumpKind) -> Version {
    let mut next = current.clone();
    next.build = BuildMetadata::EMPTY;

    match kind {
        BumpKind::Major => {
            if next.minor != 0 || next.patch != 0 || next.pre.is_empty() {
                next.major += 1;
            }
            next.minor = 0;
            next.patch = 0;
            next.pre = Prerelease::EMPTY;
        }
        BumpKind::Minor => {
            if next.patch != 0 || next.pre.is_empty() {
                next.minor += 1;
            }
            next.patch = 0;
            next.pre = Prerelease::EMPTY;
        }
        BumpKind::Patch => {
            if next.pre.is_empty() {
                next.patch += 1;
            }
            next.pre = Prerelease::EMPTY;
        }
        BumpKind::Premajor => {
            next.major += 1;
            next.minor = 0;
            next.patch = 0;
            next.pre = pre_identifiers("0");
        }
        BumpKind::Preminor => {
            next.minor += 1;
            next.patch = 0;
            next.pre = pre_identifiers("0");
        }
        BumpKind::Prepatch => {
            next.patch += 1;
            next.pre = pre_identifiers("0");
        }
        BumpKind::Prerelease => {
            if next.pre.is_empty() {
                next.patch += 1;
                next.pre = pre_identifiers("0");
            } else {
                next.pre = advance_pre(&next.pre);
            }
        }
    }

    next
}

/// Parse a version string, stripping an optional `v` prefix.
pub fn parse_version(s: &str) -> VersionResult<Version> {
    let s = s.strip_prefix('v').unwrap_or(s);
    Ok(Version::parse(s)?)
}

/// Resolve the next version from host-supplied strings.
///
/// Returns `None` when the previous version string is not parseable or the
/// bump kind is unrecognized. How callers treat `None` depends on the run
/// mode: the release orchestrator aborts live runs and no-ops dry runs.
pub fn resolve(previous: &str, bump: &str) -> Option<Version> {
    let current = parse_version(previous).ok()?;
    let kind = bump.parse::<BumpKind>().ok()?;
    Some(next_version(&current, kind))
}

/// Build a pre-release from identifiers derived from valid input.
fn pre_identifiers(ids: &str) -> Prerelease {
    Prerelease::new(ids).unwrap_or(Prerelease::EMPTY)
}

/// Advance a non-empty pre-release: increment the rightmost numeric
/// identifier, or append `.0` when there is none.
fn advance_pre(pre: &Prerelease) -> Prerelease {
    let mut ids: Vec<String> = pre.as_str().split('.').map(str::to_string).collect();

    match ids
        .iter()
        .rposition(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
    {
        Some(i) => {
            let n: u64 = ids[i].parse().unwrap_or(0);
            ids[i] = (n + 1).to_string();
        }
        None => ids.push("0".to_string()),
    }

    pre_identifiers(&ids.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn bump_patch() {
        assert_eq!(next_version(&v("1.2.3"), BumpKind::Patch), v("1.2.4"));
    }

    #[test]
    fn bump_minor() {
        assert_eq!(next_version(&v("1.2.3"), BumpKind::Minor), v("1.3.0"));
    }

    #[test]
    fn bump_major() {
        assert_eq!(next_version(&v("1.2.3"), BumpKind::Major), v("2.0.0"));
    }

    #[test]
    fn plain_bumps_complete_a_pre_release() {
        assert_eq!(next_version(&v("1.2.3-alpha.1"), BumpKind::Patch), v("1.2.3"));
        assert_eq!(next_version(&v("1.3.0-0"), BumpKind::Minor), v("1.3.0"));
        assert_eq!(next_version(&v("2.0.0-rc.2"), BumpKind::Major), v("2.0.0"));
    }

    #[test]
    fn plain_bumps_advance_past_unrelated_pre_releases() {
        assert_eq!(next_version(&v("1.2.3-alpha"), BumpKind::Minor), v("1.3.0"));
        assert_eq!(next_version(&v("1.2.3-alpha"), BumpKind::Major), v("2.0.0"));
    }

    #[test]
    fn pre_kinds_start_a_zero_sequence() {
        assert_eq!(next_version(&v("1.2.3"), BumpKind::Premajor), v("2.0.0-0"));
        assert_eq!(next_version(&v("1.2.3"), BumpKind::Preminor), v("1.3.0-0"));
        assert_eq!(next_version(&v("1.2.3"), BumpKind::Prepatch), v("1.2.4-0"));
    }

    #[test]
    fn prerelease_starts_on_next_patch() {
        assert_eq!(next_version(&v("1.2.3"), BumpKind::Prerelease), v("1.2.4-0"));
    }

    #[test]
    fn prerelease_increments_numeric_identifier() {
        assert_eq!(next_version(&v("1.2.4-0"), BumpKind::Prerelease), v("1.2.4-1"));
        assert_eq!(
            next_version(&v("1.2.4-alpha.3"), BumpKind::Prerelease),
            v("1.2.4-alpha.4")
        );
    }

    #[test]
    fn prerelease_appends_when_no_numeric_identifier() {
        assert_eq!(
            next_version(&v("1.2.4-alpha"), BumpKind::Prerelease),
            v("1.2.4-alpha.0")
        );
    }

    #[test]
    fn build_metadata_is_dropped() {
        assert_eq!(next_version(&v("1.2.3+build.5"), BumpKind::Patch), v("1.2.4"));
    }

    #[test]
    fn every_kind_strictly_increases() {
        let kinds = [
            BumpKind::Major,
            BumpKind::Minor,
            BumpKind::Patch,
            BumpKind::Premajor,
            BumpKind::Preminor,
            BumpKind::Prepatch,
            BumpKind::Prerelease,
        ];
        let samples = ["0.1.0", "1.2.3", "1.0.0-0", "2.3.4-alpha.7", "10.0.0"];

        for previous in samples {
            let previous = v(previous);
            for kind in kinds {
                let next = next_version(&previous, kind);
                assert!(
                    next > previous,
                    "{kind} on {previous} produced non-increasing {next}"
                );
            }
        }
    }

    #[test]
    fn parse_with_v_prefix() {
        assert_eq!(parse_version("v1.2.3").unwrap(), v("1.2.3"));
    }

    #[test]
    fn parse_invalid() {
        assert!(parse_version("not-a-version").is_err());
    }

    #[test]
    fn bump_kind_round_trips_through_str() {
        for kind in ["major", "minor", "patch", "premajor", "preminor", "prepatch", "prerelease"] {
            assert_eq!(kind.parse::<BumpKind>().unwrap().to_string(), kind);
        }
    }

    #[test]
    fn bump_kind_parse_is_case_insensitive() {
        assert_eq!("Patch".parse::<BumpKind>().unwrap(), BumpKind::Patch);
    }

    #[test]
    fn bump_kind_parse_rejects_unknown() {
        assert!("release".parse::<BumpKind>().is_err());
    }

    #[test]
    fn resolve_happy_path() {
        assert_eq!(resolve("1.2.3", "patch"), Some(v("1.2.4")));
    }

    #[test]
    fn resolve_tolerates_v_prefix() {
        assert_eq!(resolve("v1.2.3", "minor"), Some(v("1.3.0")));
    }

    #[test]
    fn resolve_returns_none_on_bad_input() {
        assert_eq!(resolve("garbage", "patch"), None);
        assert_eq!(resolve("1.2.3", "gigantic"), None);
    }
}
