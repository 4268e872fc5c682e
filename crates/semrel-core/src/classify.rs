//! Commit classification — mapping subject prefixes to bump labels.
//!
//! The rule table is immutable configuration: a commit subject is matched
//! case-insensitively against the prefixes in table order, and the first
//! match contributes its labels. Commits that arrived through a pull
//! request (already labeled there) and subjects carrying the skip marker
//! pass through untouched; automated merge commits are excluded from
//! release consideration entirely.

use serde::Serialize;
use tracing::debug;

/// Subjects containing this marker are passed through unclassified.
pub const SKIP_MARKER: &str = "skip ci";

/// Automated merge commits carry this prefix and are excluded entirely.
pub const MERGE_PREFIX: &str = "Merge remote-tracking branch";

/// Ordered subject-prefix → labels table. The first matching prefix wins.
pub const LABEL_RULES: &[(&str, &[&str])] = &[
    ("fix", &["patch"]),
    ("hotfix", &["patch"]),
    ("feat", &["feature"]),
    ("add", &["feature"]),
    ("new", &["feature"]),
    ("pef", &["performance"]),
    ("!break", &["major"]),
];

/// A commit under release consideration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Short hash from the log.
    pub hash: String,
    /// Subject line.
    pub subject: String,
    /// Pull request number, when the commit came in through one.
    pub pull_request: Option<u64>,
    /// Bump-category labels, insertion-deduplicated.
    pub labels: Vec<String>,
}

impl Commit {
    /// Build an unlabeled commit from a log entry.
    pub fn new(hash: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            subject: subject.into(),
            pull_request: None,
            labels: Vec::new(),
        }
    }
}

/// Attach bump-category labels derived from the commit subject.
///
/// Derived labels are unioned into the existing set — new labels first,
/// then the existing labels in their original relative order, with
/// duplicates dropped. Classifying an already-classified commit again is a
/// no-op, as is classifying a pull-request commit or a subject containing
/// [`SKIP_MARKER`].
pub fn classify_commit(commit: &mut Commit) {
    if commit.pull_request.is_some() || commit.subject.contains(SKIP_MARKER) {
        return;
    }

    let Some(derived) = match_labels(&commit.subject) else {
        return;
    };

    let mut labels: Vec<String> = Vec::with_capacity(derived.len() + commit.labels.len());
    for label in derived
        .iter()
        .map(|label| (*label).to_string())
        .chain(commit.labels.drain(..))
    {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    commit.labels = labels;

    debug!(hash = %commit.hash, labels = ?commit.labels, "classified commit");
}

/// Whether a commit is excluded from release consideration entirely.
pub fn should_omit(commit: &Commit) -> bool {
    commit.subject.starts_with(MERGE_PREFIX)
}

/// Labels for the first rule prefix the lowercased subject starts with.
fn match_labels(subject: &str) -> Option<&'static [&'static str]> {
    let subject = subject.to_lowercase();
    LABEL_RULES
        .iter()
        .find(|(prefix, _)| subject.starts_with(prefix))
        .map(|(_, labels)| *labels)
}
