//! Version store adapters.
//!
//! A project keeps its current version in exactly one of two backing
//! files: `composer.json` (read and written through the `composer` CLI so
//! its own normalization applies) or `package.json` (read and written
//! directly, round-tripping the document so nothing but the version field
//! changes). The backing store is probed once, at startup.

use std::fs;
use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use semver::Version;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::version::parse_version;

/// Marker file for the composer-backed store.
pub const COMPOSER_MANIFEST: &str = "composer.json";

/// Marker file for the package.json-backed store.
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Errors from version store operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Neither backing file exists in the project root.
    #[error("no version source found (expected composer.json or package.json in {root})")]
    NoVersionSource {
        /// The probed project root.
        root: Utf8PathBuf,
    },

    /// The `composer` command failed.
    #[error("composer failed: {message}")]
    ComposerFailed {
        /// Captured stderr, or the spawn error.
        message: String,
    },

    /// Reading or writing the backing file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The backing file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not valid JSON.
    #[error("{path} is not valid JSON: {source}")]
    Json {
        /// The backing file.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The backing file has no usable version field.
    #[error("{path} has no \"version\" string field")]
    MissingVersion {
        /// The backing file.
        path: Utf8PathBuf,
    },

    /// The stored version is not valid semver.
    #[error(transparent)]
    Version(#[from] crate::version::VersionError),
}

/// Result alias for version store operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// A version store: one place a project keeps its current version.
///
/// Exactly two operations; implementations must round-trip cleanly so that
/// a write followed by a read yields the identical version.
pub trait VersionProvider {
    /// Read the current version from the store.
    fn previous_version(&self) -> ProviderResult<Version>;

    /// Persist a new version to the store.
    fn write_version(&self, version: &Version) -> ProviderResult<()>;
}

/// Which backing file a project uses for its version field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    /// `composer.json`, accessed through the `composer` CLI.
    Composer,
    /// `package.json`, accessed directly.
    PackageJson,
}

/// Probe the project root for a version source.
///
/// `composer.json` wins when both files exist. Returns `None` when neither
/// is present.
pub fn detect_source(root: &Utf8Path) -> Option<VersionSource> {
    if root.join(COMPOSER_MANIFEST).is_file() {
        return Some(VersionSource::Composer);
    }
    if root.join(PACKAGE_MANIFEST).is_file() {
        return Some(VersionSource::PackageJson);
    }
    None
}

/// Probe the project root and construct the matching provider.
///
/// Fails with [`ProviderError::NoVersionSource`] when neither backing file
/// exists; callers treat this as fatal at startup.
#[instrument(fields(%root))]
pub fn detect_provider(root: &Utf8Path) -> ProviderResult<Box<dyn VersionProvider>> {
    match detect_source(root) {
        Some(VersionSource::Composer) => {
            debug!("selected composer.json version source");
            Ok(Box::new(ComposerProvider::new(root.to_path_buf())))
        }
        Some(VersionSource::PackageJson) => {
            debug!("selected package.json version source");
            Ok(Box::new(PackageJsonProvider::new(root.to_path_buf())))
        }
        None => Err(ProviderError::NoVersionSource {
            root: root.to_owned(),
        }),
    }
}

// ──────────────────────────────────────────────
// Composer
// ──────────────────────────────────────────────

/// Version store backed by `composer config version`.
#[derive(Debug, Clone)]
pub struct ComposerProvider {
    root: Utf8PathBuf,
}

impl ComposerProvider {
    /// Create a provider rooted at the project directory.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl VersionProvider for ComposerProvider {
    fn previous_version(&self) -> ProviderResult<Version> {
        debug!("reading version from composer.json");
        let stdout = composer(&self.root, &["config", "version"])?;
        Ok(parse_version(stdout.trim())?)
    }

    fn write_version(&self, version: &Version) -> ProviderResult<()> {
        debug!(%version, "writing version to composer.json");
        composer(&self.root, &["config", "version", &version.to_string()])?;
        Ok(())
    }
}

/// Run a composer subcommand in the project root and return its stdout.
fn composer(root: &Utf8Path, args: &[&str]) -> ProviderResult<String> {
    let output = Command::new("composer")
        .args(args)
        .current_dir(root.as_std_path())
        .output()
        .map_err(|e| ProviderError::ComposerFailed {
            message: format!("failed to execute: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ProviderError::ComposerFailed { message: stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

// ──────────────────────────────────────────────
// package.json
// ──────────────────────────────────────────────

/// Version store backed by the `version` field of `package.json`.
///
/// Writes round-trip the whole document: parse, replace one field,
/// pretty-print with two-space indentation and a trailing newline. Key
/// order and all other content are preserved.
#[derive(Debug, Clone)]
pub struct PackageJsonProvider {
    root: Utf8PathBuf,
}

impl PackageJsonProvider {
    /// Create a provider rooted at the project directory.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn manifest_path(&self) -> Utf8PathBuf {
        self.root.join(PACKAGE_MANIFEST)
    }

    fn read_manifest(&self) -> ProviderResult<Value> {
        let path = self.manifest_path();
        let raw = fs::read_to_string(&path).map_err(|source| ProviderError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ProviderError::Json { path, source })
    }
}

impl VersionProvider for PackageJsonProvider {
    fn previous_version(&self) -> ProviderResult<Version> {
        debug!("reading version from package.json");
        let manifest = self.read_manifest()?;
        let version = manifest
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::MissingVersion {
                path: self.manifest_path(),
            })?;
        Ok(parse_version(version)?)
    }

    fn write_version(&self, version: &Version) -> ProviderResult<()> {
        debug!(%version, "writing version to package.json");
        let path = self.manifest_path();

        let mut manifest = self.read_manifest()?;
        let Value::Object(fields) = &mut manifest else {
            return Err(ProviderError::MissingVersion { path });
        };
        fields.insert("version".to_string(), Value::String(version.to_string()));

        let mut rendered =
            serde_json::to_string_pretty(&manifest).map_err(|source| ProviderError::Json {
                path: path.clone(),
                source,
            })?;
        rendered.push('\n');

        fs::write(&path, rendered).map_err(|source| ProviderError::Io { path, source })
    }
}
