//! Configuration loading and discovery.
//!
//! A host would normally supply the tag prefix, remote, and base branch;
//! standing alone, semrel discovers them from a config file by:
//! 1. Walking up from the project root to find project config
//! 2. Loading user config from the platform config directory
//! 3. Merging with sensible defaults
//!
//! # Supported formats
//!
//! - TOML (`.toml`)
//! - JSON (`.json`)
//!
//! # Config file locations (in order of precedence, highest first):
//! - `.semrel.<ext>` in the project root or any parent
//! - `semrel.<ext>` in the project root or any parent
//! - `~/.config/semrel/config.<ext>` (user config)
//!
//! Where `<ext>` is one of: `toml`, `json`. A missing config file is not
//! an error; defaults apply.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use semrel_core::config::ConfigLoader;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let config = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! assert_eq!(config.tag_prefix, "v");
//! ```

use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Format, Json, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// The configuration for semrel.
///
/// Every field has a default; config files only override.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level hint for the embedding application.
    pub log_level: LogLevel,
    /// Prefix prepended to release tags (e.g. `v` → `v1.2.3`).
    pub tag_prefix: String,
    /// Remote that receives the release push.
    pub remote: String,
    /// Branch pushed when the current branch cannot be determined.
    pub base_branch: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            tag_prefix: "v".to_string(),
            remote: "origin".to_string(),
            base_branch: "main".to_string(),
        }
    }
}

/// Log level for the application.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Normal operational detail.
    #[default]
    Info,
    /// Developer detail.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// The level as a `tracing`/`RUST_LOG`-compatible string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Discovers and loads configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<Utf8PathBuf>,
    project_root: Option<Utf8PathBuf>,
    user_config: bool,
}

impl ConfigLoader {
    /// Create a loader with no sources; [`load`](Self::load) then yields defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an explicit file (highest precedence). The file must exist.
    #[must_use]
    pub fn with_file(mut self, path: &Utf8Path) -> Self {
        self.file = Some(path.to_owned());
        self
    }

    /// Search `root` and its parents for project config.
    #[must_use]
    pub fn with_project_search(mut self, root: &Utf8Path) -> Self {
        self.project_root = Some(root.to_owned());
        self
    }

    /// Also merge user-level config from the platform config directory.
    #[must_use]
    pub const fn with_user_config(mut self, enabled: bool) -> Self {
        self.user_config = enabled;
        self
    }

    /// Merge all configured sources over the defaults.
    pub fn load(&self) -> ConfigResult<Config> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if self.user_config
            && let Some(dirs) = directories::ProjectDirs::from("", "", "semrel")
        {
            for ext in EXTENSIONS {
                let candidate = dirs.config_dir().join(format!("config.{ext}"));
                if candidate.is_file() {
                    figment = merge_file(figment, &candidate);
                }
            }
        }

        if let Some(ref root) = self.project_root
            && let Some(found) = discover(root)
        {
            figment = merge_file(figment, found.as_std_path());
        }

        if let Some(ref file) = self.file {
            if !file.is_file() {
                return Err(ConfigError::NotFound(file.clone()));
            }
            figment = merge_file(figment, file.as_std_path());
        }

        figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))
    }
}

const EXTENSIONS: [&str; 2] = ["toml", "json"];

/// Find the nearest project config file, walking up from `root`.
fn discover(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut dir = Some(root);
    while let Some(d) = dir {
        for name in [".semrel", "semrel"] {
            for ext in EXTENSIONS {
                let candidate = d.join(format!("{name}.{ext}"));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        dir = d.parent();
    }
    None
}

/// Merge one file into the figment, picking the provider by extension.
fn merge_file(figment: Figment, path: &Path) -> Figment {
    if path.extension().is_some_and(|ext| ext == "json") {
        figment.merge(Json::file(path))
    } else {
        figment.merge(Toml::file(path))
    }
}
