//! The semrel plugin — core logic wired into the lifecycle events.

use camino::Utf8Path;
use semrel_core::classify::{self, Commit};
use semrel_core::config::{Config, ConfigLoader};
use semrel_core::provider;
use semrel_core::release::{PublishOutcome, ReleaseFlow, VersionOutcome, VersionRequest};
use semrel_core::semver::Version;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::lifecycle::ReleaseHooks;
use crate::options::{self, PluginOptions};

/// The plugin name hosts address options and events to.
pub const PLUGIN_NAME: &str = "semrel";

/// Errors surfaced to the host dispatcher.
#[derive(Error, Debug)]
pub enum PluginError {
    /// The startup probe found no version source; the plugin cannot run.
    #[error("semrel failed to start: {0}")]
    Startup(#[from] provider::ProviderError),

    /// The host-supplied options did not deserialize.
    #[error("invalid plugin options: {0}")]
    Options(#[from] serde_json::Error),

    /// Configuration failed to load.
    #[error(transparent)]
    Config(#[from] semrel_core::error::ConfigError),

    /// A release step failed.
    #[error(transparent)]
    Release(#[from] semrel_core::release::ReleaseError),
}

/// Result alias for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// A release plugin bound to one project root.
///
/// Construction is where the fatal checks happen: the version source is
/// probed once, and the options must deserialize. Afterwards the instance
/// holds no mutable state of its own — the version store and the git
/// repository are the only state a release cycle touches.
pub struct SemrelPlugin {
    flow: ReleaseFlow,
    options: PluginOptions,
}

impl SemrelPlugin {
    /// Construct the plugin for `root` with host-supplied options.
    ///
    /// Probes for a version source (`composer.json`, then `package.json`)
    /// and loads configuration discovered from `root`. Fails fatally when
    /// neither backing file exists.
    #[instrument(skip(options), fields(%root))]
    pub fn new(root: &Utf8Path, options: &Value) -> PluginResult<Self> {
        let options = PluginOptions::from_value(options)?;
        let config = ConfigLoader::new().with_project_search(root).load()?;
        Self::with_config(root, options, config)
    }

    /// Construct with explicit options and config, bypassing discovery.
    pub fn with_config(
        root: &Utf8Path,
        options: PluginOptions,
        config: Config,
    ) -> PluginResult<Self> {
        let provider = provider::detect_provider(root)?;
        let flow = ReleaseFlow::new(root.to_owned(), provider, config);
        debug!(publish_script = ?options.publish_script, "plugin initialized");
        Ok(Self { flow, options })
    }
}

impl ReleaseHooks for SemrelPlugin {
    fn validate_config(&self, name: &str, options: &Value) -> Vec<String> {
        if name != PLUGIN_NAME {
            return Vec::new();
        }
        options::validate(options)
    }

    fn parse_commit(&self, commit: &mut Commit) {
        classify::classify_commit(commit);
    }

    fn omit_commit(&self, commit: &Commit) -> bool {
        classify::should_omit(commit)
    }

    fn previous_version(&self) -> PluginResult<Version> {
        Ok(self.flow.previous_version()?)
    }

    fn version(&self, request: &VersionRequest) -> PluginResult<VersionOutcome> {
        Ok(self.flow.version(request)?)
    }

    fn publish(&self) -> PluginResult<PublishOutcome> {
        Ok(self.flow.publish(self.options.publish_script.as_deref())?)
    }
}
