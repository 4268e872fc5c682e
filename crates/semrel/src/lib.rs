//! Host-agnostic release plugin.
//!
//! semrel packages two concerns behind one plugin surface: deriving and
//! writing semantic versions through a version-file provider
//! (`composer.json` or `package.json`), and mapping commit-message
//! prefixes to bump labels while orchestrating the tag-and-push release
//! flow.
//!
//! A release host drives the plugin through the named lifecycle events in
//! [`lifecycle`]; the logic itself lives in `semrel-core` and carries no
//! host coupling.
//!
//! # Structure
//!
//! - [`lifecycle`] - Named lifecycle events and the [`ReleaseHooks`] contract
//! - [`options`] - Host-supplied plugin options and their validation
//! - [`plugin`] - [`SemrelPlugin`], the wiring of core into the events
//!
//! # Quick Start
//!
//! ```no_run
//! use camino::Utf8Path;
//! use semrel::{ReleaseHooks, SemrelPlugin};
//! use semrel_core::release::VersionRequest;
//!
//! let plugin = SemrelPlugin::new(
//!     Utf8Path::new("."),
//!     &serde_json::json!({ "publishScript": "./scripts/release.sh" }),
//! )
//! .expect("plugin failed to start");
//!
//! let outcome = plugin.version(&VersionRequest::dry_run("patch")).unwrap();
//! println!("{}", serde_json::to_string(&outcome).unwrap());
//! ```
#![deny(unsafe_code)]

pub mod lifecycle;

pub mod options;

pub mod plugin;

pub use lifecycle::{LifecycleEvent, ReleaseHooks};

pub use options::PluginOptions;

pub use plugin::{PLUGIN_NAME, PluginError, PluginResult, SemrelPlugin};

// Re-export the core so hosts can reach the underlying types.
pub use semrel_core;
