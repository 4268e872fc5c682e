//! Core library for semrel.
//!
//! This crate provides the host-independent pieces of the semrel release
//! plugin: version store providers, commit classification, version
//! resolution, and the release orchestration they feed into. The `semrel`
//! crate wires these into the host-facing lifecycle events.
//!
//! # Modules
//!
//! - [`classify`] - Commit-label classification rules
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`git`] - Git operations for the release flow
//! - [`provider`] - Version store adapters (composer.json / package.json)
//! - [`release`] - Version and publish step orchestration
//! - [`version`] - Bump kinds and next-version computation
//!
//! # Quick Start
//!
//! ```no_run
//! use camino::Utf8Path;
//! use semrel_core::provider;
//!
//! let provider = provider::detect_provider(Utf8Path::new("."))
//!     .expect("no version source in project root");
//!
//! println!("current version: {}", provider.previous_version().unwrap());
//! ```
#![deny(unsafe_code)]

pub mod classify;

pub mod config;

pub mod error;

pub mod git;

pub mod provider;

pub mod release;

pub mod version;

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{ConfigError, ConfigResult};

// Re-export semver so downstream crates don't need a direct dependency.
pub use semver;
