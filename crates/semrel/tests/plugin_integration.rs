//! End-to-end plugin tests
//!
//! These tests drive the plugin against real temporary git repositories
//! (and a local bare "remote") to verify the release flow from a host's
//! perspective.

use camino::{Utf8Path, Utf8PathBuf};
use semrel::{PluginOptions, ReleaseHooks, SemrelPlugin};
use semrel_core::config::Config;
use semrel_core::release::{VersionOutcome, VersionRequest};
use serde_json::json;
use std::process::Command;

fn git(root: &Utf8Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(root.as_std_path())
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// A repo with a committed package.json at version 1.2.3.
fn release_project() -> (tempfile::TempDir, Utf8PathBuf) {
    let tmp = tempfile::TempDir::new().unwrap();
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();

    std::fs::write(
        root.join("package.json"),
        "{\n  \"name\": \"demo\",\n  \"version\": \"1.2.3\"\n}\n",
    )
    .unwrap();

    git(&root, &["init", "-q"]);
    git(&root, &["config", "user.email", "dev@example.com"]);
    git(&root, &["config", "user.name", "Dev"]);
    git(&root, &["add", "."]);
    git(&root, &["commit", "-q", "-m", "initial commit"]);

    (tmp, root)
}

fn plugin_for(root: &Utf8Path) -> SemrelPlugin {
    SemrelPlugin::with_config(root, PluginOptions::default(), Config::default()).unwrap()
}

// =============================================================================
// Version step
// =============================================================================

#[test]
fn version_step_writes_commits_and_tags() {
    let (_tmp, root) = release_project();
    let plugin = plugin_for(&root);

    let outcome = plugin.version(&VersionRequest::live("patch")).unwrap();
    match outcome {
        VersionOutcome::Released { version, tag } => {
            assert_eq!(version.to_string(), "1.2.4");
            assert_eq!(tag, "v1.2.4");
        }
        other => panic!("expected a release, got {other:?}"),
    }

    let manifest = std::fs::read_to_string(root.join("package.json")).unwrap();
    assert!(manifest.contains("\"version\": \"1.2.4\""));

    let subject = git(&root, &["log", "-1", "--format=%s"]);
    assert_eq!(subject.trim(), "Bump version to: v1.2.4 [skip ci]");

    let tags = git(&root, &["tag", "--list", "v1.2.4"]);
    assert_eq!(tags.trim(), "v1.2.4");

    // Annotated, not lightweight
    let kind = git(&root, &["cat-file", "-t", "v1.2.4"]);
    assert_eq!(kind.trim(), "tag");
}

#[test]
fn dry_run_reports_tag_and_mutates_nothing() {
    let (_tmp, root) = release_project();
    let plugin = plugin_for(&root);

    let outcome = plugin.version(&VersionRequest::dry_run("patch")).unwrap();
    assert!(matches!(outcome, VersionOutcome::DryRun { ref tag } if tag == "v1.2.4"));

    let manifest = std::fs::read_to_string(root.join("package.json")).unwrap();
    assert!(manifest.contains("\"version\": \"1.2.3\""));

    assert_eq!(git(&root, &["tag", "--list"]).trim(), "");
    assert_eq!(git(&root, &["rev-list", "--count", "HEAD"]).trim(), "1");
    assert_eq!(git(&root, &["status", "--porcelain"]).trim(), "");
}

#[test]
fn minor_bump_resolves_from_the_store() {
    let (_tmp, root) = release_project();
    let plugin = plugin_for(&root);

    let outcome = plugin.version(&VersionRequest::dry_run("minor")).unwrap();
    assert!(matches!(outcome, VersionOutcome::DryRun { ref tag } if tag == "v1.3.0"));
}

#[test]
fn tag_prefix_from_config_is_respected() {
    let (_tmp, root) = release_project();
    let config = Config {
        tag_prefix: "release-".to_string(),
        ..Config::default()
    };
    let plugin = SemrelPlugin::with_config(&root, PluginOptions::default(), config).unwrap();

    let outcome = plugin.version(&VersionRequest::live("patch")).unwrap();
    assert!(matches!(outcome, VersionOutcome::Released { ref tag, .. } if tag == "release-1.2.4"));
    assert_eq!(
        git(&root, &["tag", "--list", "release-1.2.4"]).trim(),
        "release-1.2.4"
    );
}

// =============================================================================
// Publish step
// =============================================================================

/// Wire a local bare repository in as `origin`.
fn add_bare_origin(root: &Utf8Path) -> (tempfile::TempDir, Utf8PathBuf) {
    let tmp = tempfile::TempDir::new().unwrap();
    let bare = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
    git(&bare, &["init", "-q", "--bare"]);
    git(root, &["remote", "add", "origin", bare.as_str()]);
    (tmp, bare)
}

#[test]
fn publish_pushes_branch_and_tags() {
    let (_tmp, root) = release_project();
    let (_remote_tmp, bare) = add_bare_origin(&root);
    let plugin = plugin_for(&root);

    plugin.version(&VersionRequest::live("patch")).unwrap();
    let outcome = plugin.publish().unwrap();
    assert!(!outcome.script_ran);
    assert_eq!(outcome.remote, "origin");

    let remote_tags = git(&bare, &["tag", "--list"]);
    assert_eq!(remote_tags.trim(), "v1.2.4");

    let branches = git(&bare, &["branch", "--list"]);
    assert!(branches.contains(&outcome.branch));
}

#[cfg(unix)]
#[test]
fn publish_invokes_the_release_script() {
    use std::os::unix::fs::PermissionsExt;

    let (_tmp, root) = release_project();
    let (_remote_tmp, _bare) = add_bare_origin(&root);

    let script = root.join("release.sh");
    std::fs::write(&script, "#!/bin/sh\necho \"$@\" > script-args.txt\n").unwrap();
    std::fs::set_permissions(
        script.as_std_path(),
        std::fs::Permissions::from_mode(0o755),
    )
    .unwrap();

    let options = PluginOptions {
        publish_script: Some("./release.sh".to_string()),
    };
    let plugin = SemrelPlugin::with_config(&root, options, Config::default()).unwrap();

    plugin.version(&VersionRequest::live("patch")).unwrap();
    let outcome = plugin.publish().unwrap();
    assert!(outcome.script_ran);

    let args = std::fs::read_to_string(root.join("script-args.txt")).unwrap();
    assert_eq!(args.trim(), format!("release origin {}", outcome.branch));
}

#[cfg(unix)]
#[test]
fn failing_release_script_aborts_before_push() {
    use std::os::unix::fs::PermissionsExt;

    let (_tmp, root) = release_project();
    let (_remote_tmp, bare) = add_bare_origin(&root);

    let script = root.join("release.sh");
    std::fs::write(&script, "#!/bin/sh\nexit 1\n").unwrap();
    std::fs::set_permissions(
        script.as_std_path(),
        std::fs::Permissions::from_mode(0o755),
    )
    .unwrap();

    let options = PluginOptions {
        publish_script: Some("./release.sh".to_string()),
    };
    let plugin = SemrelPlugin::with_config(&root, options, Config::default()).unwrap();

    plugin.version(&VersionRequest::live("patch")).unwrap();
    assert!(plugin.publish().is_err());

    // Nothing reached the remote
    assert_eq!(git(&bare, &["tag", "--list"]).trim(), "");
}

// =============================================================================
// Lifecycle contracts
// =============================================================================

#[test]
fn end_to_end_patch_release_from_one_two_three() {
    let (_tmp, root) = release_project();
    let plugin = plugin_for(&root);

    assert_eq!(plugin.previous_version().unwrap().to_string(), "1.2.3");

    let outcome = plugin.version(&VersionRequest::live("patch")).unwrap();
    assert!(matches!(
        outcome,
        VersionOutcome::Released { ref tag, .. } if tag == "v1.2.4"
    ));
    assert_eq!(plugin.previous_version().unwrap().to_string(), "1.2.4");
}

#[test]
fn validate_config_findings_round_trip_through_the_event() {
    let (_tmp, root) = release_project();
    let plugin = plugin_for(&root);

    assert!(plugin.validate_config("semrel", &json!({})).is_empty());
    assert!(
        plugin
            .validate_config("semrel", &json!({ "publishScript": "./release.sh" }))
            .is_empty()
    );
    assert_eq!(
        plugin
            .validate_config("semrel", &json!({ "publshScript": "./release.sh" }))
            .len(),
        1
    );
}

#[test]
fn unresolvable_bump_aborts_live_but_skips_dry() {
    let (_tmp, root) = release_project();
    let plugin = plugin_for(&root);

    assert!(plugin.version(&VersionRequest::live("gigantic")).is_err());
    assert!(matches!(
        plugin.version(&VersionRequest::dry_run("gigantic")).unwrap(),
        VersionOutcome::Skipped { .. }
    ));

    // Neither attempt touched the repository
    assert_eq!(git(&root, &["tag", "--list"]).trim(), "");
    assert_eq!(git(&root, &["rev-list", "--count", "HEAD"]).trim(), "1");
}
