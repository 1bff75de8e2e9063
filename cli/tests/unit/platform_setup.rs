//! Tests for the init, update, artifacts, and config store services.

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use agentdeck_cli::application::services::artifacts::{ArtifactsDir, artifacts_path};
use agentdeck_cli::application::services::config_store;
use agentdeck_cli::application::services::platform_init::{
    CORE_IMAGES, TEMPLATE_REPO_URL, clone_template, ensure_empty_target, hub_org_login, pull_images,
};
use agentdeck_cli::application::services::platform_update::{PLATFORM_IMAGES, update_platform};
use agentdeck_cli::domain::error::{ConfigError, PlatformError};

use crate::helpers::{THREE_AGENTS, err_output};
use crate::mocks::{MemFs, MockRunner, MockRuntime, RecordingReporter};

// ── init ──────────────────────────────────────────────────────────────────────

#[test]
fn test_non_empty_target_is_refused() {
    let fs = MemFs::default().with_file("/work/app/README.md", "hi");
    let err = ensure_empty_target(&fs, Path::new("/work/app")).expect_err("not empty");
    assert!(matches!(
        err.downcast_ref::<PlatformError>(),
        Some(PlatformError::TargetNotEmpty(_))
    ));
    ensure_empty_target(&fs, Path::new("/work/other")).expect("missing dir is fine");
}

#[tokio::test]
async fn test_clone_failure_hides_token() {
    let runner = MockRunner::new(err_output(128, b"fatal: Authentication failed"));
    let url = "https://ghp_secret@github.com/agentsystems/agent-platform-deployments.git";
    let err = clone_template(&runner, url, "main", Path::new("/work/app"))
        .await
        .expect_err("clone fails");

    let message = format!("{err:#}");
    assert!(!message.contains("ghp_secret"), "token leaked: {message}");
    assert!(message.contains(TEMPLATE_REPO_URL));
    assert_eq!(runner.calls()[0][..4], ["git", "clone", "--branch", "main"]);
}

#[tokio::test]
async fn test_hub_org_login_uses_org_account() {
    let runtime = MockRuntime::new();
    hub_org_login(&runtime, "dckr_oat").await.expect("login");
    assert_eq!(runtime.calls(), vec!["login docker.io agentsystems"]);
}

#[tokio::test]
async fn test_pull_images_stops_at_first_failure() {
    let runtime = MockRuntime::new().failing_pull(CORE_IMAGES[0]);
    let err = pull_images(&runtime, CORE_IMAGES, &RecordingReporter::default())
        .await
        .expect_err("pull fails");
    assert!(format!("{err:#}").contains(CORE_IMAGES[0]));
    assert_eq!(runtime.calls_of("pull").len(), 1);
}

// ── update ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_requires_config_file() {
    let runtime = MockRuntime::new();
    let err = update_platform(
        &MemFs::default(),
        &runtime,
        &RecordingReporter::default(),
        Path::new("/srv/deploy"),
    )
    .await
    .expect_err("no config");
    assert!(err.to_string().contains("No agentdeck-config.yml found"));
    assert!(runtime.calls().is_empty());
}

#[tokio::test]
async fn test_update_pulls_platform_images() {
    let fs = MemFs::default().with_file("/srv/deploy/agentdeck-config.yml", THREE_AGENTS);
    let runtime = MockRuntime::new();
    update_platform(&fs, &runtime, &RecordingReporter::default(), Path::new("/srv/deploy"))
        .await
        .expect("update");
    let expected: Vec<String> = PLATFORM_IMAGES.iter().map(|i| format!("pull {i}")).collect();
    assert_eq!(runtime.calls(), expected);
}

// ── artifacts ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_artifacts_path_joins_thread_and_dir() {
    let runtime = MockRuntime::new().with_volumes(&["agentdeck_artifacts"]);
    let path = artifacts_path(&runtime, "thread-42", ArtifactsDir::Out)
        .await
        .expect("path");
    assert_eq!(
        path,
        PathBuf::from("/var/lib/docker/volumes/agentdeck_artifacts/_data/thread-42/out")
    );
}

#[tokio::test]
async fn test_artifacts_path_rejects_traversal() {
    let runtime = MockRuntime::new().with_volumes(&["agentdeck_artifacts"]);
    for bad in ["", ".", "..", "a/b", "..\\x"] {
        assert!(
            artifacts_path(&runtime, bad, ArtifactsDir::In).await.is_err(),
            "accepted {bad:?}"
        );
    }
    assert!(runtime.calls().is_empty());
}

#[tokio::test]
async fn test_artifacts_path_without_volume() {
    let err = artifacts_path(&MockRuntime::new(), "t1", ArtifactsDir::In)
        .await
        .expect_err("no volume");
    assert!(matches!(
        err.downcast_ref::<PlatformError>(),
        Some(PlatformError::ArtifactsVolumeMissing)
    ));
}

// ── config store ──────────────────────────────────────────────────────────────

#[test]
fn test_config_store_missing_file() {
    let err = config_store::load(&MemFs::default(), Path::new("/x/agentdeck-config.yml"))
        .expect_err("missing");
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn test_config_store_loads_valid_file() {
    let fs = MemFs::default().with_file("/x/agentdeck-config.yml", THREE_AGENTS);
    let cfg = config_store::load(&fs, Path::new("/x/agentdeck-config.yml")).expect("valid");
    assert_eq!(cfg.agents.len(), 3);
}
