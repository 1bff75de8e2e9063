//! Tests for the `platform_up` orchestrator.

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use agentdeck_cli::application::services::platform_up::{
    Readiness, UpOptions, platform_up, wait_for_gateway,
};
use agentdeck_cli::application::services::registry_auth::LoginOutcome;
use agentdeck_cli::application::services::run_compose;
use agentdeck_cli::domain::env::{EnvSnapshot, INIT_VARS_NOTICE};
use agentdeck_cli::domain::error::PlatformError;
use agentdeck_cli::domain::reconcile::{AgentOutcome, AgentStartMode};
use tokio::time::Instant;

use crate::helpers::THREE_AGENTS;
use crate::mocks::{MemFs, MockCompose, MockProbe, MockProvider, MockRuntime, RecordingReporter};

const PROJECT: &str = "/srv/deploy";

const WITH_PRIVATE_REGISTRY: &str = r"
config_version: 1
registries:
  ghcr:
    url: ghcr.io
    enabled: true
    auth:
      method: token
agents:
  - name: hello
    image: agentsystems/hello-world-agent
";

fn project() -> PathBuf {
    PathBuf::from(PROJECT)
}

fn fs_with(config: Option<&str>, env: Option<&str>) -> MemFs {
    let mut fs = MemFs::default();
    if let Some(config) = config {
        fs = fs.with_file(project().join("agentdeck-config.yml"), config);
    }
    if let Some(env) = env {
        fs = fs.with_file(project().join(".env"), env);
    }
    fs
}

fn options() -> UpOptions {
    let mut opts = UpOptions::new(project());
    opts.ready_timeout = Duration::from_secs(10);
    opts
}

fn platform_error(err: &anyhow::Error) -> Option<&PlatformError> {
    err.downcast_ref::<PlatformError>()
}

#[tokio::test]
async fn test_runtime_missing_fails_before_any_session() {
    let mut provider = MockProvider::new(MockRuntime::new());
    provider.installed = false;
    let err = platform_up(
        &provider,
        &fs_with(Some(THREE_AGENTS), Some("")),
        &MockProbe::ready_after(0),
        &RecordingReporter::default(),
        EnvSnapshot::new(),
        &options(),
    )
    .await
    .expect_err("docker missing");

    assert!(matches!(platform_error(&err), Some(PlatformError::RuntimeMissing)));
    assert!(provider.scopes().is_empty());
}

#[tokio::test]
async fn test_missing_env_file_is_fatal() {
    let provider = MockProvider::new(MockRuntime::new());
    let err = platform_up(
        &provider,
        &fs_with(Some(THREE_AGENTS), None),
        &MockProbe::ready_after(0),
        &RecordingReporter::default(),
        EnvSnapshot::new(),
        &options(),
    )
    .await
    .expect_err("no .env");

    assert!(matches!(platform_error(&err), Some(PlatformError::EnvFileMissing(_))));
    assert!(provider.compose.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_config_aborts_before_compose() {
    let provider = MockProvider::new(MockRuntime::new());
    let err = platform_up(
        &provider,
        &fs_with(Some("config_version: 7\n"), Some("")),
        &MockProbe::ready_after(0),
        &RecordingReporter::default(),
        EnvSnapshot::new(),
        &options(),
    )
    .await
    .expect_err("bad config");

    assert!(format!("{err:#}").contains("Error parsing"));
    assert!(provider.compose.calls().is_empty());
}

#[tokio::test]
async fn test_hub_login_failure_is_fatal() {
    let provider = MockProvider::new(MockRuntime::new().failing_login("docker.io"));
    let env: EnvSnapshot = [("DOCKERHUB_USER", "me"), ("DOCKERHUB_TOKEN", "dckr_x")]
        .into_iter()
        .collect();
    let err = platform_up(
        &provider,
        &fs_with(Some(THREE_AGENTS), Some("")),
        &MockProbe::ready_after(0),
        &RecordingReporter::default(),
        env,
        &options(),
    )
    .await
    .expect_err("login rejected");

    assert!(matches!(platform_error(&err), Some(PlatformError::HubLoginFailed(_))));
}

#[tokio::test]
async fn test_default_up_runs_full_sequence() {
    let provider = MockProvider::new(MockRuntime::new());
    let probe = MockProbe::ready_after(0);
    let report = platform_up(
        &provider,
        &fs_with(Some(THREE_AGENTS), Some("OPENAI_API_KEY=sk\n")),
        &probe,
        &RecordingReporter::default(),
        EnvSnapshot::new(),
        &options(),
    )
    .await
    .expect("up succeeds");

    assert_eq!(provider.compose.calls(), vec!["up -d", "restart gateway"]);
    assert_eq!(provider.scopes(), vec!["session", "agents"]);
    assert!(report.config_loaded);
    assert!(report.gateway_restarted);
    assert_eq!(report.readiness, Readiness::Ready);
    let outcomes: Vec<_> = report.agents.iter().map(|a| a.outcome.clone()).collect();
    assert_eq!(
        outcomes,
        vec![AgentOutcome::Created, AgentOutcome::Disabled, AgentOutcome::Created]
    );
    assert_eq!(probe.probes(), 1);
}

#[tokio::test]
async fn test_fresh_runs_down_before_up() {
    let provider = MockProvider::new(MockRuntime::new());
    let mut opts = options();
    opts.fresh = true;
    opts.wait_ready = false;
    platform_up(
        &provider,
        &fs_with(Some(THREE_AGENTS), Some("")),
        &MockProbe::never(),
        &RecordingReporter::default(),
        EnvSnapshot::new(),
        &opts,
    )
    .await
    .expect("up succeeds");

    assert_eq!(provider.compose.calls(), vec!["down -v", "up -d", "restart gateway"]);
}

#[tokio::test]
async fn test_compose_up_failure_is_fatal() {
    let provider =
        MockProvider::new(MockRuntime::new()).with_compose(MockCompose::default().failing("up"));
    let err = platform_up(
        &provider,
        &fs_with(Some(THREE_AGENTS), Some("")),
        &MockProbe::ready_after(0),
        &RecordingReporter::default(),
        EnvSnapshot::new(),
        &options(),
    )
    .await
    .expect_err("compose up fails");

    assert!(matches!(platform_error(&err), Some(PlatformError::CommandFailed { .. })));
    assert!(provider.runtime.calls_of("pull").is_empty());
}

#[tokio::test]
async fn test_mode_none_skips_agent_session_entirely() {
    let provider = MockProvider::new(MockRuntime::new());
    let mut opts = options();
    opts.agents = AgentStartMode::None;
    let report = platform_up(
        &provider,
        &fs_with(Some(THREE_AGENTS), Some("")),
        &MockProbe::ready_after(0),
        &RecordingReporter::default(),
        EnvSnapshot::new(),
        &opts,
    )
    .await
    .expect("up succeeds");

    assert!(provider.runtime.calls().is_empty());
    assert_eq!(provider.scopes(), vec!["session"]);
    assert!(report.agents.is_empty());
}

#[tokio::test]
async fn test_without_config_only_compose_runs() {
    let provider = MockProvider::new(MockRuntime::new());
    let report = platform_up(
        &provider,
        &fs_with(None, Some("")),
        &MockProbe::ready_after(0),
        &RecordingReporter::default(),
        EnvSnapshot::new(),
        &options(),
    )
    .await
    .expect("up succeeds");

    assert!(!report.config_loaded);
    assert!(report.agents.is_empty());
    assert_eq!(provider.compose.calls(), vec!["up -d", "restart gateway"]);
}

#[tokio::test]
async fn test_missing_registry_secret_still_processes_agents() {
    let provider = MockProvider::new(MockRuntime::new());
    let reporter = RecordingReporter::default();
    let report = platform_up(
        &provider,
        &fs_with(Some(WITH_PRIVATE_REGISTRY), Some("")),
        &MockProbe::ready_after(0),
        &reporter,
        EnvSnapshot::new(),
        &options(),
    )
    .await
    .expect("up succeeds");

    assert!(matches!(report.logins[0].outcome, LoginOutcome::Skipped(_)));
    assert_eq!(report.agents[0].outcome, AgentOutcome::Created);
    assert!(reporter.of_kind("warn").iter().any(|w| w.contains("GHCR_PAT")));
}

#[tokio::test]
async fn test_env_file_supplies_registry_secrets() {
    let provider = MockProvider::new(MockRuntime::new());
    let report = platform_up(
        &provider,
        &fs_with(Some(WITH_PRIVATE_REGISTRY), Some("GHCR_PAT=from-file\n")),
        &MockProbe::ready_after(0),
        &RecordingReporter::default(),
        EnvSnapshot::new(),
        &options(),
    )
    .await
    .expect("up succeeds");

    assert_eq!(report.logins[0].outcome, LoginOutcome::LoggedIn);
    assert_eq!(provider.runtime.calls_of("login"), vec!["login ghcr.io token"]);
}

#[tokio::test]
async fn test_init_vars_are_commented_out_after_start() {
    let provider = MockProvider::new(MockRuntime::new());
    let fs = fs_with(
        Some(THREE_AGENTS),
        Some("LANGFUSE_INIT_USER_EMAIL=a@b.c\nOTHER=1\n"),
    );
    platform_up(
        &provider,
        &fs,
        &MockProbe::ready_after(0),
        &RecordingReporter::default(),
        EnvSnapshot::new(),
        &options(),
    )
    .await
    .expect("up succeeds");

    let content = fs.content(&project().join(".env")).expect(".env kept");
    assert!(content.starts_with(INIT_VARS_NOTICE));
    assert!(content.contains("# LANGFUSE_INIT_USER_EMAIL=a@b.c"));
    assert!(content.contains("\nOTHER=1\n"));
}

#[tokio::test]
async fn test_custom_env_file_replaces_default() {
    let provider = MockProvider::new(MockRuntime::new());
    let custom = Path::new("/etc/agentdeck/prod.env");
    let fs = fs_with(Some(THREE_AGENTS), None).with_file(custom, "");
    let mut opts = options();
    opts.env_file = Some(custom.to_path_buf());
    platform_up(
        &provider,
        &fs,
        &MockProbe::ready_after(0),
        &RecordingReporter::default(),
        EnvSnapshot::new(),
        &opts,
    )
    .await
    .expect("custom env file satisfies the check");

    assert_eq!(
        provider.compose.calls()[0],
        "--env-file /etc/agentdeck/prod.env up -d"
    );
}

#[tokio::test]
async fn test_gateway_restart_failure_is_not_fatal() {
    let provider = MockProvider::new(MockRuntime::new())
        .with_compose(MockCompose::default().failing("restart"));
    let report = platform_up(
        &provider,
        &fs_with(Some(THREE_AGENTS), Some("")),
        &MockProbe::ready_after(0),
        &RecordingReporter::default(),
        EnvSnapshot::new(),
        &options(),
    )
    .await
    .expect("up succeeds");

    assert!(!report.gateway_restarted);
}

#[tokio::test(start_paused = true)]
async fn test_gateway_timeout_warns_and_succeeds() {
    let provider = MockProvider::new(MockRuntime::new());
    let reporter = RecordingReporter::default();
    let report = platform_up(
        &provider,
        &fs_with(Some(THREE_AGENTS), Some("")),
        &MockProbe::never(),
        &reporter,
        EnvSnapshot::new(),
        &options(),
    )
    .await
    .expect("a slow gateway is not an error");

    assert_eq!(report.readiness, Readiness::TimedOut);
    assert!(reporter.of_kind("warn").iter().any(|w| w.contains("did not respond")));
}

#[tokio::test]
async fn test_foreground_never_waits_for_gateway() {
    let provider = MockProvider::new(MockRuntime::new());
    let probe = MockProbe::never();
    let mut opts = options();
    opts.detach = false;
    let report = platform_up(
        &provider,
        &fs_with(Some(THREE_AGENTS), Some("")),
        &probe,
        &RecordingReporter::default(),
        EnvSnapshot::new(),
        &opts,
    )
    .await
    .expect("up succeeds");

    assert_eq!(provider.compose.calls()[0], "up");
    assert_eq!(report.readiness, Readiness::NotChecked);
    assert_eq!(probe.probes(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_gateway_polls_until_ready() {
    let probe = MockProbe::ready_after(3);
    let started = Instant::now();
    let ready = wait_for_gateway(
        &probe,
        "http://localhost:18080",
        Duration::from_secs(60),
        Duration::from_secs(2),
    )
    .await;
    assert!(ready);
    assert_eq!(probe.probes(), 4);
    assert_eq!(started.elapsed(), Duration::from_secs(6));
}

#[tokio::test]
async fn test_run_compose_accepts_owned_and_borrowed_args() {
    let compose = MockCompose::default();
    run_compose(&compose, &["down", "-v"]).await.expect("borrowed args");
    run_compose(&compose, &["logs".to_string(), "--tail=100".to_string()])
        .await
        .expect("owned args");
    assert_eq!(compose.calls(), vec!["down -v", "logs --tail=100"]);
}

#[tokio::test]
async fn test_run_compose_failure_names_full_command() {
    let compose = MockCompose::default().failing("restart");
    let err = run_compose(&compose, &["restart", "gateway"])
        .await
        .expect_err("non-zero exit");
    match err.downcast_ref::<PlatformError>() {
        Some(PlatformError::CommandFailed { command, code }) => {
            assert_eq!(command, "docker compose restart gateway");
            assert_eq!(*code, 1);
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}
