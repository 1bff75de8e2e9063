//! Application service: platform up.
//!
//! Sequences compose startup, registry logins, agent reconciliation, the
//! gateway restart, and the readiness wait. Every runtime call goes through
//! a session with its own isolated credential store; agent setup gets a
//! second session so its logins never mix with the compose pull logins.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::time::Instant;

use crate::application::ports::{
    ComposeDriver, GatewayProbe, LocalFs, ProgressReporter, RegistryClient, RuntimeProvider,
};
use crate::application::services::health_gate::HealthGate;
use crate::application::services::registry_auth::{self, RegistryLogin};
use crate::application::services::{agent_reconcile, config_store, failure_detail, run_compose};
use crate::domain::config::{CONFIG_FILENAME, Config};
use crate::domain::env::{EnvSnapshot, comment_out_init_vars, parse_env_file};
use crate::domain::error::PlatformError;
use crate::domain::reconcile::{AgentReport, AgentStartMode};

/// Gateway readiness endpoint on the host.
pub const GATEWAY_URL: &str = "http://localhost:18080";
/// Compose service restarted so it picks up new agent routes.
pub const GATEWAY_SERVICE: &str = "gateway";
/// Default upper bound on the gateway readiness wait.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(120);
/// Poll interval for the gateway readiness wait.
pub const READY_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Registry for the optional Docker Hub login before compose pulls.
pub const HUB_REGISTRY: &str = "docker.io";
pub const HUB_USER_ENV: &str = "DOCKERHUB_USER";
pub const HUB_TOKEN_ENV: &str = "DOCKERHUB_TOKEN";

/// Inputs to [`platform_up`].
#[derive(Debug, Clone)]
pub struct UpOptions {
    pub project_dir: PathBuf,
    /// Custom env file passed to compose instead of `<project>/.env`.
    pub env_file: Option<PathBuf>,
    pub detach: bool,
    /// Run `compose down -v` before starting.
    pub fresh: bool,
    /// Wait for the gateway after a detached start.
    pub wait_ready: bool,
    pub agents: AgentStartMode,
    pub health: HealthGate,
    pub ready_timeout: Duration,
    pub ready_interval: Duration,
    pub gateway_url: String,
}

impl UpOptions {
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            env_file: None,
            detach: true,
            fresh: false,
            wait_ready: true,
            agents: AgentStartMode::default(),
            health: HealthGate::default(),
            ready_timeout: DEFAULT_READY_TIMEOUT,
            ready_interval: READY_POLL_INTERVAL,
            gateway_url: GATEWAY_URL.to_string(),
        }
    }
}

/// Gateway readiness after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    /// Attached start or `--no-wait`.
    NotChecked,
    Ready,
    TimedOut,
}

/// Everything `up` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpReport {
    pub config_loaded: bool,
    pub logins: Vec<RegistryLogin>,
    pub agents: Vec<AgentReport>,
    pub gateway_restarted: bool,
    pub readiness: Readiness,
}

/// Compose arguments for `up`. `--env-file` is a top-level compose flag.
#[must_use]
pub fn compose_up_args(env_file: Option<&Path>, detach: bool) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(path) = env_file {
        args.push("--env-file".to_string());
        args.push(path.display().to_string());
    }
    args.push("up".to_string());
    if detach {
        args.push("-d".to_string());
    }
    args
}

/// Bring the platform up.
///
/// # Errors
///
/// Returns an error when the runtime CLI is missing, the Docker Hub login
/// fails, the config is invalid, the env file is missing, or compose fails to
/// start the stack. Per-registry and per-agent failures are reported in the
/// returned [`UpReport`] instead.
pub async fn platform_up<P: RuntimeProvider>(
    provider: &P,
    fs: &impl LocalFs,
    probe: &impl GatewayProbe,
    reporter: &impl ProgressReporter,
    mut env: EnvSnapshot,
    opts: &UpOptions,
) -> Result<UpReport> {
    if !provider.is_installed() {
        return Err(PlatformError::RuntimeMissing.into());
    }

    let session = provider.session("session")?;
    tracing::debug!(store = %session.credential_store.display(), "session credential store ready");

    if let (Some(user), Some(token)) = (env.non_empty(HUB_USER_ENV), env.non_empty(HUB_TOKEN_ENV)) {
        reporter.step(&format!("logging into {HUB_REGISTRY} as {user}..."));
        let output = session
            .runtime
            .login(HUB_REGISTRY, user, token)
            .await
            .context("running docker login")?;
        if !output.status.success() {
            tracing::warn!(detail = %failure_detail(&output), "docker hub login failed");
            return Err(PlatformError::HubLoginFailed(HUB_REGISTRY.to_string()).into());
        }
        reporter.success(&format!("logged into {HUB_REGISTRY}"));
    }

    let config = load_config(fs, &opts.project_dir, reporter)?;

    let default_env = opts.project_dir.join(".env");
    if opts.env_file.is_none() && !fs.exists(&default_env) {
        return Err(PlatformError::EnvFileMissing(opts.project_dir.clone()).into());
    }

    if opts.fresh {
        reporter.step("removing previous containers and volumes...");
        run_compose(&session.compose, &["down", "-v"]).await?;
    }

    reporter.step("starting services...");
    let up_args = compose_up_args(opts.env_file.as_deref(), opts.detach);
    run_compose(&session.compose, &up_args).await?;
    reporter.success("services started");

    let env_path = opts.env_file.clone().unwrap_or(default_env);
    if fs.exists(&env_path) {
        absorb_env_file(fs, &env_path, &mut env, reporter);
    }

    let mut report = UpReport {
        config_loaded: config.is_some(),
        logins: Vec::new(),
        agents: Vec::new(),
        gateway_restarted: false,
        readiness: Readiness::NotChecked,
    };

    if let Some(config) = &config {
        if opts.agents == AgentStartMode::None {
            reporter.step("skipping agent setup (--agents none)");
        } else {
            let agents_session = provider.session("agents")?;
            report.logins = registry_auth::authenticate_registries(
                &config.enabled_registries(),
                &env,
                &agents_session.runtime,
                &agents_session.runner,
                reporter,
            )
            .await;
            report.agents = agent_reconcile::reconcile_agents(
                config,
                opts.agents,
                &env,
                &agents_session.runtime,
                reporter,
                opts.health,
            )
            .await;
        }
    }

    reporter.step("restarting gateway to reload agent routes...");
    report.gateway_restarted = match session.compose.compose(&["restart", GATEWAY_SERVICE]).await {
        Ok(status) if status.success() => true,
        Ok(status) => {
            tracing::warn!(?status, "gateway restart failed");
            false
        }
        Err(e) => {
            tracing::warn!(error = %e, "gateway restart failed");
            false
        }
    };

    if opts.detach && opts.wait_ready {
        reporter.step(&format!("waiting for gateway at {}...", opts.gateway_url));
        let ready = wait_for_gateway(probe, &opts.gateway_url, opts.ready_timeout, opts.ready_interval).await;
        if ready {
            reporter.success("gateway is ready");
            report.readiness = Readiness::Ready;
        } else {
            reporter.warn(&format!(
                "gateway did not respond within {}s; it may still be starting",
                opts.ready_timeout.as_secs()
            ));
            report.readiness = Readiness::TimedOut;
        }
    }

    Ok(report)
}

fn load_config(
    fs: &impl LocalFs,
    project_dir: &Path,
    reporter: &impl ProgressReporter,
) -> Result<Option<Config>> {
    let path = project_dir.join(CONFIG_FILENAME);
    if !fs.exists(&path) {
        tracing::debug!(path = %path.display(), "no config file, skipping agent setup");
        return Ok(None);
    }
    let config = config_store::load(fs, &path)
        .with_context(|| format!("Error parsing {}", path.display()))?;
    reporter.success(&format!(
        "loaded config ({} agents, {} registries)",
        config.agents.len(),
        config.enabled_registries().len()
    ));
    Ok(Some(config))
}

/// Disable one-shot init variables and layer the file under `env`.
///
/// Failures here are warnings; the stack is already running.
fn absorb_env_file(
    fs: &impl LocalFs,
    path: &Path,
    env: &mut EnvSnapshot,
    reporter: &impl ProgressReporter,
) {
    let content = match fs.read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            reporter.warn(&format!("could not read {}: {e:#}", path.display()));
            return;
        }
    };
    if let Some(updated) = comment_out_init_vars(&content) {
        match fs.write(path, &updated) {
            Ok(()) => tracing::info!(path = %path.display(), "disabled one-shot init variables"),
            Err(e) => reporter.warn(&format!("could not update {}: {e:#}", path.display())),
        }
    }
    match parse_env_file(&content) {
        Ok(vars) => env.merge_missing(vars),
        Err(e) => reporter.warn(&format!("could not parse {}: {e}", path.display())),
    }
}

/// Poll `url` until the gateway answers or `timeout` elapses.
pub async fn wait_for_gateway(
    probe: &impl GatewayProbe,
    url: &str,
    timeout: Duration,
    interval: Duration,
) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if probe.is_ready(url).await {
            return true;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return false;
        }
        tokio::time::sleep(interval.min(remaining)).await;
    }
}
