//! Infrastructure implementation of the container runtime ports.
//!
//! `DockerCli<R>` routes every `docker` CLI call through a `CommandRunner`,
//! so tests can inject a recording runner without spawning processes. The
//! runner carries the session's `DOCKER_CONFIG`.

use std::collections::BTreeSet;
use std::path::Path;
use std::process::Output;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::application::ports::{
    CommandRunner, ContainerInspector, ContainerLifecycle, RegistryClient, ResourceStore,
};
use crate::domain::agent::ContainerSpec;
use crate::domain::agent::spec::{CONTAINER_PREFIX, LABEL_ENABLED};
use crate::domain::health::{ContainerState, ContainerSummary, parse_inspect};
use crate::infra::credentials::CredentialStore;

/// The container runtime CLI.
pub const DOCKER: &str = "docker";

/// Timeout for inspect/list calls outside the health gate.
pub const INSPECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Adapter over the `docker` CLI.
pub struct DockerCli<R: CommandRunner> {
    runner: R,
    /// Keeps the session's credential store alive as long as this adapter.
    store: Option<Arc<CredentialStore>>,
}

impl<R: CommandRunner> DockerCli<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            store: None,
        }
    }

    /// Tie `store`'s lifetime to this adapter.
    #[must_use]
    pub fn holding(mut self, store: Arc<CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// `DOCKER_CONFIG` directory this adapter logs into, if isolated.
    #[must_use]
    pub fn config_dir(&self) -> Option<&Path> {
        self.store.as_deref().map(CredentialStore::path)
    }

    async fn docker(&self, args: &[&str]) -> Result<Output> {
        self.runner.run(DOCKER, args).await
    }

    async fn docker_within(&self, args: &[&str], timeout: Duration) -> Result<Output> {
        self.runner.run_with_timeout(DOCKER, args, timeout).await
    }

    async fn inspect_state(&self, name: &str, timeout: Duration) -> Result<Option<ContainerState>> {
        let output = self
            .docker_within(&["container", "inspect", name], timeout)
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_not_found(&stderr) {
                return Ok(None);
            }
            bail!("docker container inspect {name} failed: {}", stderr.trim());
        }
        let parsed = parse_inspect(&String::from_utf8_lossy(&output.stdout))
            .with_context(|| format!("parsing inspect output for {name}"))?;
        Ok(parsed.into_iter().next().map(|c| c.state))
    }

    async fn container_ids(&self, filter: &str) -> Result<Vec<String>> {
        let output = self
            .docker_within(&["ps", "-a", "-q", "--filter", filter], INSPECT_TIMEOUT)
            .await?;
        if !output.status.success() {
            bail!(
                "docker ps --filter {filter} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Whether docker's stderr reports a missing object.
fn is_not_found(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("no such") || lower.contains("not found")
}

/// `docker create` arguments for `spec`.
#[must_use]
pub fn create_args(spec: &ContainerSpec) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "create".into(),
        "--name".into(),
        spec.name.clone(),
        "--hostname".into(),
        spec.hostname.clone(),
        "--network".into(),
        spec.network.clone(),
        "--restart".into(),
        spec.restart_policy.clone(),
    ];
    for (key, value) in &spec.labels {
        args.push("--label".into());
        args.push(format!("{key}={value}"));
    }
    for (key, value) in &spec.env {
        args.push("--env".into());
        args.push(format!("{key}={value}"));
    }
    for mount in &spec.mounts {
        args.push("--volume".into());
        let mode = if mount.read_only { ":ro" } else { "" };
        args.push(format!("{}:{}{mode}", mount.source, mount.target));
    }
    args.push(spec.image.clone());
    args
}

impl<R: CommandRunner> RegistryClient for DockerCli<R> {
    async fn login(&self, registry: &str, username: &str, password: &str) -> Result<Output> {
        let input = format!("{password}\n");
        self.runner
            .run_with_stdin(
                DOCKER,
                &["login", registry, "-u", username, "--password-stdin"],
                input.as_bytes(),
            )
            .await
    }

    async fn pull(&self, image: &str) -> Result<Output> {
        self.docker(&["pull", image]).await
    }
}

impl<R: CommandRunner> ContainerInspector for DockerCli<R> {
    async fn container_state(&self, name: &str) -> Result<Option<ContainerState>> {
        self.inspect_state(name, INSPECT_TIMEOUT).await
    }

    async fn container_state_within(
        &self,
        name: &str,
        timeout: Duration,
    ) -> Result<Option<ContainerState>> {
        self.inspect_state(name, timeout).await
    }

    async fn platform_containers(&self) -> Result<Vec<ContainerSummary>> {
        let mut ids = BTreeSet::new();
        ids.extend(self.container_ids(&format!("name={CONTAINER_PREFIX}")).await?);
        ids.extend(self.container_ids(&format!("label={LABEL_ENABLED}=true")).await?);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut args = vec!["container", "inspect"];
        args.extend(ids.iter().map(String::as_str));
        let output = self.docker_within(&args, INSPECT_TIMEOUT).await?;
        if !output.status.success() {
            bail!(
                "docker container inspect failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        parse_inspect(&String::from_utf8_lossy(&output.stdout)).context("parsing inspect output")
    }
}

impl<R: CommandRunner> ContainerLifecycle for DockerCli<R> {
    async fn create(&self, spec: &ContainerSpec) -> Result<Output> {
        let args = create_args(spec);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.docker(&args).await
    }

    async fn start(&self, name: &str) -> Result<Output> {
        self.docker(&["start", name]).await
    }

    async fn remove(&self, name: &str) -> Result<Output> {
        self.docker(&["rm", "-f", name]).await
    }
}

impl<R: CommandRunner> ResourceStore for DockerCli<R> {
    async fn volumes(&self) -> Result<Vec<String>> {
        let output = self
            .docker_within(&["volume", "ls", "-q"], INSPECT_TIMEOUT)
            .await?;
        if !output.status.success() {
            bail!(
                "docker volume ls failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn volume_mountpoint(&self, volume: &str) -> Result<Option<String>> {
        let output = self
            .docker_within(
                &["volume", "inspect", "--format", "{{.Mountpoint}}", volume],
                INSPECT_TIMEOUT,
            )
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_not_found(&stderr) {
                return Ok(None);
            }
            bail!("docker volume inspect {volume} failed: {}", stderr.trim());
        }
        let mountpoint = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!mountpoint.is_empty()).then_some(mountpoint))
    }

    async fn remove_volume(&self, volume: &str) -> Result<Output> {
        self.docker(&["volume", "rm", "-f", volume]).await
    }

    async fn remove_network(&self, network: &str) -> Result<bool> {
        let output = self.docker(&["network", "rm", network]).await?;
        if output.status.success() {
            return Ok(true);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_not_found(&stderr) {
            return Ok(false);
        }
        bail!("docker network rm {network} failed: {}", stderr.trim())
    }
}
