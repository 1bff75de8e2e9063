//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;

use crate::domain::agent::ContainerSpec;
use crate::domain::health::{ContainerState, ContainerSummary};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output. No timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program, killing it if it outlives `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Container Runtime Ports ───────────────────────────────────────────────────

/// Registry operations: login and image pull.
#[allow(async_fn_in_trait)]
pub trait RegistryClient {
    /// Log into `registry`, sending `password` on stdin.
    async fn login(&self, registry: &str, username: &str, password: &str) -> Result<Output>;
    /// Pull `image`.
    async fn pull(&self, image: &str) -> Result<Output>;
}

/// Container state queries. Every call re-reads the runtime.
#[allow(async_fn_in_trait)]
pub trait ContainerInspector {
    /// State of the named container, `None` if it does not exist.
    async fn container_state(&self, name: &str) -> Result<Option<ContainerState>>;
    /// Same as `container_state`, bounded by `timeout`.
    async fn container_state_within(
        &self,
        name: &str,
        timeout: Duration,
    ) -> Result<Option<ContainerState>>;
    /// Containers named after the platform or carrying the agent label.
    async fn platform_containers(&self) -> Result<Vec<ContainerSummary>>;
}

/// Container create/start/remove.
#[allow(async_fn_in_trait)]
pub trait ContainerLifecycle {
    async fn create(&self, spec: &ContainerSpec) -> Result<Output>;
    async fn start(&self, name: &str) -> Result<Output>;
    /// Force-remove a container.
    async fn remove(&self, name: &str) -> Result<Output>;
}

/// Volumes and networks.
#[allow(async_fn_in_trait)]
pub trait ResourceStore {
    /// Names of all volumes.
    async fn volumes(&self) -> Result<Vec<String>>;
    /// Host mount point of `volume`, `None` if it does not exist.
    async fn volume_mountpoint(&self, volume: &str) -> Result<Option<String>>;
    async fn remove_volume(&self, volume: &str) -> Result<Output>;
    /// Remove `network`. `Ok(false)` when it did not exist.
    async fn remove_network(&self, network: &str) -> Result<bool>;
}

/// Composite trait: any type implementing the sub-traits is a `ContainerRuntime`.
pub trait ContainerRuntime: RegistryClient + ContainerInspector + ContainerLifecycle {}

impl<T> ContainerRuntime for T where T: RegistryClient + ContainerInspector + ContainerLifecycle {}

// ── Compose Port ──────────────────────────────────────────────────────────────

/// Runs `docker compose` against the project's compose files.
#[allow(async_fn_in_trait)]
pub trait ComposeDriver {
    /// Run a compose subcommand (`["up", "-d"]`) with inherited stdio.
    async fn compose(&self, args: &[&str]) -> Result<ExitStatus>;
}

// ── Runtime Sessions ──────────────────────────────────────────────────────────

/// Runner, runtime and compose driver bound to one isolated credential store.
///
/// The store lives as long as the session; dropping the session removes it.
pub struct RuntimeSession<X, R, C> {
    pub runner: X,
    pub runtime: R,
    pub compose: C,
    /// Location of the isolated credential store (`DOCKER_CONFIG`).
    pub credential_store: PathBuf,
}

/// Hands out runtime sessions with isolated credential stores.
pub trait RuntimeProvider {
    type Runner: CommandRunner;
    type Runtime: ContainerRuntime;
    type Compose: ComposeDriver;

    /// Whether the container runtime CLI is installed.
    fn is_installed(&self) -> bool;

    /// Acquire a new session whose credential store is distinct from every
    /// other session's. `scope` names the phase (used in the directory name).
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store cannot be created.
    fn session(&self, scope: &str) -> Result<RuntimeSession<Self::Runner, Self::Runtime, Self::Compose>>;
}

// ── Gateway Port ──────────────────────────────────────────────────────────────

/// Probes the gateway's readiness endpoint.
#[allow(async_fn_in_trait)]
pub trait GatewayProbe {
    /// `true` when the endpoint answered with an HTTP response.
    async fn is_ready(&self, url: &str) -> bool;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit a non-fatal failure for a single item.
    fn failure(&self, message: &str);
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the few filesystem operations services need.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// `true` when `path` is a directory with at least one entry.
    fn is_non_empty_dir(&self, path: &Path) -> Result<bool>;
}
