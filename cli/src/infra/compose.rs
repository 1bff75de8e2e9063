//! Infrastructure implementation of the `ComposeDriver` port.
//!
//! Compose files are discovered at call time so commands that never touch
//! compose work in directories without a deployment checkout.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Arc;

use anyhow::Result;

use crate::application::ports::{CommandRunner, ComposeDriver};
use crate::domain::error::PlatformError;
use crate::infra::credentials::CredentialStore;
use crate::infra::docker::DOCKER;

/// Core compose file, relative to the project directory, in lookup order.
const CORE_COMPOSE_FILES: &[&str] = &["compose/local/docker-compose.yml", "docker-compose.yml"];
/// Optional tracing overlay.
const LANGFUSE_COMPOSE_FILE: &str = "langfuse/docker-compose.langfuse.yml";

/// The compose files that make up a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeProject {
    pub core: PathBuf,
    pub overlays: Vec<PathBuf>,
}

impl ComposeProject {
    /// Locate the compose files under `project_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::ComposeFileMissing`] when no core compose file
    /// exists.
    pub fn discover(project_dir: &Path, langfuse: bool) -> Result<Self, PlatformError> {
        let core = CORE_COMPOSE_FILES
            .iter()
            .map(|f| project_dir.join(f))
            .find(|p| p.is_file())
            .ok_or_else(|| PlatformError::ComposeFileMissing(project_dir.to_path_buf()))?;
        let mut overlays = Vec::new();
        if langfuse {
            let overlay = project_dir.join(LANGFUSE_COMPOSE_FILE);
            if overlay.is_file() {
                overlays.push(overlay);
            }
        }
        Ok(Self { core, overlays })
    }

    /// `compose -f <core> [-f <overlay>...]`.
    #[must_use]
    pub fn base_args(&self) -> Vec<String> {
        let mut args = vec!["compose".to_string()];
        for file in std::iter::once(&self.core).chain(&self.overlays) {
            args.push("-f".to_string());
            args.push(file.display().to_string());
        }
        args
    }
}

/// Runs `docker compose` with inherited stdio.
pub struct DockerCompose<R: CommandRunner> {
    runner: R,
    project_dir: PathBuf,
    langfuse: bool,
    store: Option<Arc<CredentialStore>>,
}

impl<R: CommandRunner> DockerCompose<R> {
    pub fn new(runner: R, project_dir: impl Into<PathBuf>, langfuse: bool) -> Self {
        Self {
            runner,
            project_dir: project_dir.into(),
            langfuse,
            store: None,
        }
    }

    /// Tie `store`'s lifetime to this driver.
    #[must_use]
    pub fn holding(mut self, store: Arc<CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// `DOCKER_CONFIG` directory compose pulls with, if isolated.
    #[must_use]
    pub fn config_dir(&self) -> Option<&Path> {
        self.store.as_deref().map(CredentialStore::path)
    }
}

impl<R: CommandRunner> ComposeDriver for DockerCompose<R> {
    async fn compose(&self, args: &[&str]) -> Result<ExitStatus> {
        let project = ComposeProject::discover(&self.project_dir, self.langfuse)?;
        let mut full = project.base_args();
        full.extend(args.iter().map(|a| (*a).to_string()));
        let full: Vec<&str> = full.iter().map(String::as_str).collect();
        tracing::debug!(args = ?full, "running docker compose");
        self.runner.run_status(DOCKER, &full).await
    }
}
