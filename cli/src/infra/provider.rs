//! Infrastructure implementation of the `RuntimeProvider` port.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::application::ports::{RuntimeProvider, RuntimeSession};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::compose::DockerCompose;
use crate::infra::credentials::CredentialStore;
use crate::infra::docker::{DOCKER, DockerCli};

/// Environment variable docker reads its config directory from.
pub const DOCKER_CONFIG_ENV: &str = "DOCKER_CONFIG";

/// Whether the `docker` CLI is on `PATH`.
#[must_use]
pub fn docker_installed() -> bool {
    which::which(DOCKER).is_ok()
}

/// Production provider: `docker` on `PATH`, one temp `DOCKER_CONFIG` per session.
#[derive(Debug, Clone)]
pub struct DockerProvider {
    project_dir: PathBuf,
    langfuse: bool,
}

impl DockerProvider {
    pub fn new(project_dir: impl Into<PathBuf>, langfuse: bool) -> Self {
        Self {
            project_dir: project_dir.into(),
            langfuse,
        }
    }
}

impl RuntimeProvider for DockerProvider {
    type Runner = TokioCommandRunner;
    type Runtime = DockerCli<TokioCommandRunner>;
    type Compose = DockerCompose<TokioCommandRunner>;

    fn is_installed(&self) -> bool {
        docker_installed()
    }

    fn session(
        &self,
        scope: &str,
    ) -> Result<RuntimeSession<Self::Runner, Self::Runtime, Self::Compose>> {
        let store = Arc::new(CredentialStore::new(scope)?);
        let credential_store = store.path().to_path_buf();
        let runner = TokioCommandRunner::new().with_env(DOCKER_CONFIG_ENV, &credential_store);
        Ok(RuntimeSession {
            runtime: DockerCli::new(runner.clone()).holding(Arc::clone(&store)),
            compose: DockerCompose::new(runner.clone(), self.project_dir.clone(), self.langfuse)
                .holding(store),
            runner,
            credential_store,
        })
    }
}
