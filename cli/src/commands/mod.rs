//! Command implementations

pub mod artifacts;
pub mod clean;
pub mod down;
pub mod exec;
pub mod init;
pub mod logs;
pub mod restart;
pub mod status;
pub mod up;
pub mod update;
pub mod version;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::domain::error::PlatformError;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::compose::DockerCompose;
use crate::infra::provider::docker_installed;

/// Options shared by every compose-based command.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Path to the deployment checkout
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,

    /// Disable the Langfuse tracing stack
    #[arg(long)]
    pub no_langfuse: bool,
}

impl ProjectArgs {
    /// Compose driver using the caller's own docker config.
    #[must_use]
    pub fn compose(&self) -> DockerCompose<TokioCommandRunner> {
        DockerCompose::new(TokioCommandRunner::new(), &self.project_dir, !self.no_langfuse)
    }
}

/// Fail unless the `docker` CLI is on `PATH`.
///
/// # Errors
///
/// Returns [`PlatformError::RuntimeMissing`] when it is not.
pub fn ensure_docker() -> Result<()> {
    if docker_installed() {
        Ok(())
    } else {
        Err(PlatformError::RuntimeMissing.into())
    }
}

