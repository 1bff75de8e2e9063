//! Application service: artifacts path lookup.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};

use crate::application::ports::ResourceStore;
use crate::domain::agent::spec::ARTIFACTS_VOLUME;
use crate::domain::error::PlatformError;

/// Which side of a thread's artifacts to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ArtifactsDir {
    In,
    Out,
}

impl ArtifactsDir {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// Host path of `<artifacts volume>/<thread_id>/<dir>`.
///
/// # Errors
///
/// Returns an error if `thread_id` is not a single path component or the
/// artifacts volume does not exist.
pub async fn artifacts_path(
    store: &impl ResourceStore,
    thread_id: &str,
    dir: ArtifactsDir,
) -> Result<PathBuf> {
    ensure!(
        !thread_id.is_empty()
            && thread_id != "."
            && thread_id != ".."
            && !thread_id.contains(['/', '\\']),
        "invalid thread id '{thread_id}'"
    );
    let mountpoint = store
        .volume_mountpoint(ARTIFACTS_VOLUME)
        .await
        .context("inspecting artifacts volume")?
        .ok_or(PlatformError::ArtifactsVolumeMissing)?;
    Ok(PathBuf::from(mountpoint).join(thread_id).join(dir.as_str()))
}
