//! Application service: refresh the core platform images.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{LocalFs, ProgressReporter, RegistryClient};
use crate::application::services::platform_init::pull_images;
use crate::domain::config::CONFIG_FILENAME;
use crate::domain::error::PlatformError;

/// Images refreshed by `update`.
pub const PLATFORM_IMAGES: &[&str] = &[
    "ghcr.io/agentsystems/agent-control-plane:latest",
    "ghcr.io/agentsystems/agentsystems-ui:latest",
];

/// Require a deployment checkout: `project_dir` must hold the config file.
///
/// Only the presence of the file is checked; its content is not validated.
///
/// # Errors
///
/// Returns [`PlatformError::ConfigMissing`] when the file is absent.
pub fn ensure_project(fs: &impl LocalFs, project_dir: &Path) -> Result<()> {
    if !fs.exists(&project_dir.join(CONFIG_FILENAME)) {
        return Err(PlatformError::ConfigMissing(project_dir.to_path_buf()).into());
    }
    Ok(())
}

/// Pull the latest core images for the deployment in `project_dir`.
///
/// # Errors
///
/// Returns [`PlatformError::ConfigMissing`] when `project_dir` has no config
/// file, or the first pull failure.
pub async fn update_platform(
    fs: &impl LocalFs,
    client: &impl RegistryClient,
    reporter: &impl ProgressReporter,
    project_dir: &Path,
) -> Result<()> {
    ensure_project(fs, project_dir)?;
    pull_images(client, PLATFORM_IMAGES, reporter).await
}
