//! Application service: platform status.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::ContainerInspector;
use crate::domain::status::{PlatformStatus, build_status};

/// Collect the status of every platform and agent container.
///
/// # Errors
///
/// Returns an error if the runtime cannot list or inspect containers.
pub async fn collect_status(inspector: &impl ContainerInspector) -> Result<PlatformStatus> {
    let containers = inspector
        .platform_containers()
        .await
        .context("listing platform containers")?;
    Ok(build_status(containers))
}
