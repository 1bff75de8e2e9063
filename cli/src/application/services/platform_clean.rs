//! Application service: remove every platform resource.
//!
//! Per-item failures are collected as warnings; cleaning carries on.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use serde::Serialize;

use crate::application::ports::{
    ComposeDriver, ContainerInspector, ContainerLifecycle, ProgressReporter, ResourceStore,
};
use crate::application::services::failure_detail;
use crate::domain::agent::spec::{AGENT_NETWORK, CONTAINER_PREFIX};

/// What `clean` removed and what it could not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub compose_down: bool,
    pub containers: Vec<String>,
    pub volumes: Vec<String>,
    pub network_removed: bool,
    pub failures: Vec<String>,
}

/// Stop the compose stack, then remove leftover containers, volumes, and the
/// agent network. `compose` is `None` when the project has no compose file.
pub async fn clean_platform<R, C>(
    compose: Option<&C>,
    runtime: &R,
    reporter: &impl ProgressReporter,
) -> CleanReport
where
    R: ContainerInspector + ContainerLifecycle + ResourceStore,
    C: ComposeDriver,
{
    let mut report = CleanReport::default();

    match compose {
        Some(compose) => {
            reporter.step("stopping compose services...");
            match compose.compose(&["down", "-v", "--remove-orphans"]).await {
                Ok(status) if status.success() => report.compose_down = true,
                Ok(status) => record(
                    &mut report,
                    reporter,
                    format!("docker compose down exited with {status}"),
                ),
                Err(e) => record(&mut report, reporter, format!("docker compose down: {e:#}")),
            }
        }
        None => reporter.warn("no compose file found, skipping compose down"),
    }

    reporter.step("removing remaining containers...");
    match runtime.platform_containers().await {
        Ok(containers) => {
            for container in containers {
                match runtime.remove(&container.name).await {
                    Ok(output) if output.status.success() => {
                        reporter.success(&format!("removed {}", container.name));
                        report.containers.push(container.name);
                    }
                    Ok(output) => record(
                        &mut report,
                        reporter,
                        format!("failed to remove {}: {}", container.name, failure_detail(&output)),
                    ),
                    Err(e) => record(
                        &mut report,
                        reporter,
                        format!("failed to remove {}: {e:#}", container.name),
                    ),
                }
            }
        }
        Err(e) => record(&mut report, reporter, format!("failed to list containers: {e:#}")),
    }

    reporter.step("removing volumes...");
    match runtime.volumes().await {
        Ok(volumes) => {
            for volume in volumes.into_iter().filter(|v| v.starts_with(CONTAINER_PREFIX)) {
                match runtime.remove_volume(&volume).await {
                    Ok(output) if output.status.success() => {
                        reporter.success(&format!("removed volume {volume}"));
                        report.volumes.push(volume);
                    }
                    Ok(output) => record(
                        &mut report,
                        reporter,
                        format!("failed to remove volume {volume}: {}", failure_detail(&output)),
                    ),
                    Err(e) => record(
                        &mut report,
                        reporter,
                        format!("failed to remove volume {volume}: {e:#}"),
                    ),
                }
            }
        }
        Err(e) => record(&mut report, reporter, format!("failed to list volumes: {e:#}")),
    }

    reporter.step(&format!("removing network {AGENT_NETWORK}..."));
    match runtime.remove_network(AGENT_NETWORK).await {
        Ok(true) => {
            reporter.success(&format!("removed network {AGENT_NETWORK}"));
            report.network_removed = true;
        }
        Ok(false) => reporter.step(&format!("network {AGENT_NETWORK} not found")),
        Err(e) => record(
            &mut report,
            reporter,
            format!("failed to remove network {AGENT_NETWORK}: {e:#}"),
        ),
    }

    report
}

fn record(report: &mut CleanReport, reporter: &impl ProgressReporter, message: String) {
    tracing::warn!(%message, "clean step failed");
    reporter.warn(&message);
    report.failures.push(message);
}
