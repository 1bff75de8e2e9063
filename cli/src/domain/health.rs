//! Container state and health evaluation.
//!
//! Parses `docker container inspect` output into domain types and decides,
//! for one probe, whether the health gate is done. No I/O, no async.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Health reported by the runtime's native health-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerHealth {
    /// The image defines no health-check.
    None,
    Starting,
    Healthy,
    Unhealthy,
}

impl ContainerHealth {
    fn from_status(status: &str) -> Self {
        match status {
            "healthy" => Self::Healthy,
            "unhealthy" => Self::Unhealthy,
            // "starting" and anything a newer daemon might report.
            _ => Self::Starting,
        }
    }
}

/// Observed state of one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerState {
    /// Runtime status string: `created`, `running`, `exited`, ...
    pub status: String,
    pub running: bool,
    pub health: ContainerHealth,
}

/// One container as seen by `status` and `clean`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub state: ContainerState,
    /// Published ports rendered as `host→container/proto`.
    pub ports: Vec<String>,
}

/// Terminal result of waiting on a container's health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthOutcome {
    Healthy,
    Unhealthy,
    TimedOut,
    NotFound,
}

/// Evaluate one probe. `None` means "keep polling".
#[must_use]
pub fn evaluate_probe(state: Option<&ContainerState>) -> Option<HealthOutcome> {
    let Some(state) = state else {
        return Some(HealthOutcome::NotFound);
    };
    match state.health {
        ContainerHealth::None | ContainerHealth::Healthy => Some(HealthOutcome::Healthy),
        ContainerHealth::Unhealthy => Some(HealthOutcome::Unhealthy),
        ContainerHealth::Starting => None,
    }
}

// ── Inspect parsing ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectRecord {
    id: String,
    name: String,
    state: RawState,
    #[serde(default)]
    config: Option<RawConfig>,
    #[serde(default)]
    network_settings: Option<RawNetwork>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawState {
    status: String,
    #[serde(default)]
    running: bool,
    #[serde(default)]
    health: Option<RawHealth>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawHealth {
    status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawConfig {
    #[serde(default)]
    labels: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawNetwork {
    #[serde(default)]
    ports: Option<BTreeMap<String, Option<Vec<RawBinding>>>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawBinding {
    host_port: String,
}

impl From<RawState> for ContainerState {
    fn from(raw: RawState) -> Self {
        Self {
            status: raw.status,
            running: raw.running,
            health: raw
                .health
                .map_or(ContainerHealth::None, |h| ContainerHealth::from_status(&h.status)),
        }
    }
}

impl From<InspectRecord> for ContainerSummary {
    fn from(raw: InspectRecord) -> Self {
        let mut ports = Vec::new();
        if let Some(bindings) = raw.network_settings.and_then(|n| n.ports) {
            for (container_port, hosts) in bindings {
                for host in hosts.unwrap_or_default() {
                    ports.push(format!("{}→{container_port}", host.host_port));
                }
            }
        }
        Self {
            id: raw.id,
            name: raw.name.trim_start_matches('/').to_string(),
            labels: raw.config.and_then(|c| c.labels).unwrap_or_default(),
            state: raw.state.into(),
            ports,
        }
    }
}

/// Parse the JSON array printed by `docker container inspect`.
///
/// # Errors
///
/// Returns an error if the output is not the expected JSON shape.
pub fn parse_inspect(json: &str) -> Result<Vec<ContainerSummary>, serde_json::Error> {
    let records: Vec<InspectRecord> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(ContainerSummary::from).collect())
}
