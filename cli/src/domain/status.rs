//! Platform status model built from inspected containers.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::agent::spec::{CONTAINER_PREFIX, LABEL_ENABLED};
use crate::domain::health::{ContainerHealth, ContainerSummary};

/// Which part of the platform a container belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContainerKind {
    Agent,
    Core,
    Other,
}

impl ContainerKind {
    #[must_use]
    pub fn classify(container: &ContainerSummary) -> Self {
        if container.labels.contains_key(LABEL_ENABLED) {
            Self::Agent
        } else if container.name.contains(CONTAINER_PREFIX) {
            Self::Core
        } else {
            Self::Other
        }
    }
}

/// One row of `agentdeck status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub name: String,
    pub kind: ContainerKind,
    pub status: String,
    /// Only reported for running containers with a health-check.
    pub health: Option<ContainerHealth>,
    pub ports: Vec<String>,
}

/// Aggregated platform status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformStatus {
    pub containers: Vec<StatusRow>,
    pub running: usize,
    pub total: usize,
}

/// Deduplicate by id, sort by name, and summarise.
#[must_use]
pub fn build_status(containers: Vec<ContainerSummary>) -> PlatformStatus {
    let unique: BTreeMap<String, ContainerSummary> =
        containers.into_iter().map(|c| (c.id.clone(), c)).collect();

    let mut rows: Vec<StatusRow> = unique
        .into_values()
        .map(|c| {
            let health = (c.state.running && c.state.health != ContainerHealth::None)
                .then_some(c.state.health);
            StatusRow {
                kind: ContainerKind::classify(&c),
                status: c.state.status.clone(),
                health,
                ports: c.ports.clone(),
                name: c.name,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    let running = rows.iter().filter(|r| r.status == "running").count();
    let total = rows.len();
    PlatformStatus {
        containers: rows,
        running,
        total,
    }
}
