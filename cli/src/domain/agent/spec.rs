//! Container specification for an agent.
//!
//! Builds the runtime-neutral description of the container the reconciler
//! creates. Turning it into `docker create` arguments is the infra layer's job.

use std::collections::BTreeMap;

use crate::domain::config::AgentConfig;
use crate::domain::env::EnvSnapshot;

/// Namespace prefix for every container this tool owns.
pub const CONTAINER_PREFIX: &str = "agentdeck";
/// Shared network agents join so the gateway can reach them.
pub const AGENT_NETWORK: &str = "agents_net";
/// Named volume shared between platform and agents for file exchange.
pub const ARTIFACTS_VOLUME: &str = "agentdeck_artifacts";
/// Mount point of [`ARTIFACTS_VOLUME`] inside agent containers.
pub const ARTIFACTS_MOUNT: &str = "/artifacts";
/// Host control socket, bind-mounted read-only.
pub const DOCKER_SOCKET: &str = "/var/run/docker.sock";
pub const RESTART_POLICY: &str = "unless-stopped";

/// Label keys the gateway, `status`, and `clean` use to discover agents.
pub const LABEL_ENABLED: &str = "agent.enabled";
pub const LABEL_PORT: &str = "agent.port";
pub const LABEL_NAME: &str = "agent.name";

/// Tracing connection variables forwarded into every agent, with fallbacks.
pub const TRACING_VARS: &[(&str, &str)] = &[
    ("LANGFUSE_HOST", "http://langfuse-web:3000"),
    ("LANGFUSE_PUBLIC_KEY", ""),
    ("LANGFUSE_SECRET_KEY", ""),
];

/// A volume or bind mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub source: String,
    pub target: String,
    pub read_only: bool,
}

/// Everything needed to create one agent container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub hostname: String,
    pub env: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,
    pub network: String,
    pub restart_policy: String,
    pub mounts: Vec<Mount>,
}

/// Deterministic container name for an agent.
#[must_use]
pub fn container_name(agent: &str) -> String {
    format!("{CONTAINER_PREFIX}-{agent}-1")
}

/// Merged container environment.
///
/// Precedence, lowest first: the agent's static `environment`, the tracing
/// variables (fallbacks when unset), then every variable matched by an
/// `env_from` pattern. Later patterns overwrite earlier matches.
#[must_use]
pub fn merge_environment(agent: &AgentConfig, env: &EnvSnapshot) -> BTreeMap<String, String> {
    let mut merged = agent.environment.clone();
    for (key, fallback) in TRACING_VARS {
        merged.insert((*key).to_string(), env.get_or(key, fallback));
    }
    for pattern in &agent.env_from {
        let prefix = pattern.trim_end_matches('*');
        for (key, value) in env.with_prefix(prefix) {
            merged.insert(key.to_string(), value.to_string());
        }
    }
    merged
}

/// User label overrides with the discovery labels applied on top.
#[must_use]
pub fn agent_labels(agent: &AgentConfig) -> BTreeMap<String, String> {
    let mut labels = agent.labels.clone();
    labels.insert(LABEL_ENABLED.to_string(), "true".to_string());
    labels.insert(LABEL_PORT.to_string(), agent.port.to_string());
    labels.insert(LABEL_NAME.to_string(), agent.name.clone());
    labels
}

/// Build the full container spec for `agent` running `image`.
#[must_use]
pub fn build_container_spec(agent: &AgentConfig, image: &str, env: &EnvSnapshot) -> ContainerSpec {
    ContainerSpec {
        name: container_name(&agent.name),
        image: image.to_string(),
        hostname: agent.name.clone(),
        env: merge_environment(agent, env),
        labels: agent_labels(agent),
        network: AGENT_NETWORK.to_string(),
        restart_policy: RESTART_POLICY.to_string(),
        mounts: vec![
            Mount {
                source: DOCKER_SOCKET.to_string(),
                target: DOCKER_SOCKET.to_string(),
                read_only: true,
            },
            Mount {
                source: ARTIFACTS_VOLUME.to_string(),
                target: ARTIFACTS_MOUNT.to_string(),
                read_only: false,
            },
        ],
    }
}
