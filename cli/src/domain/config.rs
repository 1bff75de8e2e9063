//! Domain types and validators for `agentdeck-config.yml`.
//!
//! Pure functions only: no I/O, no async, no filesystem access. Reading the
//! file lives in `application::services::config_store`.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::domain::agent::validate::is_valid_agent_name;
use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Config filename looked up in the project directory.
pub const CONFIG_FILENAME: &str = "agentdeck-config.yml";
/// The only schema version this build understands.
pub const SUPPORTED_CONFIG_VERSION: i64 = 1;
/// Port advertised for an agent that does not declare one.
pub const DEFAULT_AGENT_PORT: u16 = 8000;
/// Login username for token registries that do not name one.
pub const DEFAULT_TOKEN_USERNAME: &str = "token";

// ── Registry ─────────────────────────────────────────────────────────────────

/// How the runtime authenticates against a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum RegistryAuth {
    /// Public registry, no login.
    #[default]
    None,
    /// Username and password both come from the environment.
    Basic {
        username_env: String,
        #[serde(default)]
        password_env: Option<String>,
        #[serde(default)]
        password_command: Option<String>,
    },
    /// A single token; the username is a literal.
    Token {
        #[serde(default)]
        token_env: Option<String>,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        password_command: Option<String>,
    },
}

/// A single entry under `registries:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Key in the `registries` mapping.
    pub name: String,
    pub url: String,
    pub enabled: bool,
    pub auth: RegistryAuth,
}

impl RegistryConfig {
    /// Environment variable holding this registry's secret.
    #[must_use]
    pub fn secret_env(&self) -> String {
        match &self.auth {
            RegistryAuth::Basic {
                password_env: Some(var),
                ..
            }
            | RegistryAuth::Token {
                token_env: Some(var),
                ..
            } => var.clone(),
            _ => conventional_secret_env(&self.name),
        }
    }

    /// Optional password-derivation template containing `{pat}`.
    #[must_use]
    pub fn password_command(&self) -> Option<&str> {
        match &self.auth {
            RegistryAuth::None => None,
            RegistryAuth::Basic {
                password_command, ..
            }
            | RegistryAuth::Token {
                password_command, ..
            } => password_command.as_deref(),
        }
    }

    /// Registry host without scheme or trailing slash, e.g. `ghcr.io`.
    #[must_use]
    pub fn host(&self) -> &str {
        let url = self.url.trim();
        let url = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);
        url.trim_end_matches('/')
    }
}

/// `<REGID>_PAT`, where `REGID` is the registry name upper-cased with `-`
/// and `.` mapped to `_`.
#[must_use]
pub fn conventional_secret_env(registry: &str) -> String {
    let id: String = registry
        .chars()
        .map(|c| match c {
            '-' | '.' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect();
    format!("{id}_PAT")
}

// ── Agent ────────────────────────────────────────────────────────────────────

/// A single entry under `agents:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub name: String,
    pub image: String,
    pub registry: Option<String>,
    pub disabled: bool,
    pub environment: BTreeMap<String, String>,
    /// Prefix patterns such as `OPENAI_*`.
    pub env_from: Vec<String>,
    pub port: u16,
    pub labels: BTreeMap<String, String>,
}

// ── Config aggregate ─────────────────────────────────────────────────────────

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub version: i64,
    pub registries: BTreeMap<String, RegistryConfig>,
    pub agents: Vec<AgentConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    config_version: Option<i64>,
    #[serde(default)]
    registries: Option<BTreeMap<String, RawRegistry>>,
    #[serde(default)]
    agents: Option<Vec<RawAgent>>,
}

#[derive(Debug, Deserialize)]
struct RawRegistry {
    url: String,
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default)]
    auth: RegistryAuth,
}

#[derive(Debug, Deserialize)]
struct RawAgent {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    registry: Option<String>,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    environment: BTreeMap<String, serde_yaml::Value>,
    #[serde(default)]
    env_from: Vec<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    labels: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the YAML is malformed or any validation
    /// rule fails.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str::<Option<RawConfig>>(content)
                .map_err(|e| ConfigError::Parse(e.to_string()))?
                .unwrap_or_default()
        };

        let version = raw.config_version.unwrap_or(SUPPORTED_CONFIG_VERSION);
        if version != SUPPORTED_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(version));
        }

        let registries: BTreeMap<String, RegistryConfig> = raw
            .registries
            .unwrap_or_default()
            .into_iter()
            .map(|(name, reg)| {
                let cfg = RegistryConfig {
                    name: name.clone(),
                    url: reg.url,
                    enabled: reg.enabled,
                    auth: reg.auth,
                };
                (name, cfg)
            })
            .collect();
        if registries.is_empty() {
            return Err(ConfigError::NoRegistries);
        }

        let raw_agents = raw.agents.unwrap_or_default();
        if raw_agents.is_empty() {
            return Err(ConfigError::NoAgents);
        }

        let mut seen = HashSet::new();
        let mut agents = Vec::with_capacity(raw_agents.len());
        for (index, raw_agent) in raw_agents.into_iter().enumerate() {
            let agent = validate_agent(index, raw_agent, &registries)?;
            if !seen.insert(agent.name.clone()) {
                return Err(ConfigError::DuplicateAgent(agent.name));
            }
            agents.push(agent);
        }

        Ok(Self {
            version,
            registries,
            agents,
        })
    }

    /// Registries flagged as enabled, ordered by name.
    #[must_use]
    pub fn enabled_registries(&self) -> Vec<&RegistryConfig> {
        self.registries.values().filter(|r| r.enabled).collect()
    }

    /// One fully-qualified image reference per agent, in declaration order.
    #[must_use]
    pub fn images(&self) -> Vec<String> {
        self.agents.iter().map(|a| self.qualified_image(a)).collect()
    }

    /// Fully-qualified image reference for `agent`.
    ///
    /// The registry host is prefixed when the agent names a registry and the
    /// image does not already carry a host; `:latest` is appended when the
    /// reference has neither tag nor digest.
    #[must_use]
    pub fn qualified_image(&self, agent: &AgentConfig) -> String {
        let mut image = agent.image.trim().to_string();
        if let Some(registry) = agent.registry.as_deref().and_then(|r| self.registries.get(r)) {
            let host = registry.host();
            if !host.is_empty() && !has_registry_host(&image) {
                image = format!("{host}/{image}");
            }
        }
        if !has_tag_or_digest(&image) {
            image.push_str(":latest");
        }
        image
    }
}

fn validate_agent(
    index: usize,
    raw: RawAgent,
    registries: &BTreeMap<String, RegistryConfig>,
) -> Result<AgentConfig, ConfigError> {
    let name = raw
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or(ConfigError::MissingAgentField {
            index,
            field: "name",
        })?;
    let image = raw
        .image
        .filter(|i| !i.trim().is_empty())
        .ok_or(ConfigError::MissingAgentField {
            index,
            field: "image",
        })?;

    if !is_valid_agent_name(&name) {
        return Err(ConfigError::InvalidAgentName(name));
    }
    if let Some(registry) = &raw.registry
        && !registries.contains_key(registry)
    {
        return Err(ConfigError::UnknownRegistry {
            agent: name,
            registry: registry.clone(),
        });
    }

    let mut environment = BTreeMap::new();
    for (key, value) in raw.environment {
        let Some(value) = scalar_to_string(&value) else {
            return Err(ConfigError::NonScalarEnv { agent: name, key });
        };
        environment.insert(key, value);
    }

    Ok(AgentConfig {
        name,
        image,
        registry: raw.registry,
        disabled: raw.disabled,
        environment,
        env_from: raw.env_from,
        port: raw.port.unwrap_or(DEFAULT_AGENT_PORT),
        labels: raw.labels,
    })
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        _ => None,
    }
}

/// `true` when the first path component looks like a registry host
/// (`ghcr.io/...`, `localhost:5000/...`).
fn has_registry_host(image: &str) -> bool {
    match image.split_once('/') {
        Some((first, _)) => first.contains('.') || first.contains(':') || first == "localhost",
        None => false,
    }
}

fn has_tag_or_digest(image: &str) -> bool {
    if image.contains('@') {
        return true;
    }
    let last = image.rsplit('/').next().unwrap_or(image);
    last.contains(':')
}

// ── Unit tests ───────────────────────────────────────────────────────────────
