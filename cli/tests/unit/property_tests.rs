//! Property-based tests for config validation and env merging.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::collections::BTreeMap;

use proptest::prelude::*;

use agentdeck_cli::application::services::registry_auth::{
    SECRET_PLACEHOLDER, expand_password_command,
};
use agentdeck_cli::domain::agent::{build_container_spec, container_name, is_valid_agent_name};
use agentdeck_cli::domain::config::{AgentConfig, Config};
use agentdeck_cli::domain::env::{EnvSnapshot, comment_out_init_vars};

fn agent(name: &str, env_from: Vec<String>) -> AgentConfig {
    AgentConfig {
        name: name.to_string(),
        image: "acme/agent".to_string(),
        registry: None,
        disabled: false,
        environment: BTreeMap::new(),
        env_from,
        port: 8000,
        labels: BTreeMap::new(),
    }
}

fn config_with_agent(name: &str) -> String {
    format!(
        "config_version: 1\nregistries:\n  hub:\n    url: docker.io\n    enabled: true\n    auth:\n      method: none\nagents:\n  - name: '{name}'\n    image: acme/agent\n"
    )
}

// ============================================================================
// Agent names
// ============================================================================

proptest! {
    /// Names that satisfy the container-name rule load and map to a stable container.
    #[test]
    fn prop_valid_names_load(name in "[a-zA-Z0-9][a-zA-Z0-9_.-]{0,30}") {
        let cfg = Config::from_yaml(&config_with_agent(&name));
        prop_assert!(cfg.is_ok(), "rejected {name}: {:?}", cfg.err());
        prop_assert_eq!(container_name(&name), format!("agentdeck-{name}-1"));
    }

    /// Any name containing a character outside the rule is rejected.
    #[test]
    fn prop_names_with_bad_characters_rejected(
        head in "[a-z]{1,5}",
        bad in "[ /:;@!#$%]",
        tail in "[a-z]{0,5}",
    ) {
        let name = format!("{head}{bad}{tail}");
        prop_assert!(!is_valid_agent_name(&name));
    }
}

// ============================================================================
// Environment merging
// ============================================================================

proptest! {
    /// Every variable matching an `env_from` prefix reaches the container, with
    /// the live value, and nothing outside the prefix is forwarded.
    #[test]
    fn prop_env_from_forwards_exactly_matching_vars(
        matching in prop::collection::btree_map("FWD_[A-Z]{1,8}", "[a-z0-9]{0,8}", 0..6),
        other in prop::collection::btree_map("KEEP_[A-Z]{1,8}", "[a-z0-9]{0,8}", 0..6),
    ) {
        let env: EnvSnapshot = matching.iter().chain(other.iter())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let spec = build_container_spec(&agent("a", vec!["FWD_*".to_string()]), "acme/agent:latest", &env);
        for (k, v) in &matching {
            prop_assert_eq!(spec.env.get(k), Some(v));
        }
        for k in other.keys() {
            prop_assert!(!spec.env.contains_key(k));
        }
    }

    /// Existing values always win over `.env` values.
    #[test]
    fn prop_merge_missing_never_overrides(
        base in prop::collection::btree_map("[A-Z]{1,6}", "[a-z]{1,6}", 0..8),
        file in prop::collection::btree_map("[A-Z]{1,6}", "[a-z]{1,6}", 0..8),
    ) {
        let mut env: EnvSnapshot = base.clone().into_iter().collect();
        env.merge_missing(file.clone());
        for (k, v) in &base {
            prop_assert_eq!(env.get(k), Some(v.as_str()));
        }
        for (k, v) in &file {
            if !base.contains_key(k) {
                prop_assert_eq!(env.get(k), Some(v.as_str()));
            }
        }
    }

    /// Commenting out init vars is idempotent.
    #[test]
    fn prop_comment_out_init_vars_idempotent(
        keys in prop::collection::vec("(LANGFUSE_INIT_|OTHER_)[A-Z]{1,6}", 0..6),
    ) {
        let content: String = keys.iter().map(|k| format!("{k}=v\n")).collect();
        if let Some(once) = comment_out_init_vars(&content) {
            prop_assert_eq!(comment_out_init_vars(&once), None);
        }
    }
}

// ============================================================================
// Password command expansion
// ============================================================================

proptest! {
    /// The placeholder never survives expansion.
    #[test]
    fn prop_password_command_has_no_placeholder(secret in "[A-Za-z0-9_-]{1,20}") {
        let argv = expand_password_command("helper --token {pat} --also={pat}", &secret);
        prop_assert!(argv.iter().all(|a| !a.contains(SECRET_PLACEHOLDER)));
        prop_assert_eq!(argv[2].as_str(), secret.as_str());
    }
}
