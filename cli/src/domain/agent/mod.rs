//! Domain logic for agent containers: pure functions, no I/O, no async.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.

pub mod spec;
pub mod validate;

pub use spec::{
    ContainerSpec, Mount, agent_labels, build_container_spec, container_name, merge_environment,
};
pub use validate::{AGENT_NAME_RE, is_valid_agent_name};
