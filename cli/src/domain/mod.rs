//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod health;
pub mod reconcile;
pub mod status;

pub use config::{AgentConfig, Config, RegistryAuth, RegistryConfig};
pub use env::EnvSnapshot;
pub use error::{ConfigError, PlatformError};
pub use health::{ContainerHealth, ContainerState, ContainerSummary, HealthOutcome};
pub use reconcile::{AgentOutcome, AgentReport, AgentStartMode};
