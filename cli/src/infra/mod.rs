//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! docker and compose CLIs, credential stores, HTTP probing, and filesystem
//! access.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod compose;
pub mod credentials;
pub mod docker;
pub mod env;
pub mod fs;
pub mod gateway;
pub mod provider;
