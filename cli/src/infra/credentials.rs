//! Isolated Docker credential stores.
//!
//! Each store is a fresh temporary directory used as `DOCKER_CONFIG`, so
//! logins made through it never touch the user's `~/.docker/config.json`.
//! The directory is deleted when the store is dropped.

use std::path::Path;

use anyhow::{Context, Result};
use tempfile::TempDir;

/// A scoped `DOCKER_CONFIG` directory.
#[derive(Debug)]
pub struct CredentialStore {
    dir: TempDir,
}

impl CredentialStore {
    /// Create a new empty store. `scope` ends up in the directory name.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new(scope: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("agentdeck-docker-config-{scope}-"))
            .tempdir()
            .context("creating isolated docker config directory")?;
        tracing::debug!(path = %dir.path().display(), "created credential store");
        Ok(Self { dir })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
