//! Application service: config store.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use crate::application::ports::LocalFs;
use crate::domain::config::Config;
use crate::domain::error::ConfigError;

/// Read and validate the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when the file is missing,
/// [`ConfigError::Unreadable`] when it cannot be read, and any validation
/// error raised by [`Config::from_yaml`].
pub fn load(fs: &impl LocalFs, path: &Path) -> Result<Config, ConfigError> {
    if !fs.exists(path) {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs
        .read_to_string(path)
        .map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            message: format!("{e:#}"),
        })?;
    let config = Config::from_yaml(&content)?;
    tracing::debug!(
        path = %path.display(),
        registries = config.registries.len(),
        agents = config.agents.len(),
        "config loaded"
    );
    Ok(config)
}
