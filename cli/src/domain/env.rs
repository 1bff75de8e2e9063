//! Injected environment snapshot.
//!
//! Services never call `std::env::var`; they read from an [`EnvSnapshot`]
//! captured by the caller, so tests can hand in exact environments without
//! mutating process-global state.

use std::collections::BTreeMap;

/// An owned view of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw lookup; an empty value is returned as-is.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Lookup that treats an empty value as unset.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Lookup with a fallback for unset variables.
    #[must_use]
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Add variables that are not already set. Existing values win, matching
    /// how a `.env` file is layered under the shell environment.
    pub fn merge_missing<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.vars.entry(k.into()).or_insert_with(|| v.into());
        }
    }

    /// Variables whose name starts with `prefix`, in name order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.vars
            .range(prefix.to_string()..)
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Parse `.env` file content into ordered key/value pairs.
///
/// # Errors
///
/// Returns an error when a line cannot be parsed.
pub fn parse_env_file(content: &str) -> Result<Vec<(String, String)>, dotenvy::Error> {
    dotenvy::from_read_iter(content.as_bytes()).collect()
}

/// Marker line prepended once init variables have been disabled.
pub const INIT_VARS_NOTICE: &str =
    "# Langfuse initialization values below were applied on first start and are now disabled.";

/// Prefix of one-shot initialisation variables.
pub const INIT_VAR_PREFIX: &str = "LANGFUSE_INIT_";

/// Comment out `LANGFUSE_INIT_*` assignments.
///
/// Returns `None` when there is nothing to change.
#[must_use]
pub fn comment_out_init_vars(content: &str) -> Option<String> {
    let mut changed = false;
    let mut lines: Vec<String> = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim_start();
        let assignment = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        if assignment.starts_with(INIT_VAR_PREFIX) && assignment.contains('=') {
            if !changed {
                lines.push(INIT_VARS_NOTICE.to_string());
                changed = true;
            }
            lines.push(format!("# {trimmed}"));
        } else {
            lines.push(line.to_string());
        }
    }
    if !changed {
        return None;
    }
    let mut out = lines.join("\n");
    if content.ends_with('\n') {
        out.push('\n');
    }
    Some(out)
}
