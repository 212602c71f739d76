//! Process environment access

use std::collections::BTreeMap;

/// Read-only view of configuration signals supplied by the environment.
///
/// Every other component discovers strategies and paths through this trait,
/// so tests can drive the bootstrap with an in-memory [`MapEnv`] instead of
/// mutating the process environment.
pub trait Environment: Send + Sync {
    /// Get a variable, returning `None` when it is unset or empty
    fn lookup(&self, name: &str) -> Option<String>;

    /// Snapshot of every variable, used as the base configuration
    fn vars(&self) -> BTreeMap<String, String>;

    /// Get a variable, returning an empty string when it is unset
    fn get(&self, name: &str) -> String {
        self.lookup(name).unwrap_or_default()
    }
}

/// Environment backed by `std::env`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        match std::env::var(name) {
            Ok(value) if !value.is_empty() => Some(value),
            Ok(_) => None,
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(_)) => {
                tracing::warn!(name = %name, "ignoring environment variable with invalid UTF-8");
                None
            }
        }
    }

    fn vars(&self) -> BTreeMap<String, String> {
        // non-UTF-8 entries are skipped
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

/// In-memory environment
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        self.vars.get(name).filter(|v| !v.is_empty()).cloned()
    }

    fn vars(&self) -> BTreeMap<String, String> {
        self.vars.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_var_is_empty() {
        let env = MapEnv::new();
        assert_eq!(env.get("NONEXISTENT_ENV_VAR_12345"), "");
        assert!(env.lookup("NONEXISTENT_ENV_VAR_12345").is_none());
    }

    #[test]
    fn test_empty_var_is_absent_but_kept_in_snapshot() {
        let env = MapEnv::new().with("EMPTY", "").with("DB_HOST", "db");

        assert!(env.lookup("EMPTY").is_none());
        assert_eq!(env.get("DB_HOST"), "db");
        assert_eq!(env.vars().len(), 2);
    }

    #[test]
    fn test_process_env_reads_std_env() {
        std::env::set_var("TEST_PROCESS_ENV_VAR_98765", "secret_value");

        let env = ProcessEnv;
        assert_eq!(env.get("TEST_PROCESS_ENV_VAR_98765"), "secret_value");
        assert_eq!(
            env.vars().get("TEST_PROCESS_ENV_VAR_98765").map(String::as_str),
            Some("secret_value")
        );

        std::env::remove_var("TEST_PROCESS_ENV_VAR_98765");
    }
}
