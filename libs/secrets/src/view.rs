//! Resolved configuration and the merge of secret values over the environment

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde_json::Value;

/// A secret collection fetched as a single unit from one source.
///
/// Values are never printed by `Debug`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretCollection {
    values: BTreeMap<String, String>,
}

impl SecretCollection {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Build a collection from a JSON object, rendering non-string values
    pub fn from_json_object(object: serde_json::Map<String, Value>) -> Self {
        Self {
            values: object
                .into_iter()
                .map(|(k, v)| (k, render_value(v)))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SecretCollection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Debug for SecretCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretCollection")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Render a JSON value as a setting string
fn render_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Where the overriding values of a [`ConfigurationView`] came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Environment only
    Environment,
    /// A mounted secrets file
    LocalFile(PathBuf),
    /// A secret-store KV path
    SecretStore { mount: String, path: String },
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Environment => write!(f, "environment"),
            ConfigSource::LocalFile(path) => write!(f, "file:{}", path.display()),
            ConfigSource::SecretStore { mount, path } => write!(f, "vault:{mount}/{path}"),
        }
    }
}

/// Final resolved settings, built once at startup and read-only afterwards.
///
/// Lookups never fail: a missing key reads as an empty string or zero, and
/// it is up to the consumer to decide whether that is acceptable.
#[derive(Clone)]
pub struct ConfigurationView {
    settings: BTreeMap<String, String>,
    source: ConfigSource,
}

impl ConfigurationView {
    /// View over environment values only
    pub fn from_env_values(base: BTreeMap<String, String>) -> Self {
        Self {
            settings: base,
            source: ConfigSource::Environment,
        }
    }

    /// Merge `overrides` over `base`.
    ///
    /// Keys in `overrides` replace keys in `base`, keys only in `base` are
    /// kept, keys only in `overrides` are added.
    pub fn merge(
        base: BTreeMap<String, String>,
        overrides: &SecretCollection,
        source: ConfigSource,
    ) -> Self {
        Self::from_env_values(base).with_overrides(overrides, source)
    }

    /// Apply another collection over this view
    pub fn with_overrides(mut self, overrides: &SecretCollection, source: ConfigSource) -> Self {
        for (key, value) in overrides.iter() {
            self.settings.insert(key.to_string(), value.to_string());
        }
        self.source = source;
        self
    }

    /// Setting value, empty when absent
    pub fn get(&self, name: &str) -> &str {
        self.settings.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn get_string(&self, name: &str) -> String {
        self.get(name).to_string()
    }

    /// Setting value, or `default` when absent or empty
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.get(name) {
            "" => default,
            value => value,
        }
    }

    /// Integer setting, zero when absent or unparsable
    pub fn get_int(&self, name: &str) -> i64 {
        self.get_parsed(name)
    }

    /// Boolean setting; `true`, `1` and `yes` are truthy
    pub fn get_bool(&self, name: &str) -> bool {
        matches!(
            self.get(name).trim().to_lowercase().as_str(),
            "true" | "1" | "yes"
        )
    }

    /// Parse a setting, falling back to `T::default()`
    pub fn get_parsed<T: FromStr + Default>(&self, name: &str) -> T {
        self.get(name).trim().parse().unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.settings.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.settings
    }
}

impl fmt::Debug for ConfigurationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationView")
            .field("keys", &self.settings.keys().collect::<Vec<_>>())
            .field("source", &self.source)
            .finish()
    }
}
