//! Mounted secrets files
//!
//! When a secrets injector renders a file under its mount point, the
//! service reads that file instead of talking to Vault directly.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::{SecretCollection, SecretsError};

/// Directory fragment identifying an injector-mounted secrets directory
pub const SECRETS_MOUNT_MARKER: &str = "/vault/secrets";

/// A secrets file detected under the mount-point convention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSecrets {
    dir: PathBuf,
    name: String,
    path: PathBuf,
}

impl LocalSecrets {
    /// Detect a mounted secrets file from the configured path.
    ///
    /// Returns `None` when the value is absent or does not live under
    /// [`SECRETS_MOUNT_MARKER`]. The file does not need to exist yet.
    pub fn detect(file_path: Option<&str>) -> Option<Self> {
        let raw = file_path.map(str::trim).filter(|p| !p.is_empty())?;
        let path = absolute(Path::new(raw))?;

        let dir = path.parent()?.to_path_buf();
        let name = path.file_stem()?.to_str()?.to_string();

        if !dir.to_string_lossy().contains(SECRETS_MOUNT_MARKER) {
            debug!(path = %path.display(), "secrets file is outside the secrets mount, ignoring");
            return None;
        }

        Some(Self { dir, name, path })
    }

    /// Directory holding the secrets file
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name without extension
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file's key/value pairs.
    ///
    /// `.json` files hold one JSON object; anything else is read as
    /// `KEY=VALUE` lines.
    pub fn load(&self) -> Result<SecretCollection, SecretsError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|source| SecretsError::LocalSecrets {
                path: self.path.clone(),
                source,
            })?;

        let is_json = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let collection = if is_json {
            parse_json(&contents)?
        } else {
            parse_dotenv(&contents)?
        };

        debug!(path = %self.path.display(), keys = collection.len(), "Loaded local secrets file");
        Ok(collection)
    }
}

fn absolute(path: &Path) -> Option<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };
    Some(clean(&joined))
}

/// Lexically normalize a path: `.` and repeated separators are dropped,
/// `..` removes the previous segment and never climbs above the root.
fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

fn parse_json(contents: &str) -> Result<SecretCollection, SecretsError> {
    match serde_json::from_str::<serde_json::Value>(contents) {
        Ok(serde_json::Value::Object(map)) => Ok(SecretCollection::from_json_object(map)),
        Ok(_) => Err(SecretsError::LocalSecretsFormat(
            "expected a JSON object at the top level".to_string(),
        )),
        Err(e) => Err(SecretsError::LocalSecretsFormat(e.to_string())),
    }
}

fn parse_dotenv(contents: &str) -> Result<SecretCollection, SecretsError> {
    dotenvy::from_read_iter(contents.as_bytes())
        .collect::<Result<SecretCollection, _>>()
        .map_err(|e| SecretsError::LocalSecretsFormat(e.to_string()))
}
