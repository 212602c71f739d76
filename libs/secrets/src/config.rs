//! Configuration for the secret-store bootstrap

use std::path::PathBuf;
use std::time::Duration;

use crate::env::Environment;

pub const VAULT_ADDR: &str = "VAULT_ADDR";
pub const VAULT_NAMESPACE: &str = "VAULT_NAMESPACE";
pub const VAULT_CLIENT_TIMEOUT: &str = "VAULT_CLIENT_TIMEOUT";
pub const VAULT_SKIP_VERIFY: &str = "VAULT_SKIP_VERIFY";
pub const VAULT_TOKEN_FILE: &str = "VAULT_TOKEN_FILE";
pub const VAULT_K8S_ROLE: &str = "VAULT_K8S_ROLE";
pub const VAULT_K8S_TOKEN_PATH: &str = "VAULT_K8S_TOKEN_PATH";
pub const VAULT_K8S_AUTH_MOUNT: &str = "VAULT_K8S_AUTH_MOUNT";
pub const VAULT_SECRET_MOUNT: &str = "VAULT_SECRET_MOUNT";
pub const VAULT_SECRET_PATH: &str = "VAULT_SECRET_PATH";
pub const VAULT_SECRETS_FILE: &str = "VAULT_SECRETS_FILE";

pub const DEFAULT_VAULT_ADDR: &str = "https://127.0.0.1:8200";
pub const DEFAULT_K8S_TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";
pub const DEFAULT_K8S_AUTH_MOUNT: &str = "kubernetes";
pub const DEFAULT_SECRET_MOUNT: &str = "internal";
pub const DEFAULT_SECRET_PATH: &str = "bookstore/env";
const DEFAULT_CLIENT_TIMEOUT_SECS: &str = "60";

/// Everything the bootstrap needs to know about the secret store,
/// read once from the environment.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Vault API address
    pub addr: String,
    /// Optional enterprise namespace
    pub namespace: Option<String>,
    /// Raw client timeout, validated when the client is built
    pub timeout: String,
    /// Accept invalid TLS certificates
    pub skip_verify: bool,
    /// Static token file (strategy 1)
    pub token_file: Option<PathBuf>,
    /// Kubernetes auth role (strategy 2)
    pub k8s_role: Option<String>,
    /// Service-account token presented on kubernetes login
    pub k8s_token_path: PathBuf,
    /// Auth mount the kubernetes login is sent to
    pub k8s_auth_mount: String,
    /// KV v2 mount holding the service secrets
    pub secret_mount: String,
    /// Secret path within the mount
    pub secret_path: String,
    /// Mounted secrets file (local fallback)
    pub secrets_file: Option<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_VAULT_ADDR.to_string(),
            namespace: None,
            timeout: DEFAULT_CLIENT_TIMEOUT_SECS.to_string(),
            skip_verify: false,
            token_file: None,
            k8s_role: None,
            k8s_token_path: PathBuf::from(DEFAULT_K8S_TOKEN_PATH),
            k8s_auth_mount: DEFAULT_K8S_AUTH_MOUNT.to_string(),
            secret_mount: DEFAULT_SECRET_MOUNT.to_string(),
            secret_path: DEFAULT_SECRET_PATH.to_string(),
            secrets_file: None,
        }
    }
}

impl VaultConfig {
    /// Load configuration from the given environment
    pub fn from_env(env: &dyn Environment) -> Self {
        let default = Self::default();

        Self {
            addr: env.lookup(VAULT_ADDR).unwrap_or(default.addr),
            namespace: env.lookup(VAULT_NAMESPACE),
            timeout: env.lookup(VAULT_CLIENT_TIMEOUT).unwrap_or(default.timeout),
            skip_verify: env
                .lookup(VAULT_SKIP_VERIFY)
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1"))
                .unwrap_or(default.skip_verify),
            token_file: env.lookup(VAULT_TOKEN_FILE).map(PathBuf::from),
            k8s_role: env.lookup(VAULT_K8S_ROLE),
            k8s_token_path: env
                .lookup(VAULT_K8S_TOKEN_PATH)
                .map(PathBuf::from)
                .unwrap_or(default.k8s_token_path),
            k8s_auth_mount: env
                .lookup(VAULT_K8S_AUTH_MOUNT)
                .unwrap_or(default.k8s_auth_mount),
            secret_mount: env
                .lookup(VAULT_SECRET_MOUNT)
                .unwrap_or(default.secret_mount),
            secret_path: env
                .lookup(VAULT_SECRET_PATH)
                .unwrap_or(default.secret_path),
            secrets_file: env.lookup(VAULT_SECRETS_FILE),
        }
    }

    /// Parse the client timeout: whole seconds (`30`) or a number with a
    /// `ms`, `s`, `m` or `h` suffix (`30s`, `1m`). `None` when malformed.
    pub fn client_timeout(&self) -> Option<Duration> {
        parse_duration(&self.timeout)
    }

    /// API address without a trailing slash
    pub fn api_url(&self) -> &str {
        self.addr.trim_end_matches('/')
    }
}

fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let value: u64 = digits.parse().ok()?;

    match unit {
        "" | "s" => Some(Duration::from_secs(value)),
        "ms" => Some(Duration::from_millis(value)),
        "m" => value.checked_mul(60).map(Duration::from_secs),
        "h" => value.checked_mul(3600).map(Duration::from_secs),
        _ => None,
    }
}
