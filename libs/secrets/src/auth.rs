//! Authentication strategy selection and session credentials

use std::path::PathBuf;
use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, Secret};
use tracing::debug;

use crate::VaultConfig;

/// How the process authenticates to the secret store.
///
/// Selected once at startup; exactly one variant is active per run.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Token read from a file on disk, used directly as the credential
    StaticToken { path: PathBuf, token: Secret<String> },
    /// Kubernetes service-account token exchanged for a session on login
    WorkloadIdentity { role: String, token_path: PathBuf },
    /// No secret-store authentication configured
    None,
}

impl AuthStrategy {
    /// Pick the strategy from configuration, first match wins:
    /// 1. static token file that exists and is non-empty
    /// 2. workload-identity role
    /// 3. none
    ///
    /// A token file that is missing, unreadable or empty is not an error,
    /// selection just moves on.
    pub fn select(config: &VaultConfig) -> Self {
        if let Some(path) = &config.token_file {
            match std::fs::read_to_string(path) {
                Ok(contents) if !contents.trim().is_empty() => {
                    debug!(path = %path.display(), "using static token file");
                    return AuthStrategy::StaticToken {
                        path: path.clone(),
                        token: Secret::new(contents.trim().to_string()),
                    };
                }
                Ok(_) => {
                    debug!(path = %path.display(), "token file is empty, skipping");
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "token file not readable, skipping");
                }
            }
        }

        if let Some(role) = &config.k8s_role {
            debug!(role = %role, "using kubernetes workload identity");
            return AuthStrategy::WorkloadIdentity {
                role: role.clone(),
                token_path: config.k8s_token_path.clone(),
            };
        }

        AuthStrategy::None
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            AuthStrategy::StaticToken { .. } => "static_token",
            AuthStrategy::WorkloadIdentity { .. } => "workload_identity",
            AuthStrategy::None => "none",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, AuthStrategy::None)
    }
}

/// Credential obtained from a successful authentication.
///
/// Consumed by a single fetch; never cached.
#[derive(Debug, Clone)]
pub struct SecretSession {
    token: Secret<String>,
    lease: Option<Duration>,
    obtained_at: Instant,
}

impl SecretSession {
    /// Session from a static token; no lease is known
    pub fn from_token(token: Secret<String>) -> Self {
        Self {
            token,
            lease: None,
            obtained_at: Instant::now(),
        }
    }

    /// Session from a login; a zero lease means the token does not expire
    pub fn with_lease(token: Secret<String>, lease: Duration) -> Self {
        Self {
            token,
            lease: (!lease.is_zero()).then_some(lease),
            obtained_at: Instant::now(),
        }
    }

    pub fn token(&self) -> &Secret<String> {
        &self.token
    }

    pub fn lease(&self) -> Option<Duration> {
        self.lease
    }

    pub fn is_empty(&self) -> bool {
        self.token.expose_secret().is_empty()
    }

    pub fn is_expired(&self) -> bool {
        match self.lease {
            Some(lease) => self.obtained_at.elapsed() >= lease,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_with(token_file: Option<PathBuf>, role: Option<&str>) -> VaultConfig {
        VaultConfig {
            token_file,
            k8s_role: role.map(str::to_string),
            ..VaultConfig::default()
        }
    }

    #[test]
    fn test_static_token_wins_over_workload_identity() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  s.abc123  ").unwrap();

        let strategy =
            AuthStrategy::select(&config_with(Some(file.path().to_path_buf()), Some("bookstore")));

        match strategy {
            AuthStrategy::StaticToken { token, .. } => {
                assert_eq!(token.expose_secret(), "s.abc123");
            }
            other => panic!("expected static token, got {}", other.name()),
        }
    }

    #[test]
    fn test_missing_token_file_falls_through_to_role() {
        let strategy = AuthStrategy::select(&config_with(
            Some(PathBuf::from("/nonexistent/vault-token-12345")),
            Some("bookstore"),
        ));

        match strategy {
            AuthStrategy::WorkloadIdentity { role, token_path } => {
                assert_eq!(role, "bookstore");
                assert_eq!(token_path, PathBuf::from(crate::config::DEFAULT_K8S_TOKEN_PATH));
            }
            other => panic!("expected workload identity, got {}", other.name()),
        }
    }

    #[test]
    fn test_empty_token_file_falls_through() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let strategy = AuthStrategy::select(&config_with(Some(file.path().to_path_buf()), None));

        assert!(strategy.is_none());
    }

    #[test]
    fn test_nothing_configured() {
        assert!(AuthStrategy::select(&config_with(None, None)).is_none());
    }

    #[test]
    fn test_session_lease() {
        let session = SecretSession::with_lease(Secret::new("t".to_string()), Duration::ZERO);
        assert!(session.lease().is_none());
        assert!(!session.is_expired());

        let session = SecretSession::with_lease(Secret::new("t".to_string()), Duration::from_secs(3600));
        assert_eq!(session.lease(), Some(Duration::from_secs(3600)));
        assert!(!session.is_expired());

        assert!(SecretSession::from_token(Secret::new(String::new())).is_empty());
    }
}
