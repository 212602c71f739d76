//! Error types for the secrets library

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving startup configuration
#[derive(Error, Debug)]
pub enum SecretsError {
    /// The secret-store client could not be constructed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to reach the secret store
    #[error("Failed to connect to secret store: {0}")]
    ConnectionFailed(String),

    /// The secret store rejected the login
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Login succeeded at the HTTP level but carried no auth info
    #[error("Authentication failed: login response contained no authentication info")]
    EmptyAuthentication,

    /// Secret not found
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// Permission denied
    #[error("Permission denied for secret: {0}")]
    PermissionDenied(String),

    /// A credential file (service-account token) could not be read
    #[error("Unable to read token file {path}: {source}")]
    TokenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A detected local secrets file could not be read
    #[error("Unable to read local secrets file {path}: {source}")]
    LocalSecrets {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A detected local secrets file could not be parsed
    #[error("Malformed local secrets file: {0}")]
    LocalSecretsFormat(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SecretsError {
    /// Whether this error should stop the process when it comes out of a
    /// login attempt. Only client misconfiguration does; every other login
    /// failure leaves the process running on environment configuration.
    pub fn is_fatal_at_login(&self) -> bool {
        matches!(self, SecretsError::InvalidConfig(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_failures_are_not_fatal() {
        assert!(!SecretsError::EmptyAuthentication.is_fatal_at_login());
        assert!(!SecretsError::AuthenticationFailed("bad role".to_string()).is_fatal_at_login());
        assert!(!SecretsError::ConnectionFailed("refused".to_string()).is_fatal_at_login());
        assert!(SecretsError::InvalidConfig("bad addr".to_string()).is_fatal_at_login());
    }
}
