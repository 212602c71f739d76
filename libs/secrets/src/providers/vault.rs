//! HashiCorp Vault secret store
//!
//! Supports token and kubernetes authentication, and reads from a KV v2
//! secrets engine.
//! See: https://developer.hashicorp.com/vault/api-docs/secret/kv/kv-v2

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::{AuthStrategy, SecretCollection, SecretSession, SecretsError, SecretsProvider, VaultConfig};

const TOKEN_HEADER: &str = "X-Vault-Token";
const NAMESPACE_HEADER: &str = "X-Vault-Namespace";

/// Vault API client
pub struct VaultClient {
    client: Client,
    base_url: String,
    namespace: Option<String>,
    auth_mount: String,
}

// API request/response types

#[derive(Debug, Serialize)]
struct KubernetesLoginRequest<'a> {
    role: &'a str,
    jwt: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    auth: Option<AuthInfo>,
}

#[derive(Debug, Deserialize)]
struct AuthInfo {
    #[serde(default)]
    client_token: String,
    #[serde(default)]
    lease_duration: u64,
}

#[derive(Debug, Deserialize)]
struct KvResponse {
    data: Option<KvData>,
}

#[derive(Debug, Deserialize)]
struct KvData {
    data: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

impl VaultClient {
    /// Build a client from configuration.
    ///
    /// Fails when the address or timeout is malformed; no network call is made.
    pub fn new(config: &VaultConfig) -> Result<Self, SecretsError> {
        let url = Url::parse(config.api_url()).map_err(|e| {
            SecretsError::InvalidConfig(format!("invalid VAULT_ADDR '{}': {e}", config.addr))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SecretsError::InvalidConfig(format!(
                "VAULT_ADDR must be an http(s) URL, got scheme '{}'",
                url.scheme()
            )));
        }

        let timeout = config.client_timeout().ok_or_else(|| {
            SecretsError::InvalidConfig(format!(
                "invalid VAULT_CLIENT_TIMEOUT '{}': expected seconds or a duration like 30s",
                config.timeout
            ))
        })?;

        let mut builder = Client::builder().danger_accept_invalid_certs(config.skip_verify);
        // zero disables the timeout
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SecretsError::InvalidConfig(format!("unable to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url().to_string(),
            namespace: config.namespace.clone(),
            auth_mount: trim_slashes(&config.k8s_auth_mount).to_string(),
        })
    }

    fn with_namespace(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.namespace {
            Some(ns) => request.header(NAMESPACE_HEADER, ns),
            None => request,
        }
    }

    /// Exchange a service-account token for a Vault token
    async fn login_kubernetes(
        &self,
        role: &str,
        token_path: &Path,
    ) -> Result<SecretSession, SecretsError> {
        let jwt = tokio::fs::read_to_string(token_path)
            .await
            .map_err(|source| SecretsError::TokenFile {
                path: token_path.to_path_buf(),
                source,
            })?;

        debug!(role = %role, mount = %self.auth_mount, "Logging in to Vault with kubernetes auth");

        let login_url = format!("{}/v1/auth/{}/login", self.base_url, self.auth_mount);
        let request = KubernetesLoginRequest {
            role,
            jwt: jwt.trim(),
        };

        let response = self
            .with_namespace(self.client.post(&login_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| SecretsError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response).await;
            return Err(SecretsError::AuthenticationFailed(format!(
                "HTTP {status}: {detail}"
            )));
        }

        let login: LoginResponse = response.json().await?;
        let auth = login
            .auth
            .filter(|auth| !auth.client_token.is_empty())
            .ok_or(SecretsError::EmptyAuthentication)?;

        debug!(lease_secs = auth.lease_duration, "Successfully authenticated with Vault");
        Ok(SecretSession::with_lease(
            Secret::new(auth.client_token),
            Duration::from_secs(auth.lease_duration),
        ))
    }

    /// Read a KV v2 secret
    async fn read_kv2(
        &self,
        session: &SecretSession,
        mount: &str,
        path: &str,
    ) -> Result<SecretCollection, SecretsError> {
        if session.is_empty() {
            return Err(SecretsError::AuthenticationFailed(
                "session token is empty".to_string(),
            ));
        }
        if session.is_expired() {
            return Err(SecretsError::AuthenticationFailed(
                "session token lease has expired".to_string(),
            ));
        }

        let mount = trim_slashes(mount);
        let url = format!(
            "{}/v1/{}/data/{}",
            self.base_url,
            encode_path(mount),
            encode_path(trim_slashes(path))
        );
        let location = format!("{mount}/{}", trim_slashes(path));

        let response = self
            .with_namespace(self.client.get(&url))
            .header(TOKEN_HEADER, session.token().expose_secret())
            .send()
            .await
            .map_err(|e| SecretsError::ConnectionFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let kv: KvResponse = response.json().await?;
                let data = kv
                    .data
                    .and_then(|d| d.data)
                    .ok_or_else(|| SecretsError::NotFound(location.clone()))?;
                debug!(path = %location, keys = data.len(), "Secret read from Vault");
                Ok(SecretCollection::from_json_object(data))
            }
            StatusCode::NOT_FOUND => Err(SecretsError::NotFound(location)),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                let detail = error_detail(response).await;
                Err(SecretsError::PermissionDenied(format!("{location}: {detail}")))
            }
            status => {
                let detail = error_detail(response).await;
                Err(SecretsError::Internal(format!("HTTP {status}: {detail}")))
            }
        }
    }
}

#[async_trait]
impl SecretsProvider for VaultClient {
    async fn authenticate(&self, strategy: &AuthStrategy) -> Result<SecretSession, SecretsError> {
        match strategy {
            AuthStrategy::StaticToken { token, .. } => Ok(SecretSession::from_token(token.clone())),
            AuthStrategy::WorkloadIdentity { role, token_path } => {
                self.login_kubernetes(role, token_path).await
            }
            AuthStrategy::None => Err(SecretsError::Internal(
                "no authentication strategy configured".to_string(),
            )),
        }
    }

    async fn fetch(
        &self,
        session: SecretSession,
        mount: &str,
        path: &str,
    ) -> Result<SecretCollection, SecretsError> {
        self.read_kv2(&session, mount, path).await
    }

    fn name(&self) -> &'static str {
        "vault"
    }
}

fn trim_slashes(s: &str) -> &str {
    s.trim_matches('/')
}

/// Percent-encode each path segment, keeping the separators
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Best-effort description of an error response
async fn error_detail(response: reqwest::Response) -> String {
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed.errors.join("; "),
        _ if body.trim().is_empty() => "no response body".to_string(),
        _ => body,
    }
}
