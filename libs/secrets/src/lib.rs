//! # Startup Configuration Bootstrap
//!
//! Resolves the service configuration once, before any listener opens, by
//! layering secrets from Vault (or a mounted secrets file) over the process
//! environment.
//!
//! ## Resolution
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Bootstrap                            │
//! │  ┌─────────────────────────────────────────────────────┐   │
//! │  │  1. VAULT_SECRETS_FILE under /vault/secrets → load  │   │
//! │  │  2. Else build Vault client (malformed → fatal)     │   │
//! │  │  3. Token file → token, else k8s role → login       │   │
//! │  │     (login failure → warn, environment only)        │   │
//! │  │  4. Session → fetch KV v2 secret (failure → fatal)  │   │
//! │  │  5. Merge secrets over environment                  │   │
//! │  └─────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use secrets::{bootstrap, ProcessEnv};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = bootstrap(&ProcessEnv).await.unwrap_or_else(|e| {
//!         eprintln!("Fatal error: {e}");
//!         std::process::exit(1);
//!     });
//!
//!     let db_host = config.get("DB_HOST");
//! }
//! ```

mod auth;
pub mod config;
mod env;
mod error;
mod provider;
mod view;

pub mod providers;

pub use auth::{AuthStrategy, SecretSession};
pub use config::VaultConfig;
pub use env::{Environment, MapEnv, ProcessEnv};
pub use error::SecretsError;
pub use provider::SecretsProvider;
pub use view::{ConfigSource, ConfigurationView, SecretCollection};

use providers::{LocalSecrets, VaultClient};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Resolve the configuration from the process-wide environment sources.
///
/// Any error returned is fatal: the caller must not start serving.
pub async fn bootstrap(env: &dyn Environment) -> Result<ConfigurationView, SecretsError> {
    Bootstrap::new(env).run().await
}

/// Sequences the configuration sources at startup
pub struct Bootstrap<'a> {
    env: &'a dyn Environment,
    config: VaultConfig,
}

impl<'a> Bootstrap<'a> {
    pub fn new(env: &'a dyn Environment) -> Self {
        Self {
            env,
            config: VaultConfig::from_env(env),
        }
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Run the full resolution against Vault or a mounted secrets file
    pub async fn run(self) -> Result<ConfigurationView, SecretsError> {
        let base = self.env.vars();

        if let Some(local) = LocalSecrets::detect(self.config.secrets_file.as_deref()) {
            info!(path = %local.path().display(), "Using mounted secrets file");
            let overrides = local.load()?;
            return Ok(ConfigurationView::merge(
                base,
                &overrides,
                ConfigSource::LocalFile(local.path().to_path_buf()),
            ));
        }

        let client = VaultClient::new(&self.config)?;
        self.resolve_with(&client, base).await
    }

    /// Authenticate, fetch and merge using the given secret store
    pub async fn resolve_with(
        &self,
        provider: &dyn SecretsProvider,
        base: BTreeMap<String, String>,
    ) -> Result<ConfigurationView, SecretsError> {
        let strategy = AuthStrategy::select(&self.config);
        if strategy.is_none() {
            debug!("Secret store not configured, using environment variables only");
            return Ok(ConfigurationView::from_env_values(base));
        }

        let session = match provider.authenticate(&strategy).await {
            Ok(session) => {
                info!(
                    provider = provider.name(),
                    strategy = strategy.name(),
                    "Authenticated with secret store"
                );
                session
            }
            Err(e) if e.is_fatal_at_login() => return Err(e),
            Err(e) => {
                warn!(
                    provider = provider.name(),
                    strategy = strategy.name(),
                    error = %e,
                    "Failed to authenticate with secret store, using environment variables only"
                );
                return Ok(ConfigurationView::from_env_values(base));
            }
        };

        let mount = &self.config.secret_mount;
        let path = &self.config.secret_path;
        let secrets = provider.fetch(session, mount, path).await?;
        info!(
            provider = provider.name(),
            mount = %mount,
            path = %path,
            keys = secrets.len(),
            "Secrets merged over environment"
        );

        Ok(ConfigurationView::merge(
            base,
            &secrets,
            ConfigSource::SecretStore {
                mount: mount.clone(),
                path: path.clone(),
            },
        ))
    }
}
