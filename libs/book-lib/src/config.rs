use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, Secret};
use secrets::ConfigurationView;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::repository::errors::BookRepositoryError;

pub const DB_HOST: &str = "DB_HOST";
pub const DB_PORT: &str = "DB_PORT";
pub const DB_NAME: &str = "DB_NAME";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASS: &str = "DB_PASS";
pub const DB_SSLMODE: &str = "DB_SSLMODE";

const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_SSLMODE: &str = "disable";

/// Connection parameters resolved from the startup configuration
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: Secret<String>,
    pub ssl_mode: String,
}

impl DatabaseConfig {
    pub fn from_view(view: &ConfigurationView) -> Self {
        let port = match view.get_parsed::<u16>(DB_PORT) {
            0 => DEFAULT_DB_PORT,
            port => port,
        };

        Self {
            host: view.get_string(DB_HOST),
            port,
            name: view.get_string(DB_NAME),
            user: view.get_string(DB_USER),
            password: Secret::new(view.get_string(DB_PASS)),
            ssl_mode: view.get_or(DB_SSLMODE, DEFAULT_SSLMODE).to_string(),
        }
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, BookRepositoryError> {
        let ssl_mode = PgSslMode::from_str(&self.ssl_mode)
            .map_err(|_| BookRepositoryError::Config(format!("unknown sslmode '{}'", self.ssl_mode)))?;

        let mut options = PgConnectOptions::new()
            .port(self.port)
            .ssl_mode(ssl_mode);
        // unset values keep the driver defaults
        if !self.host.is_empty() {
            options = options.host(&self.host);
        }
        if !self.name.is_empty() {
            options = options.database(&self.name);
        }
        if !self.user.is_empty() {
            options = options.username(&self.user);
        }
        if !self.password.expose_secret().is_empty() {
            options = options.password(self.password.expose_secret());
        }

        Ok(options)
    }

    /// Connection URL with the password masked, for logging
    pub fn redacted_url(&self) -> String {
        format!(
            "postgres://{}:***@{}:{}/{}?sslmode={}",
            self.user, self.host, self.port, self.name, self.ssl_mode
        )
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrets::{ConfigSource, SecretCollection};
    use std::collections::BTreeMap;

    fn view(pairs: &[(&str, &str)]) -> ConfigurationView {
        let base: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigurationView::from_env_values(base)
    }

    #[test]
    fn test_from_view_reads_all_parameters() {
        let config = DatabaseConfig::from_view(&view(&[
            (DB_HOST, "db"),
            (DB_PORT, "6543"),
            (DB_NAME, "bookstore"),
            (DB_USER, "u"),
            (DB_PASS, "p"),
            (DB_SSLMODE, "require"),
        ]));

        assert_eq!(config.host, "db");
        assert_eq!(config.port, 6543);
        assert_eq!(config.name, "bookstore");
        assert_eq!(config.user, "u");
        assert_eq!(config.password.expose_secret(), "p");
        assert_eq!(config.ssl_mode, "require");
        assert!(config.connect_options().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::from_view(&view(&[(DB_HOST, "db")]));

        assert_eq!(config.port, 5432);
        assert_eq!(config.ssl_mode, "disable");
    }

    #[test]
    fn test_secret_store_password_wins() {
        let overrides: SecretCollection = [(DB_PASS, "fromvault")].into_iter().collect();
        let base = view(&[(DB_PASS, "fromenv")]).as_map().clone();
        let merged = ConfigurationView::merge(base, &overrides, ConfigSource::Environment);

        let config = DatabaseConfig::from_view(&merged);

        assert_eq!(config.password.expose_secret(), "fromvault");
    }

    #[test]
    fn test_unknown_sslmode_is_rejected() {
        let config = DatabaseConfig::from_view(&view(&[(DB_SSLMODE, "sometimes")]));

        assert!(matches!(
            config.connect_options(),
            Err(BookRepositoryError::Config(_))
        ));
    }

    #[test]
    fn test_password_is_never_printed() {
        let config = DatabaseConfig::from_view(&view(&[(DB_USER, "u"), (DB_PASS, "hunter2")]));

        assert!(!format!("{config:?}").contains("hunter2"));
        assert!(!config.redacted_url().contains("hunter2"));
    }
}
