use std::time::Duration;

use secrets::ConfigurationView;

use crate::constants::{DEFAULT_PORT, PORT, REQUEST_TIMEOUT_SECS, SHUTDOWN_TIMEOUT_SECS};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub request_timeout: Duration,
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    pub fn from_view(view: &ConfigurationView) -> Self {
        let default = Self::default();

        let port = match view.get_parsed::<u16>(PORT) {
            0 => default.port,
            port => port,
        };

        let request_timeout = match view.get_parsed::<u64>(REQUEST_TIMEOUT_SECS) {
            0 => default.request_timeout,
            secs => Duration::from_secs(secs),
        };

        let shutdown_timeout = match view.get_parsed::<u64>(SHUTDOWN_TIMEOUT_SECS) {
            0 => default.shutdown_timeout,
            secs => Duration::from_secs(secs),
        };

        Self {
            port,
            request_timeout,
            shutdown_timeout,
        }
    }
}
