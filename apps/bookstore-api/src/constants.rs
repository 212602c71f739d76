pub const SERVICE: &str = "bookstore-api";
pub const ENV: &str = "ENV";

pub const LOCAL_ENV: &str = "local";
pub const DEFAULT_ENV: &str = "prod";

pub const PORT: &str = "PORT";
pub const DEFAULT_PORT: u16 = 8080;

pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
pub const SHUTDOWN_TIMEOUT_SECS: &str = "SHUTDOWN_TIMEOUT_SECS";
