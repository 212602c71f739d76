use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DatabaseConfig;
use crate::repository::errors::BookRepositoryError;

/// Build a pool without connecting; the first query opens the connection,
/// so an unavailable database surfaces per request instead of at startup.
pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, BookRepositoryError> {
    let options = config.connect_options()?;

    tracing::info!(database = %config.redacted_url(), "database pool configured");

    Ok(PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(options))
}
