use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookRepositoryError {
    #[error("invalid database configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
