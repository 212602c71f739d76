use async_trait::async_trait;

use crate::repository::errors::BookRepositoryError;
use crate::repository::models::Book;

#[async_trait]
pub trait BookRepositoryTrait: Send + Sync {
    async fn all(&self) -> Result<Vec<Book>, BookRepositoryError>;
}
