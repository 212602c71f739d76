use async_trait::async_trait;
use sqlx::{query_as, PgPool};

use crate::repository::errors::BookRepositoryError;
use crate::repository::models::Book;
use crate::repository::traits::BookRepositoryTrait;

#[derive(Debug, Clone)]
pub struct BookRepository {
    pub pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn all(&self) -> Result<Vec<Book>, BookRepositoryError> {
        let books = query_as::<_, Book>(
            r#"
            SELECT isbn, title, author, price FROM books
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }
}
