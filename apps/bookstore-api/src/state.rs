use std::sync::Arc;

use book_lib::{BookRepository, BookRepositoryTrait};

pub struct AppState<B = BookRepository>
where
    B: BookRepositoryTrait + 'static,
{
    pub books: Arc<B>,
}

// manual impl: the repository itself does not need to be Clone
impl<B: BookRepositoryTrait + 'static> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            books: Arc::clone(&self.books),
        }
    }
}
