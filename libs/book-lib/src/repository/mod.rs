pub mod book_repository;
pub mod errors;
pub mod models;
pub mod traits;

pub use book_repository::BookRepository;
pub use errors::BookRepositoryError;
pub use models::Book;
pub use traits::BookRepositoryTrait;
