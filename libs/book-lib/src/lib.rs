pub mod config;
pub mod repository;
pub mod util;

pub use config::DatabaseConfig;
pub use repository::{Book, BookRepository, BookRepositoryError, BookRepositoryTrait};
