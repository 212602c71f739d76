pub mod books_index;
pub mod health_check;
pub mod routes;
