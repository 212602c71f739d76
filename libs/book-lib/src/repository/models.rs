use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub price: f32,
}
