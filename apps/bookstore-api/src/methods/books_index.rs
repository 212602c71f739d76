use std::fmt::Write;

use axum::extract::State;
use book_lib::{Book, BookRepositoryTrait};

use crate::error::{handle_repository_error, ApiError};
use crate::state::AppState;

/// Lists every book, one `isbn, title, author, $price` line each
pub async fn books_index<B>(State(state): State<AppState<B>>) -> Result<String, ApiError>
where
    B: BookRepositoryTrait + 'static,
{
    let books = state
        .books
        .all()
        .await
        .map_err(|e| handle_repository_error(e, "books_index"))?;

    Ok(render(&books))
}

fn render(books: &[Book]) -> String {
    books.iter().fold(String::new(), |mut out, bk| {
        let _ = writeln!(out, "{}, {}, {}, ${:.2}", bk.isbn, bk.title, bk.author, bk.price);
        out
    })
}
