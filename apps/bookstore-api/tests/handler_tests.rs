use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use mockall::mock;
use std::sync::Arc;
use tower::ServiceExt;

use book_lib::{Book, BookRepositoryError, BookRepositoryTrait};
use bookstore_api::config::ServerConfig;
use bookstore_api::state::AppState;

// ==================== MOCKS ====================

mock! {
    pub BookRepo {}

    #[async_trait]
    impl BookRepositoryTrait for BookRepo {
        async fn all(&self) -> Result<Vec<Book>, BookRepositoryError>;
    }
}

// ==================== TEST HELPERS ====================

fn create_test_app(book_repo: MockBookRepo) -> axum::Router {
    let state = AppState {
        books: Arc::new(book_repo),
    };
    bookstore_api::app(state, &ServerConfig::default())
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

// ==================== BOOKS INDEX TESTS ====================

#[tokio::test]
async fn test_books_index_lists_books() {
    let mut book_repo = MockBookRepo::new();
    book_repo.expect_all().times(1).returning(|| {
        Ok(vec![
            Book {
                isbn: "978-1503261969".to_string(),
                title: "Emma".to_string(),
                author: "Jane Austen".to_string(),
                price: 9.44,
            },
            Book {
                isbn: "978-1505255607".to_string(),
                title: "The Time Machine".to_string(),
                author: "H. G. Wells".to_string(),
                price: 5.99,
            },
        ])
    });

    let (status, body) = get(create_test_app(book_repo), "/books").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "978-1503261969, Emma, Jane Austen, $9.44\n978-1505255607, The Time Machine, H. G. Wells, $5.99\n"
    );
}

#[tokio::test]
async fn test_books_index_empty() {
    let mut book_repo = MockBookRepo::new();
    book_repo.expect_all().times(1).returning(|| Ok(vec![]));

    let (status, body) = get(create_test_app(book_repo), "/books").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_books_index_repository_error_returns_500() {
    let mut book_repo = MockBookRepo::new();
    book_repo
        .expect_all()
        .times(1)
        .returning(|| Err(BookRepositoryError::Config("connection refused".to_string())));

    let (status, body) = get(create_test_app(book_repo), "/books").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal Server Error");
}

#[tokio::test]
async fn test_health_check() {
    let book_repo = MockBookRepo::new();

    let (status, body) = get(create_test_app(book_repo), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let (status, _) = get(create_test_app(MockBookRepo::new()), "/authors").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
