use book_lib::util::connect_lazy;
use book_lib::{Book, BookRepository, BookRepositoryTrait, DatabaseConfig};
use secrets::{ConfigurationView, MapEnv};
use sqlx::migrate::Migrator;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;

static MIGRATOR: Migrator = sqlx::migrate!();

fn view_for(env: MapEnv) -> ConfigurationView {
    use secrets::Environment;
    ConfigurationView::from_env_values(env.vars())
}

#[tokio::test]
async fn lazy_pool_does_not_connect_at_startup() {
    // nothing listens here; building the pool must still succeed
    let view = view_for(
        MapEnv::new()
            .with("DB_HOST", "127.0.0.1")
            .with("DB_PORT", "9")
            .with("DB_NAME", "bookstore")
            .with("DB_USER", "u")
            .with("DB_PASS", "p"),
    );

    let pool = connect_lazy(&DatabaseConfig::from_view(&view));

    assert!(pool.is_ok());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn integration_list_books() {
    let container = Postgres::default()
        .start()
        .await
        .expect("Failed to start Postgres container");

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get Postgres port");

    let view = view_for(
        MapEnv::new()
            .with("DB_HOST", "127.0.0.1")
            .with("DB_PORT", port.to_string())
            .with("DB_NAME", "postgres")
            .with("DB_USER", "postgres")
            .with("DB_PASS", "postgres"),
    );

    let pool = connect_lazy(&DatabaseConfig::from_view(&view)).unwrap();
    MIGRATOR.run(&pool).await.unwrap();

    sqlx::query("INSERT INTO books (isbn, title, author, price) VALUES ($1, $2, $3, $4)")
        .bind("978-1503261969")
        .bind("Emma")
        .bind("Jane Austen")
        .bind(9.44_f32)
        .execute(&pool)
        .await
        .unwrap();

    let books = BookRepository::new(pool).all().await.unwrap();

    assert_eq!(
        books,
        vec![Book {
            isbn: "978-1503261969".to_string(),
            title: "Emma".to_string(),
            author: "Jane Austen".to_string(),
            price: 9.44,
        }]
    );
}
