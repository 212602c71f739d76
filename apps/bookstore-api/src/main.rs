use std::future::IntoFuture;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use book_lib::util::connect_lazy;
use book_lib::{BookRepository, DatabaseConfig};
use bookstore_api::config::ServerConfig;
use bookstore_api::constants::{DEFAULT_ENV, ENV, LOCAL_ENV, SERVICE};
use bookstore_api::shutdown::{graceful, shutdown_signal};
use bookstore_api::state::AppState;
use secrets::{Environment, ProcessEnv};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let process_env = ProcessEnv;

    // Setup tracing subscriber
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let env = process_env
        .lookup(ENV)
        .unwrap_or_else(|| DEFAULT_ENV.to_string());

    let registry = tracing_subscriber::registry().with(filter);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true);

    if env == LOCAL_ENV {
        let pretty_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .pretty();
        registry.with(json_layer).with(pretty_layer).init();
    } else {
        registry.with(json_layer).init();
    }

    tracing::info!(service = SERVICE, env = %env, "tracing initialized");

    // Resolve configuration before anything opens a connection
    let config = secrets::bootstrap(&process_env)
        .await
        .map_err(|e| format!("configuration bootstrap failed: {}", e))?;
    tracing::info!(
        source = %config.source(),
        settings = config.len(),
        "configuration resolved"
    );
    let server = ServerConfig::from_view(&config);
    let database = DatabaseConfig::from_view(&config);
    let pool = connect_lazy(&database)?;

    let app_state = AppState {
        books: Arc::new(BookRepository::new(pool)),
    };

    let app = bookstore_api::app(app_state, &server);

    let addr = format!("0.0.0.0:{}", server.port);
    let public_url = format!("http://127.0.0.1:{}", server.port);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("{} is ready to accept requests at: {}", SERVICE, public_url);

    // Serve with graceful shutdown, bounded by the drain timeout
    let (fired_tx, fired_rx) = watch::channel(false);
    let serving = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(fired_tx))
        .into_future();

    graceful(serving, fired_rx, server.shutdown_timeout)
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    Ok(())
}
