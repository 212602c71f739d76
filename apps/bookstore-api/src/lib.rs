pub mod config;
pub mod constants;
pub mod error;
pub mod methods;
pub mod shutdown;
pub mod state;

use axum::{
    http::{HeaderName, StatusCode},
    routing::get,
    Router,
};
use book_lib::BookRepositoryTrait;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::config::ServerConfig;
use crate::methods::books_index::books_index;
use crate::methods::health_check::health_check;
use crate::methods::routes::{BOOKS_PATH, SERVICE_HEALTH_PATH};
use crate::state::AppState;

/// Build the router with its middleware stack
pub fn app<B>(state: AppState<B>, server: &ServerConfig) -> Router
where
    B: BookRepositoryTrait + 'static,
{
    let mut app = Router::new()
        .route(BOOKS_PATH, get(books_index::<B>))
        .route(SERVICE_HEALTH_PATH, get(health_check))
        .with_state(state);

    // ============================================
    // Middleware stack (applied inner to outer)
    // Order: Request → Timeout → Request ID → Trace → Handler
    // ============================================

    // 1. Trace layer (innermost - closest to handler)
    app = app.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(tracing::Level::DEBUG))
            .on_response(DefaultOnResponse::new().level(tracing::Level::DEBUG)),
    );

    // 2. Request ID layers
    let x_request_id = HeaderName::from_static("x-request-id");
    app = app
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid));

    // 3. Timeout layer (returns 408 Request Timeout)
    app.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        server.request_timeout,
    ))
}
