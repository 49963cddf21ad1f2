// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{comment, health},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the v1 comment API and the health probe.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (service and shutdown token).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let comment_routes = Router::new()
        .route("/", get(comment::list_comments).post(comment::create_comment))
        .route("/{id}", delete(comment::delete_comment));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1/comments", comment_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
