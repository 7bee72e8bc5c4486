use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, state::AppState};

/// API v1 routes, without the `/api/v1` prefix
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/roles", get(handlers::list_roles))
        .route("/roles/{role}/questions", get(handlers::list_questions))
        .route("/answers", get(handlers::get_answer))
        .route("/ask", post(handlers::ask))
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{session_id}", delete(handlers::end_session))
        .route("/sessions/{session_id}/history", get(handlers::get_history))
}

/// Build the main router with nested API routes, request tracing and CORS
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
