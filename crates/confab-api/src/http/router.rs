//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Users
        .route(
            "/users/{id}",
            get(handlers::user::get_user).patch(handlers::user::update_user),
        )
        .route(
            "/users/{id}/conversations",
            get(handlers::conversation::list_conversations),
        )
        // Usage ledger
        .route(
            "/users/{id}/usage",
            get(handlers::usage::query_usage).post(handlers::usage::record_usage),
        )
        // Conversations
        .route(
            "/conversations",
            post(handlers::conversation::create_conversation),
        )
        .route(
            "/conversations/{id}",
            patch(handlers::conversation::update_conversation)
                .delete(handlers::conversation::delete_conversation),
        )
        // Message timeline
        .route(
            "/conversations/{id}/messages",
            get(handlers::message::list_messages).post(handlers::message::create_message),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
