//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Two error kinds reach the boundary: validation (400) and not-found
//! (404). Anything else is surfaced as an opaque internal error without
//! exposing store internals.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use confab_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Chat domain errors (not-found, validation).
    Chat(ChatError),
    /// Boundary validation failure (bad path/query input).
    Validation(String),
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        ApiError::Chat(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Chat(ChatError::UserNotFound) => {
                (StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found".to_string())
            }
            ApiError::Chat(ChatError::ConversationNotFound) => (
                StatusCode::NOT_FOUND,
                "CONVERSATION_NOT_FOUND",
                "Conversation not found".to_string(),
            ),
            ApiError::Chat(ChatError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            // Opaque: repository failures never leak internal detail.
            ApiError::Chat(ChatError::Repository(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal error".to_string(),
            ),
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
