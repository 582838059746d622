//! Message timeline HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/v1/conversations/{id}/messages - List messages in timeline order
//! - POST /api/v1/conversations/{id}/messages - Append a message

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use confab_types::id::ConversationId;
use confab_types::message::{Message, MessageRole, NewMessage};

use crate::http::error::ApiError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for appending a message; the conversation id comes from
/// the path. A role value other than "user"/"assistant" fails
/// deserialization.
#[derive(Debug, Deserialize)]
pub struct CreateMessageBody {
    pub content: String,
    pub role: MessageRole,
    #[serde(default)]
    pub attachments: Option<Vec<String>>,
}

/// GET /api/v1/conversations/{id}/messages - List messages ascending by
/// creation time.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<ConversationId>,
) -> Result<Json<ApiResponse<Vec<Message>>>, ApiError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let messages = state.chat_service.list_messages(conversation_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(messages, request_id, elapsed)
        .with_link(
            "self",
            &format!("/api/v1/conversations/{conversation_id}/messages"),
        )
        .with_link(
            "conversation",
            &format!("/api/v1/conversations/{conversation_id}"),
        );

    Ok(Json(resp))
}

/// POST /api/v1/conversations/{id}/messages - Append a message.
///
/// A user-role message additionally arms the deferred assistant reply;
/// the response returns as soon as the user message is stored.
pub async fn create_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<ConversationId>,
    Json(body): Json<CreateMessageBody>,
) -> Result<Json<ApiResponse<Message>>, ApiError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let message = state
        .chat_service
        .create_message(NewMessage {
            conversation_id,
            content: body.content,
            role: body.role,
            attachments: body.attachments,
        })
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(message, request_id, elapsed).with_link(
        "conversation",
        &format!("/api/v1/conversations/{conversation_id}"),
    );

    Ok(Json(resp))
}
