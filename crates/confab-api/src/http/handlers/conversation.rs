//! Conversation CRUD HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/users/{id}/conversations - List a user's conversations
//! - POST   /api/v1/conversations            - Create a conversation
//! - PATCH  /api/v1/conversations/{id}       - Update a conversation
//! - DELETE /api/v1/conversations/{id}       - Delete a conversation (cascade)

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use confab_types::conversation::{Conversation, ConversationPatch, NewConversation};
use confab_types::id::{ConversationId, UserId};

use crate::http::error::ApiError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/users/{id}/conversations - List conversations, pinned
/// first, then most recently touched.
pub async fn list_conversations(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ApiResponse<Vec<Conversation>>>, ApiError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let conversations = state.chat_service.list_conversations(user_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(conversations, request_id, elapsed)
        .with_link("self", &format!("/api/v1/users/{user_id}/conversations"));

    Ok(Json(resp))
}

/// POST /api/v1/conversations - Create a conversation.
pub async fn create_conversation(
    State(state): State<AppState>,
    Json(body): Json<NewConversation>,
) -> Result<Json<ApiResponse<Conversation>>, ApiError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let conversation = state.chat_service.create_conversation(body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(conversation.clone(), request_id, elapsed)
        .with_link("self", &format!("/api/v1/conversations/{}", conversation.id))
        .with_link(
            "messages",
            &format!("/api/v1/conversations/{}/messages", conversation.id),
        );

    Ok(Json(resp))
}

/// PATCH /api/v1/conversations/{id} - Update title and/or pinned flag.
///
/// `updated_at` refreshes on every call, even with an empty patch.
pub async fn update_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<ConversationId>,
    Json(patch): Json<ConversationPatch>,
) -> Result<Json<ApiResponse<Conversation>>, ApiError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let conversation = state
        .chat_service
        .update_conversation(conversation_id, patch)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(conversation, request_id, elapsed)
        .with_link("self", &format!("/api/v1/conversations/{conversation_id}"));

    Ok(Json(resp))
}

/// DELETE /api/v1/conversations/{id} - Delete a conversation and every
/// message inside it.
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<ConversationId>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    state
        .chat_service
        .delete_conversation(conversation_id)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({"deleted": true}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}
