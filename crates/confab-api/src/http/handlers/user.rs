//! User HTTP handlers.
//!
//! Endpoints:
//! - GET   /api/v1/users/{id} - Get a user
//! - PATCH /api/v1/users/{id} - Apply a partial update

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use confab_types::id::UserId;
use confab_types::user::{User, UserPatch};

use crate::http::error::ApiError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/users/{id} - Get a user by id.
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let user = state.chat_service.get_user(user_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(user, request_id, elapsed)
        .with_link("self", &format!("/api/v1/users/{user_id}"))
        .with_link(
            "conversations",
            &format!("/api/v1/users/{user_id}/conversations"),
        )
        .with_link("usage", &format!("/api/v1/users/{user_id}/usage"));

    Ok(Json(resp))
}

/// PATCH /api/v1/users/{id} - Apply a partial update to a user.
///
/// Unknown fields (including `username`) fail deserialization before the
/// handler runs.
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let user = state.chat_service.update_user(user_id, patch).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(user, request_id, elapsed)
        .with_link("self", &format!("/api/v1/users/{user_id}"));

    Ok(Json(resp))
}
