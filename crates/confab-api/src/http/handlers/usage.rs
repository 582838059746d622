//! Token-usage ledger HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/v1/users/{id}/usage - Query usage (inclusive day range)
//! - POST /api/v1/users/{id}/usage - Record usage for today

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use confab_types::id::UserId;
use confab_types::usage::{NewUsageRecord, UsageRange, UsageRecord};

use crate::http::error::ApiError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for recording usage; the user id comes from the path.
/// A negative token count fails deserialization.
#[derive(Debug, Deserialize)]
pub struct RecordUsageBody {
    pub tokens_used: u32,
}

/// GET /api/v1/users/{id}/usage?start_date=..&end_date=.. - Query usage
/// records, both bounds inclusive, ascending by day.
pub async fn query_usage(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(range): Query<UsageRange>,
) -> Result<Json<ApiResponse<Vec<UsageRecord>>>, ApiError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let records = state
        .chat_service
        .query_usage(user_id, range.start_date, range.end_date)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(records, request_id, elapsed)
        .with_link("self", &format!("/api/v1/users/{user_id}/usage"));

    Ok(Json(resp))
}

/// POST /api/v1/users/{id}/usage - Record token usage, stamped with the
/// current day.
pub async fn record_usage(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(body): Json<RecordUsageBody>,
) -> Result<Json<ApiResponse<UsageRecord>>, ApiError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let record = state
        .chat_service
        .record_usage(NewUsageRecord {
            user_id,
            tokens_used: body.tokens_used,
        })
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(record, request_id, elapsed)
        .with_link("usage", &format!("/api/v1/users/{user_id}/usage"));

    Ok(Json(resp))
}
