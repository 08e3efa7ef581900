use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::field::display;
use tracing::info;

use super::AppState;
use crate::error::ApiError;
use crate::registry::VideoRecord;

pub const DEFAULT_LIMIT: usize = 20;

/// Query values are read loosely: a repeated key keeps its last value, and
/// anything that is not a non-negative integer falls back to the default.
fn paging(query: &HashMap<String, String>) -> (usize, usize) {
    let parse_or = |key: &str, default: usize| {
        query
            .get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    };
    (parse_or("limit", DEFAULT_LIMIT), parse_or("offset", 0))
}

#[derive(Debug, Serialize)]
pub struct VideoListResponse {
    pub success: bool,
    pub videos: Vec<VideoRecord>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

// GET /videos?limit&offset
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<VideoListResponse> {
    tracing::Span::current().record("action", "list_videos");

    let (limit, offset) = paging(&query);
    let page = state.registry.list(limit, offset);

    Json(VideoListResponse {
        success: true,
        videos: page.videos,
        total: page.total,
        limit,
        offset,
    })
}

// POST /videos - Store a generation result
pub async fn save_video(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let span = tracing::Span::current();
    span.record("action", "save_video");

    let record: VideoRecord =
        serde_json::from_slice(&body).map_err(|e| ApiError::internal("Failed to save video", e))?;
    let stored = state.registry.append(record);

    info!(video_id = %stored.id, "Saved video to registry");
    span.record("video_id", display(&stored.id))
        .record("business_event", "Video saved");

    Ok(Json(MessageResponse {
        success: true,
        message: "Video saved successfully",
    }))
}

// DELETE /videos?id=<id>
pub async fn delete_video(
    State(state): State<AppState>,
    Query(mut query): Query<HashMap<String, String>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let span = tracing::Span::current();
    span.record("action", "delete_video");

    let id = query
        .remove("id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Video ID is required".to_string()))?;
    span.record("video_id", display(&id));

    state.registry.remove(&id)?;

    info!(video_id = %id, "Deleted video from registry");
    span.record("business_event", "Video deleted");

    Ok(Json(MessageResponse {
        success: true,
        message: "Video deleted successfully",
    }))
}
