use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::field::display;

use super::AppState;
use crate::error::ApiError;
use crate::generation::{GenerationRequest, GenerationResult, GenerationStatus};
use crate::metrics;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub video: GenerationResult,
}

// POST /generate - Validate and run a single generation. Provider failures
// come back as 200 with `status: failed`.
pub async fn generate_video(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    let span = tracing::Span::current();
    span.record("action", "generate_video");

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::internal("Internal server error during video generation", e))?;

    metrics::record_generation_request();

    let request = GenerationRequest::from_json(&payload);
    let video = state.gateway.generate(&request).await.map_err(|e| {
        metrics::record_rejection(e.kind());
        span.record("business_event", "Generation request rejected");
        ApiError::from(e)
    })?;

    span.record("video_id", display(&video.id));
    span.record(
        "business_event",
        match video.status {
            GenerationStatus::Completed => "Video generated",
            _ => "Video generation failed",
        },
    );

    Ok(Json(GenerateResponse {
        success: true,
        video,
    }))
}

// GET /generate - Static endpoint description
pub async fn describe_endpoint(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Video Generation API",
        "endpoint": "/generate",
        "methods": ["POST"],
        "systemPrompt": state.gateway.system_prompt(),
        "supportedParameters": {
            "prompt": "string (required, 10-1000 characters)",
            "duration": "number (optional, 1-30 seconds, default: 5)",
            "aspectRatio": "string (optional, 16:9|9:16|1:1|4:3|3:4, default: 16:9)",
            "quality": "string (optional, standard|high|premium, default: standard)"
        }
    }))
}
