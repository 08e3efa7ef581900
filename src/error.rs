use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Reasons a generation request is rejected before any provider call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Prompt is required")]
    PromptRequired,

    #[error("Prompt cannot be empty")]
    PromptEmpty,

    #[error("Prompt must be at least 10 characters long")]
    PromptTooShort,

    #[error("Prompt must be less than 1000 characters")]
    PromptTooLong,

    #[error("Prompt contains inappropriate content")]
    PromptDisallowed,

    #[error("Duration must be between 1 and 30 seconds")]
    DurationOutOfRange,

    #[error("Invalid aspect ratio. Supported: 16:9, 9:16, 1:1, 4:3, 3:4")]
    InvalidAspectRatio,

    #[error("Invalid quality. Supported: standard, high, premium")]
    InvalidQuality,
}

impl ValidationError {
    /// Short label used for metrics and span fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::PromptRequired => "prompt_required",
            ValidationError::PromptEmpty => "prompt_empty",
            ValidationError::PromptTooShort => "prompt_too_short",
            ValidationError::PromptTooLong => "prompt_too_long",
            ValidationError::PromptDisallowed => "prompt_disallowed",
            ValidationError::DurationOutOfRange => "duration_out_of_range",
            ValidationError::InvalidAspectRatio => "invalid_aspect_ratio",
            ValidationError::InvalidQuality => "invalid_quality",
        }
    }
}

/// Failures of an attempted provider call. These end up in a failed
/// `GenerationResult`, never in an HTTP error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Video generation failed with status {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(String),

    #[error("No video URL returned from the generation service")]
    MissingUrl,

    #[error("Video generation timeout - please try with a shorter duration or simpler prompt")]
    Timeout,

    #[error("Video generation cancelled")]
    Cancelled,

    #[error("Unknown error occurred during video generation")]
    Unknown,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Video not found")]
    NotFound,
}

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{error}: {details}")]
    Internal { error: String, details: String },
}

impl ApiError {
    pub fn internal(error: impl Into<String>, details: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            error: error.into(),
            details: details.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::Span::current().record("error", tracing::field::display(&self));

        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Validation(e) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
            }
            ApiError::Registry(e @ RegistryError::NotFound) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": e.to_string() }))).into_response()
            }
            ApiError::Internal { error, details } => {
                tracing::error!(details = %details, "{}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": error, "details": details })),
                )
                    .into_response()
            }
        }
    }
}
