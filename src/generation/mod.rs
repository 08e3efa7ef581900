pub mod gateway;
pub mod prompt;
pub mod provider;
pub mod validation;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

pub use gateway::GenerationGateway;
pub use provider::{HttpVideoProvider, VideoProvider};
pub use validation::GenerationRequest;

pub const DEFAULT_DURATION_SECS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "3:4")]
    StandardPortrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::Square,
        AspectRatio::Standard,
        AspectRatio::StandardPortrait,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Standard => "4:3",
            AspectRatio::StandardPortrait => "3:4",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Standard,
    High,
    Premium,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Standard => "standard",
            Quality::High => "high",
            Quality::Premium => "premium",
        }
    }
}

impl FromStr for Quality {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Quality::Standard),
            "high" => Ok(Quality::High),
            "premium" => Ok(Quality::Premium),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle states a stored video can be in. The gateway only ever
/// produces `Completed` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Pending => "pending",
            GenerationStatus::Processing => "processing",
            GenerationStatus::Completed => "completed",
            GenerationStatus::Failed => "failed",
        }
    }
}

/// A validated request with all defaults resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParams {
    pub prompt: String,
    pub duration: u32,
    pub aspect_ratio: AspectRatio,
    pub quality: Quality,
}

/// Outcome of a single generation attempt.
///
/// Built only through [`GenerationResult::completed`] and
/// [`GenerationResult::failed`], so `video_url` is set exactly when the
/// status is `Completed` and `error` exactly when it is `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub id: String,
    pub status: GenerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub prompt: String,
    pub duration: u32,
    pub aspect_ratio: AspectRatio,
    pub quality: Quality,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn completed(
        id: String,
        params: GenerationParams,
        created_at: DateTime<Utc>,
        video_url: String,
    ) -> Self {
        Self {
            id,
            status: GenerationStatus::Completed,
            video_url: Some(video_url),
            prompt: params.prompt,
            duration: params.duration,
            aspect_ratio: params.aspect_ratio,
            quality: params.quality,
            created_at,
            completed_at: Some(Utc::now()),
            error: None,
        }
    }

    pub fn failed(
        id: String,
        params: GenerationParams,
        created_at: DateTime<Utc>,
        error: &ProviderError,
    ) -> Self {
        Self {
            id,
            status: GenerationStatus::Failed,
            video_url: None,
            prompt: params.prompt,
            duration: params.duration,
            aspect_ratio: params.aspect_ratio,
            quality: params.quality,
            created_at,
            completed_at: None,
            error: Some(error.to_string()),
        }
    }
}

/// `video_<unix millis>_<9 random chars>`.
pub fn new_video_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("video_{}_{}", Utc::now().timestamp_millis(), &suffix[..9])
}
