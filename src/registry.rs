use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::config::DEFAULT_REGISTRY_CAPACITY;
use crate::error::RegistryError;
use crate::generation::{new_video_id, AspectRatio, GenerationResult, GenerationStatus, Quality};
use crate::metrics;

/// A stored gallery entry. Shaped like a `GenerationResult`, but every field
/// is optional so clients can post partial records; unknown fields are kept
/// and returned as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GenerationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `"id": null` means the caller did not pick an id.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<GenerationResult> for VideoRecord {
    fn from(result: GenerationResult) -> Self {
        Self {
            id: result.id,
            status: Some(result.status),
            video_url: result.video_url,
            thumbnail_url: None,
            prompt: Some(result.prompt),
            duration: Some(result.duration),
            aspect_ratio: Some(result.aspect_ratio),
            quality: Some(result.quality),
            created_at: Some(result.created_at),
            completed_at: result.completed_at,
            error: result.error,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoPage {
    pub videos: Vec<VideoRecord>,
    pub total: usize,
}

/// Bounded, newest-first collection of past generations.
///
/// All operations take the same lock, so concurrent appends and removals
/// never interleave with each other or with a listing.
pub struct VideoRegistry {
    capacity: usize,
    videos: Mutex<VecDeque<VideoRecord>>,
}

impl Default for VideoRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_CAPACITY)
    }
}

impl VideoRegistry {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            videos: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<VideoRecord>> {
        // A panic while holding the lock cannot leave the deque half-updated.
        self.videos.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `limit` records starting at `offset`, plus the total stored.
    pub fn list(&self, limit: usize, offset: usize) -> VideoPage {
        let videos = self.lock();
        VideoPage {
            videos: videos.iter().skip(offset).take(limit).cloned().collect(),
            total: videos.len(),
        }
    }

    /// Stores `record` as the newest entry and returns the stored copy.
    /// Missing ids and creation times are filled in; entries beyond the
    /// capacity are dropped from the oldest end.
    pub fn append(&self, mut record: VideoRecord) -> VideoRecord {
        if record.id.is_empty() {
            record.id = new_video_id();
        }
        if record.created_at.is_none() {
            record.created_at = Some(Utc::now());
        }

        let mut videos = self.lock();
        videos.push_front(record.clone());

        let overflow = videos.len().saturating_sub(self.capacity);
        if overflow > 0 {
            videos.truncate(self.capacity);
            metrics::record_evictions(overflow);
            tracing::debug!(evicted = overflow, "registry at capacity, dropped oldest videos");
        }
        metrics::set_registry_size(videos.len());

        record
    }

    /// Removes the first record with `id`.
    pub fn remove(&self, id: &str) -> Result<VideoRecord, RegistryError> {
        let mut videos = self.lock();
        let index = videos
            .iter()
            .position(|video| video.id == id)
            .ok_or(RegistryError::NotFound)?;
        let removed = videos.remove(index).ok_or(RegistryError::NotFound)?;
        metrics::set_registry_size(videos.len());
        Ok(removed)
    }
}
