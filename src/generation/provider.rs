use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::error::ProviderError;

/// JSON pointers tried in order when looking for the generated video URL.
///
/// Only the chat-completion shape is documented by the provider; the other
/// two are kept for proxies that unwrap the message content.
pub const VIDEO_URL_POINTERS: [&str; 3] = ["/choices/0/message/content", "/content", "/url"];

/// The external service that turns an instruction into a video URL.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Performs exactly one generation call. Deadlines are enforced by the caller.
    async fn generate(&self, instruction: String) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    pub fn user(model: &str, content: String) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
        }
    }
}

/// First non-empty string found at [`VIDEO_URL_POINTERS`].
pub fn extract_video_url(body: &Value) -> Option<String> {
    VIDEO_URL_POINTERS
        .iter()
        .filter_map(|pointer| body.pointer(pointer))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

/// Chat-completion style provider reached over HTTPS.
pub struct HttpVideoProvider {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    customer_id: Option<String>,
}

impl HttpVideoProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            customer_id: config.customer_id.clone(),
        }
    }
}

#[async_trait]
impl VideoProvider for HttpVideoProvider {
    async fn generate(&self, instruction: String) -> Result<String, ProviderError> {
        let body = ChatCompletionRequest::user(&self.model, instruction);

        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);
        if let Some(customer_id) = &self.customer_id {
            request = request.header("CustomerId", customer_id);
        }

        let res = request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %text, "provider returned an error status");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let json: Value = res
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        extract_video_url(&json).ok_or(ProviderError::MissingUrl)
    }
}
