use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::provider::VideoProvider;
use super::{new_video_id, prompt, GenerationParams, GenerationRequest, GenerationResult};
use crate::config::DEFAULT_GENERATION_TIMEOUT;
use crate::error::{ProviderError, ValidationError};
use crate::metrics;

/// Aborts the spawned provider call if the gateway future goes away first.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Validates requests and performs the single, deadline-bounded provider call.
pub struct GenerationGateway {
    provider: Arc<dyn VideoProvider>,
    timeout: Duration,
    shutdown: CancellationToken,
}

impl GenerationGateway {
    pub fn new(provider: Arc<dyn VideoProvider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_GENERATION_TIMEOUT,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// In-flight calls end as `Cancelled` failures once `token` is cancelled.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn system_prompt(&self) -> &'static str {
        prompt::system_prompt()
    }

    /// Rejects invalid requests without calling the provider; otherwise
    /// always yields a result record, completed or failed.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ValidationError> {
        let params = request.validate()?;
        Ok(self.run(params).await)
    }

    pub async fn run(&self, params: GenerationParams) -> GenerationResult {
        let id = new_video_id();
        let created_at = Utc::now();
        let started = Instant::now();
        let instruction = prompt::enhance(&params);

        info!(
            video_id = %id,
            duration = params.duration,
            aspect_ratio = %params.aspect_ratio,
            quality = %params.quality,
            "starting video generation"
        );

        let provider = Arc::clone(&self.provider);
        let mut call = tokio::spawn(async move { provider.generate(instruction).await });
        let _guard = AbortOnDrop(call.abort_handle());

        let outcome = tokio::select! {
            joined = &mut call => match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(video_id = %id, error = %e, "provider task did not complete");
                    Err(ProviderError::Unknown)
                }
            },
            _ = tokio::time::sleep(self.timeout) => Err(ProviderError::Timeout),
            _ = self.shutdown.cancelled() => Err(ProviderError::Cancelled),
        };

        let result = match outcome {
            Ok(video_url) => {
                info!(video_id = %id, "video generation completed");
                GenerationResult::completed(id, params, created_at, video_url)
            }
            Err(e) => {
                warn!(video_id = %id, error = %e, "video generation failed");
                GenerationResult::failed(id, params, created_at, &e)
            }
        };

        metrics::record_generation(result.status, started.elapsed());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationStatus;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    enum Behavior {
        Respond(Result<String, ProviderError>),
        Hang,
        Panic,
    }

    struct MockProvider {
        behavior: Behavior,
        calls: AtomicU32,
        last_instruction: Mutex<Option<String>>,
    }

    impl MockProvider {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicU32::new(0),
                last_instruction: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl VideoProvider for MockProvider {
        async fn generate(&self, instruction: String) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_instruction.lock().unwrap() = Some(instruction);
            match &self.behavior {
                Behavior::Respond(outcome) => outcome.clone(),
                Behavior::Hang => std::future::pending().await,
                Behavior::Panic => panic!("provider exploded"),
            }
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("A calm lake at sunset with mountains in the background")
    }

    #[tokio::test]
    async fn completed_generation_echoes_parameters() {
        let provider = MockProvider::new(Behavior::Respond(Ok("https://cdn.example/v.mp4".into())));
        let gateway = GenerationGateway::new(provider.clone());

        let result = gateway.generate(&request()).await.unwrap();

        assert_eq!(result.status, GenerationStatus::Completed);
        assert_eq!(result.video_url.as_deref(), Some("https://cdn.example/v.mp4"));
        assert!(result.error.is_none());
        assert!(result.completed_at.is_some());
        assert_eq!(result.duration, 5);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        let instruction = provider.last_instruction.lock().unwrap().clone().unwrap();
        assert!(instruction.contains("A calm lake at sunset"));
        assert!(instruction.contains("Aspect ratio: 16:9"));
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_provider() {
        let provider = MockProvider::new(Behavior::Respond(Ok("https://cdn.example/v.mp4".into())));
        let gateway = GenerationGateway::new(provider.clone());

        let bad = request().with_duration(31);

        assert_eq!(
            gateway.generate(&bad).await,
            Err(ValidationError::DurationOutOfRange)
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_error_becomes_failed_result() {
        let provider = MockProvider::new(Behavior::Respond(Err(ProviderError::MissingUrl)));
        let gateway = GenerationGateway::new(provider);

        let result = gateway.generate(&request()).await.unwrap();

        assert_eq!(result.status, GenerationStatus::Failed);
        assert!(result.video_url.is_none());
        assert!(result.completed_at.is_none());
        assert_eq!(
            result.error.as_deref(),
            Some("No video URL returned from the generation service")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_produces_timeout_failure() {
        let provider = MockProvider::new(Behavior::Hang);
        let gateway = GenerationGateway::new(provider);

        let result = gateway.generate(&request()).await.unwrap();

        assert_eq!(result.status, GenerationStatus::Failed);
        assert!(result.error.unwrap().contains("timeout"));
    }

    #[tokio::test]
    async fn panicking_provider_yields_unknown_error() {
        let provider = MockProvider::new(Behavior::Panic);
        let gateway = GenerationGateway::new(provider);

        let result = gateway.generate(&request()).await.unwrap();

        assert_eq!(
            result.error.as_deref(),
            Some("Unknown error occurred during video generation")
        );
    }

    #[tokio::test]
    async fn shutdown_cancels_in_flight_generation() {
        let token = CancellationToken::new();
        let gateway = GenerationGateway::new(MockProvider::new(Behavior::Hang))
            .with_timeout(Duration::from_secs(3600))
            .with_shutdown(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let result = gateway.generate(&request()).await.unwrap();
        canceller.await.unwrap();

        assert_eq!(result.error.as_deref(), Some("Video generation cancelled"));
    }
}
