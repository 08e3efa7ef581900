pub mod generate;
pub mod videos;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath},
    http::{header, HeaderValue, Method, Request, Response},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::generation::GenerationGateway;
use crate::registry::VideoRegistry;

pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GenerationGateway>,
    pub registry: Arc<VideoRegistry>,
}

impl AppState {
    pub fn new(gateway: GenerationGateway, registry: VideoRegistry) -> Self {
        Self {
            gateway: Arc::new(gateway),
            registry: Arc::new(registry),
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}

/// Application routes. `/api/generate-video` and `/api/videos` are aliases
/// kept for the web client.
pub fn router(state: AppState) -> Router {
    let generate = post(generate::generate_video).get(generate::describe_endpoint);
    let videos = get(videos::list_videos)
        .post(videos::save_video)
        .delete(videos::delete_video);

    Router::new()
        .route("/health", get(health_check))
        .route("/generate", generate.clone())
        .route("/api/generate-video", generate)
        .route("/videos", videos.clone())
        .route("/api/videos", videos)
        .with_state(state)
}

/// The served application: routes plus request tracing, CORS for the web
/// client, the Prometheus scrape endpoint and a 1 MiB body limit.
pub fn app(state: AppState, cors_origin: HeaderValue, metric_handle: PrometheusHandle) -> Router {
    router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(|matched| matched.as_str());

                    // "METHOD /path", e.g. "POST /generate"
                    let span_name = match matched_path {
                        Some(path) => format!("{} {}", request.method(), path),
                        None => format!("{} {}", request.method(), request.uri().path()),
                    };

                    let client_ip = request
                        .headers()
                        .get("x-forwarded-for")
                        .and_then(|v| v.to_str().ok())
                        .or_else(|| {
                            request
                                .headers()
                                .get("x-real-ip")
                                .and_then(|v| v.to_str().ok())
                        })
                        .unwrap_or("unknown");

                    // Handlers fill in the empty fields.
                    tracing::info_span!(
                        "request",
                        "otel.name" = span_name,
                        client_ip = client_ip,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        action = tracing::field::Empty,
                        video_id = tracing::field::Empty,
                        business_event = tracing::field::Empty,
                        error = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_request(|_request: &Request<Body>, _span: &tracing::Span| {})
                .on_response(|response: &Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                    span.record("status", tracing::field::display(response.status()));
                    span.record("latency", tracing::field::debug(latency));
                    tracing::info!("request completed");
                }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(cors_origin)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
