use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use videogen_server::{
    app, generation::HttpVideoProvider, AppConfig, AppState, GenerationGateway, VideoRegistry,
};

#[tokio::main]
async fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    videogen_server::telemetry::init_telemetry("videogen-server")
        .expect("Failed to initialize telemetry");

    let config = AppConfig::from_env().expect("Invalid configuration");

    let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    let shutdown = CancellationToken::new();
    let provider = Arc::new(HttpVideoProvider::new(&config.provider));
    let gateway = GenerationGateway::new(provider)
        .with_timeout(config.generation_timeout)
        .with_shutdown(shutdown.clone());
    let registry = VideoRegistry::new(config.registry_capacity);

    let app = app(
        AppState::new(gateway, registry),
        config.cors_allowed_origin.clone(),
        metric_handle,
    )
    .layer(prometheus_layer);

    tracing::info!(
        provider = %config.provider.endpoint,
        model = %config.provider.model,
        timeout_secs = config.generation_timeout.as_secs(),
        "listening on {}",
        config.bind_addr
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .expect("Server error");
}

async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, cancelling in-flight generations");
    token.cancel();
}
