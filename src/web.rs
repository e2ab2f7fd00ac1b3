use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::StatusCode;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};

use crate::api;
use crate::config::{CredentialSource, GatewayConfig};
use crate::provider::OpenWeatherClient;
use crate::service::WeatherService;

/// Full application router with CORS, request timeout and access logging
pub fn app(service: Arc<WeatherService>, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    api::router(service)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(cors)
        .layer(trace)
}

/// Two sequential upstream calls plus slack
fn request_timeout(config: &GatewayConfig) -> Duration {
    Duration::from_secs(config.provider.timeout_seconds * 2 + 5)
}

pub async fn run(config: GatewayConfig) -> Result<()> {
    let client = OpenWeatherClient::new(&config.provider)?;
    let credentials = CredentialSource::from_config(&config.provider);
    let service = WeatherService::new(Arc::new(client), credentials)
        .with_scaffold_fallback(config.provider.scaffold_fallback);

    if !service.has_credentials() {
        warn!("OpenWeatherMap API key is not set, weather endpoints will answer with scaffold data");
    }

    let app = app(Arc::new(service), request_timeout(&config));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[test]
    fn test_request_timeout_covers_two_upstream_calls() {
        let config = GatewayConfig {
            provider: ProviderConfig {
                timeout_seconds: 10,
                ..ProviderConfig::default()
            },
            ..GatewayConfig::default()
        };
        assert_eq!(request_timeout(&config), Duration::from_secs(25));
    }
}
