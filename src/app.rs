use std::net::SocketAddr;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::{alerts, consumption, inventory};

const FEATURES: [&str; 3] = ["expiration-risk-prediction", "consumption-logging", "alerts"];

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub features: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub features: Vec<&'static str>,
    pub health_url: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "API is running",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        features: FEATURES.to_vec(),
    })
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("Welcome to {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        features: vec![
            "Expiration Risk Prediction",
            "Consumption Logging",
            "Real-time Risk Recalculation",
            "Smart Prioritization (FIFO + risk)",
            "Expiration Alerts",
        ],
        health_url: "/health",
    })
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(consumption::router())
        .merge(inventory::router())
        .merge(alerts::router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
