//! HTTP surface of the process: liveness endpoint and the MCP transport.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::info;

use crate::aap::AapClient;
use crate::config::AapConfig;
use crate::mcp::{create_registry, mcp_handler, McpRegistry};

/// State shared across requests. Everything in here is immutable after
/// startup; concurrency safety comes for free.
#[derive(Clone)]
pub struct ServerState {
    pub client: Arc<AapClient>,
    pub config: AapConfig,
    pub registry: Arc<McpRegistry>,
    pub version: String,
    pub start_time: Instant,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: String,
    uptime: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Process liveness only; does not touch the remote controller.
/// Use the `test_aap_connection` tool for remote connectivity diagnostics.
async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: state.version.clone(),
        uptime: format_uptime(state.start_time.elapsed()),
    })
}

/// Build the application router. Split from [`run_server`] so e2e tests can
/// serve it on an ephemeral port.
pub fn make_app(client: Arc<AapClient>, config: AapConfig) -> Router {
    let state = ServerState {
        client,
        config,
        registry: Arc::new(create_registry()),
        version: crate::version(),
        start_time: Instant::now(),
    };

    Router::new()
        .route("/health", get(health))
        .route("/v1/mcp", get(mcp_handler))
        .with_state(state)
}

/// Serve until terminated.
pub async fn run_server(client: Arc<AapClient>, config: AapConfig, port: u16) -> Result<()> {
    let app = make_app(client, config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Listening on port {}", port);

    Ok(axum::serve(listener, app).await?)
}
