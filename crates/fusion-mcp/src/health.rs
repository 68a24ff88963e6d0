//! HTTP health endpoint
//!
//! A small listener for container health probes. `/health` reports process
//! liveness only; `/ready` additionally checks that the Fusion REST API
//! answers a VM listing. The listener outlives the MCP session and stops on
//! SIGTERM or ctrl-c.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, SecondsFormat, Utc};
use fusion_client::FusionClient;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::server::SERVER_NAME;

/// Health listener errors
#[derive(Debug, Error)]
pub enum HealthError {
    /// Could not bind the listen address
    #[error("Failed to bind health endpoint on {addr}: {source}")]
    Bind {
        /// Requested address
        addr: SocketAddr,
        /// Underlying IO error
        source: std::io::Error,
    },
}

/// Body of a `/health` response
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Always `healthy` while the process serves requests
    pub status: &'static str,
    /// Service name
    pub service: &'static str,
    /// Crate version
    pub version: &'static str,
    /// When the process started, RFC 3339
    pub started_at: String,
}

#[derive(Clone)]
struct HealthState {
    client: FusionClient,
    started_at: DateTime<Utc>,
}

/// Build the health router
pub fn router(client: FusionClient, started_at: DateTime<Utc>) -> Router {
    let state = Arc::new(HealthState { client, started_at });
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .with_state(state)
}

async fn health(State(state): State<Arc<HealthState>>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "healthy",
        service: SERVER_NAME,
        version: env!("CARGO_PKG_VERSION"),
        started_at: state.started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

async fn ready(State(state): State<Arc<HealthState>>) -> Response {
    match state.client.list_vms().await {
        Ok(vms) => Json(json!({"status": "ready", "vm_count": vms.len()})).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            // 503 while Fusion is down or failing, 500 for any other failure
            let (status, label) = if e.is_unavailable() {
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
            } else {
                (StatusCode::INTERNAL_SERVER_ERROR, "error")
            };
            (status, Json(json!({"status": label, "error": e.to_string()}))).into_response()
        }
    }
}

/// Bind `addr` and serve the health router in a background task
///
/// Returns the bound address (useful when `addr` has port 0) and the task
/// handle; abort the handle to stop serving.
///
/// # Errors
///
/// Returns [`HealthError::Bind`] if the address cannot be bound.
pub async fn spawn(
    addr: SocketAddr,
    client: FusionClient,
) -> Result<(SocketAddr, JoinHandle<()>), HealthError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| HealthError::Bind { addr, source })?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| HealthError::Bind { addr, source })?;

    let app = router(client, Utc::now());
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Health endpoint stopped");
        }
    });

    tracing::info!(addr = %local_addr, "Health endpoint listening");
    Ok((local_addr, handle))
}
