//! fusion-mcp: MCP server for VMware Fusion
//!
//! This binary serves MCP over stdio, translating tool calls into requests
//! against VMware Fusion's local REST API. With `--health-addr` it also runs
//! an HTTP health listener, which keeps serving after stdin closes until the
//! process receives SIGTERM or ctrl-c.

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use fusion_client::FusionClient;
use fusion_mcp::config::Config;
use fusion_mcp::health;
use fusion_mcp::server::{self, FusionServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr; stdout carries MCP frames
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    config.validate().context("Invalid configuration")?;

    info!(base_url = %config.base_url, "Starting fusion-mcp server...");

    let client = FusionClient::new(config.client_config())
        .context("Failed to create VMware Fusion client")?;

    let health_task = match config.health_addr {
        Some(addr) => {
            let (_, handle) = health::spawn(addr, client.clone()).await?;
            Some(handle)
        }
        None => None,
    };

    let result = server::run_stdio(FusionServer::new(client)).await;
    info!("MCP session ended");

    if let Some(mut handle) = health_task {
        if let Err(e) = &result {
            warn!(error = %e, "MCP transport failed");
        }
        info!("Health endpoint still serving, waiting for shutdown signal");
        tokio::select! {
            () = shutdown_signal() => info!("Shutdown signal received"),
            _ = &mut handle => warn!("Health endpoint exited"),
        }
        handle.abort();
    }
    info!("fusion-mcp server stopped");

    result
}

/// Resolves on ctrl-c, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
