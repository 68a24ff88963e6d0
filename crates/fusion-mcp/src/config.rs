//! Configuration for the fusion-mcp server
//!
//! This module provides configuration types and utilities for the MCP server,
//! including the Fusion REST API endpoint, credentials, the optional health
//! listener, and logging options.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use fusion_client::{ClientConfig, DEFAULT_BASE_URL};

/// VMware Fusion MCP Server - manage Fusion virtual machines over MCP
#[derive(Parser, Debug, Clone)]
#[command(name = "fusion-mcp")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Base URL of the VMware Fusion REST API (vmrest)
    #[arg(long, env = "VMWARE_FUSION_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Username for the Fusion REST API
    ///
    /// When empty, requests are sent without authentication.
    #[arg(long, env = "VMWARE_FUSION_USERNAME", default_value = "")]
    pub username: String,

    /// Password for the Fusion REST API
    #[arg(
        long,
        env = "VMWARE_FUSION_PASSWORD",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub password: String,

    /// Timeout in seconds for each Fusion REST API request
    #[arg(long, env = "VMWARE_FUSION_TIMEOUT", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Address for the HTTP health endpoint (e.g. 0.0.0.0:8000)
    ///
    /// The endpoint is disabled unless an address is given.
    #[arg(long, env = "FUSION_MCP_HEALTH_ADDR")]
    pub health_addr: Option<SocketAddr>,

    /// Enable verbose logging (debug level)
    ///
    /// When enabled, logs every Fusion API request and tool call. Logs are
    /// written to stderr to avoid interfering with MCP stdio transport.
    #[arg(short, long, visible_alias = "debug", default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 30,
            health_addr: None,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Request timeout as a [`Duration`]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the REST client settings
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::with_base_url(self.base_url.clone())
            .with_credentials(self.username.clone(), self.password.clone())
            .with_timeout(self.timeout())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The timeout is zero
    /// - The base URL is not an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        fusion_client::client::parse_base_url(&self.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Base URL rejected
    #[error("{0}")]
    InvalidBaseUrl(String),

    /// Timeout of zero seconds
    #[error("Timeout must be at least one second")]
    ZeroTimeout,
}
