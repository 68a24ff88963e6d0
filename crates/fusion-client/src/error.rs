// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for fusion-client

use thiserror::Error;

use crate::vm::PowerAction;

/// Errors that can occur while talking to the Fusion REST API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (refused, DNS, timeout)
    #[error("Failed to connect to VMware Fusion API: {0}")]
    Connection(#[source] reqwest::Error),

    /// The API answered with a non-success status
    #[error("VMware Fusion API error: {status} - {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response text
        body: String,
    },

    /// The API reported that the VM does not exist
    #[error("VM with ID '{vm_id}' not found")]
    VmNotFound {
        /// The VM id that was requested
        vm_id: String,
    },

    /// The VM id cannot be used as a single URL path segment
    #[error("Invalid VM ID '{vm_id}'")]
    InvalidVmId {
        /// The rejected id
        vm_id: String,
    },

    /// Power action string is not one of the supported actions
    #[error("Invalid action '{action}'. Valid actions: {}", PowerAction::valid_list())]
    InvalidAction {
        /// The rejected action string
        action: String,
    },

    /// A success response carried a body that could not be decoded
    #[error("Invalid response from VMware Fusion API: {0}")]
    InvalidResponse(String),

    /// The configured base URL is unusable
    #[error("Invalid VMware Fusion API base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The URL as configured
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The underlying HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    /// Whether the error came from an unreachable API rather than a bad request
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
