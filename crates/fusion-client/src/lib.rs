// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! fusion-client: VMware Fusion REST API access for fusion-mcp
//!
//! This library crate wraps the local REST service that VMware Fusion
//! exposes (`vmrest`, `http://localhost:8697` by default) with a small typed
//! async client.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use fusion_client::{ClientConfig, FusionClient, PowerAction};
//!
//! # async fn run() -> Result<(), fusion_client::ClientError> {
//! let client = FusionClient::new(ClientConfig::default())?;
//! for vm in client.list_vms().await? {
//!     println!("{} -> {}", vm.id_or_unknown(), vm.path_or_unknown());
//! }
//! client.power_vm("vm1", PowerAction::On).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod vm;

pub use client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, FusionClient};
pub use error::ClientError;
pub use vm::{PowerAction, PowerOutcome, VmDetails, VmSummary};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::client::{ClientConfig, FusionClient};
    pub use crate::error::ClientError;
    pub use crate::vm::{PowerAction, PowerOutcome, VmDetails, VmSummary};
}
