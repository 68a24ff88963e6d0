//! Tool handlers for the MCP server
//!
//! This module implements the handlers for each MCP tool, bridging
//! MCP requests to Fusion REST API calls and returning formatted responses.

use fusion_client::{ClientError, FusionClient, PowerAction};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::format;

/// Tool name for listing VMs
pub const LIST_VMS: &str = "list_vms";
/// Tool name for VM details
pub const GET_VM_INFO: &str = "get_vm_info";
/// Tool name for power actions
pub const POWER_VM: &str = "power_vm";

// ============================================================================
// Error Types
// ============================================================================

/// Handler errors
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Fusion REST API failure, reported with the client's own message
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Invalid input - missing or malformed field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tool name not recognised
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// JSON serialization error
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Input Types
// ============================================================================

/// Input for the list_vms tool (takes no arguments)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListVmsInput {}

/// Input for the get_vm_info tool
#[derive(Debug, Clone, Deserialize)]
pub struct GetVmInfoInput {
    /// The ID of the VM to get information about
    pub vm_id: String,
}

/// Input for the power_vm tool
#[derive(Debug, Clone, Deserialize)]
pub struct PowerVmInput {
    /// The ID of the VM to control
    pub vm_id: String,
    /// Power action (on, off, suspend, pause, unpause, reset)
    pub action: String,
}

// ============================================================================
// Output Types
// ============================================================================

/// Result of a tool call: display text plus structured JSON
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    /// Human readable text
    pub text: String,
    /// Structured content object
    pub structured: Map<String, Value>,
}

// ============================================================================
// Handler Functions
// ============================================================================

/// Parse input from MCP arguments into a typed struct
pub fn parse_input<T: for<'de> Deserialize<'de>>(
    args: Option<Map<String, Value>>,
) -> Result<T, HandlerError> {
    let value = args
        .map(Value::Object)
        .unwrap_or(Value::Object(serde_json::Map::new()));
    serde_json::from_value(value).map_err(|e| HandlerError::InvalidInput(e.to_string()))
}

/// Reject ids that cannot name a VM in a URL path
fn validate_vm_id(vm_id: &str) -> Result<(), HandlerError> {
    let trimmed = vm_id.trim();
    if trimmed.is_empty() {
        return Err(HandlerError::InvalidInput(
            "vm_id cannot be empty. Use 'list_vms' to find VM IDs.".to_string(),
        ));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(HandlerError::InvalidInput(format!(
            "'{vm_id}' is not a valid VM ID"
        )));
    }
    Ok(())
}

/// Handle the list_vms tool
///
/// Structured content is `{"vms": [...]}`, an empty array when Fusion has
/// no VMs.
pub async fn handle_list_vms(
    client: &FusionClient,
    args: Option<Map<String, Value>>,
) -> Result<ToolOutput, HandlerError> {
    let _input: ListVmsInput = parse_input(args)?;

    let vms = client.list_vms().await?;
    let text = format::render_vm_list(&vms);

    let mut structured = Map::new();
    structured.insert("vms".to_string(), serde_json::to_value(&vms)?);

    Ok(ToolOutput { text, structured })
}

/// Handle the get_vm_info tool
///
/// Structured content is the VM object exactly as Fusion returned it.
pub async fn handle_get_vm_info(
    client: &FusionClient,
    args: Option<Map<String, Value>>,
) -> Result<ToolOutput, HandlerError> {
    let input: GetVmInfoInput = parse_input(args)?;
    validate_vm_id(&input.vm_id)?;

    let info = client.get_vm_info(&input.vm_id).await?;
    let text = format::render_vm_info(&input.vm_id, &info);

    Ok(ToolOutput {
        text,
        structured: info,
    })
}

/// Handle the power_vm tool
///
/// The action is checked before Fusion is contacted.
pub async fn handle_power_vm(
    client: &FusionClient,
    args: Option<Map<String, Value>>,
) -> Result<ToolOutput, HandlerError> {
    let input: PowerVmInput = parse_input(args)?;
    validate_vm_id(&input.vm_id)?;
    let action: PowerAction = input.action.parse()?;

    let outcome = client.power_vm(&input.vm_id, action).await?;
    let text = format::render_power_result(&input.vm_id, action, &outcome);

    Ok(ToolOutput {
        text,
        structured: outcome,
    })
}

/// Route a tool call by name
pub async fn dispatch(
    client: &FusionClient,
    name: &str,
    args: Option<Map<String, Value>>,
) -> Result<ToolOutput, HandlerError> {
    match name {
        LIST_VMS => handle_list_vms(client, args).await,
        GET_VM_INFO => handle_get_vm_info(client, args).await,
        POWER_VM => handle_power_vm(client, args).await,
        other => Err(HandlerError::UnknownTool(other.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
