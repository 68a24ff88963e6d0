//! MCP server implementation for fusion-mcp
//!
//! This module provides the core MCP server that exposes VMware Fusion
//! virtual machines to LLMs via MCP tool calls, and the stdio runtime that
//! serves it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use fusion_client::{FusionClient, PowerAction};
use rust_mcp_sdk::mcp_server::{McpServerOptions, ServerHandler, ToMcpServerHandler, server_runtime};
use rust_mcp_sdk::schema::{
    CallToolRequestParams, CallToolResult, Implementation, InitializeResult, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, RpcError, ServerCapabilities, ServerCapabilitiesTools,
    TextContent, Tool, ToolInputSchema, schema_utils::CallToolError,
};
use rust_mcp_sdk::{McpServer, StdioTransport, TransportOptions};
use serde_json::{Map, Value, json};

use crate::handlers::{self, GET_VM_INFO, HandlerError, LIST_VMS, POWER_VM, ToolOutput};

/// Server name reported during initialization
pub const SERVER_NAME: &str = "vmware-fusion-mcp";

const INSTRUCTIONS: &str = "Manage VMware Fusion virtual machines. Use list_vms to discover VM \
                            IDs, get_vm_info for details, and power_vm to change power state.";

/// Convert a JSON object into the properties format expected by ToolInputSchema.
///
/// ToolInputSchema expects `HashMap<String, Map<String, Value>>` for properties,
/// where each key maps to a JSON object describing that property's schema.
fn make_properties(json_obj: Value) -> HashMap<String, Map<String, Value>> {
    let mut properties = HashMap::new();
    if let Value::Object(obj) = json_obj {
        for (key, value) in obj {
            if let Value::Object(inner) = value {
                properties.insert(key, inner);
            }
        }
    }
    properties
}

/// The VMware Fusion MCP server handler
///
/// Holds one shared REST client for the lifetime of the session.
pub struct FusionServer {
    client: FusionClient,
}

impl FusionServer {
    /// Create a new server backed by the given client
    #[must_use]
    pub fn new(client: FusionClient) -> Self {
        Self { client }
    }

    /// The REST client used by tool calls
    #[must_use]
    pub fn client(&self) -> &FusionClient {
        &self.client
    }

    /// Build the list of available tools
    #[must_use]
    pub fn build_tools() -> Vec<Tool> {
        vec![Self::list_vms_tool(), Self::get_vm_info_tool(), Self::power_vm_tool()]
    }

    fn list_vms_tool() -> Tool {
        Tool {
            name: LIST_VMS.into(),
            description: Some("List all VMs in VMware Fusion".into()),
            input_schema: ToolInputSchema::new(vec![], Some(HashMap::new()), None),
            annotations: None,
            execution: None,
            icons: vec![],
            meta: None,
            output_schema: None,
            title: Some("List VMs".into()),
        }
    }

    fn get_vm_info_tool() -> Tool {
        Tool {
            name: GET_VM_INFO.into(),
            description: Some("Get detailed information about a specific VM".into()),
            input_schema: ToolInputSchema::new(
                vec!["vm_id".into()],
                Some(make_properties(json!({
                    "vm_id": {
                        "type": "string",
                        "description": "VM ID to get info about"
                    }
                }))),
                None,
            ),
            annotations: None,
            execution: None,
            icons: vec![],
            meta: None,
            output_schema: None,
            title: Some("VM Information".into()),
        }
    }

    fn power_vm_tool() -> Tool {
        let actions: Vec<&str> = PowerAction::ALL.iter().map(|a| a.as_str()).collect();
        Tool {
            name: POWER_VM.into(),
            description: Some("Perform a power action on a VM".into()),
            input_schema: ToolInputSchema::new(
                vec!["vm_id".into(), "action".into()],
                Some(make_properties(json!({
                    "vm_id": {
                        "type": "string",
                        "description": "The ID of the VM to control"
                    },
                    "action": {
                        "type": "string",
                        "enum": actions,
                        "description": "Power action to perform"
                    }
                }))),
                None,
            ),
            annotations: None,
            execution: None,
            icons: vec![],
            meta: None,
            output_schema: None,
            title: Some("Power VM".into()),
        }
    }

    /// Run a tool and convert the outcome into an MCP tool result
    ///
    /// Failures, including unknown tool names, become error results with
    /// the text `Error: <message>` rather than protocol errors.
    pub async fn call_tool(&self, name: &str, args: Option<Map<String, Value>>) -> CallToolResult {
        match handlers::dispatch(&self.client, name, args).await {
            Ok(output) => success_result(output),
            Err(err) => {
                tracing::warn!(tool = %name, error = %err, "Tool call failed");
                error_result(&err)
            }
        }
    }
}

fn success_result(output: ToolOutput) -> CallToolResult {
    let mut result = CallToolResult::text_content(vec![TextContent::new(output.text, None, None)]);
    result.structured_content = Some(output.structured);
    result
}

fn error_result(err: &HandlerError) -> CallToolResult {
    let mut result =
        CallToolResult::text_content(vec![TextContent::new(format!("Error: {err}"), None, None)]);
    result.is_error = Some(true);
    result
}

/// ServerHandler implementation for the MCP protocol
#[async_trait]
impl ServerHandler for FusionServer {
    /// Handle requests to list available tools
    async fn handle_list_tools_request(
        &self,
        _params: Option<PaginatedRequestParams>,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<ListToolsResult, RpcError> {
        Ok(ListToolsResult {
            tools: Self::build_tools(),
            meta: None,
            next_cursor: None,
        })
    }

    /// Handle requests to call a specific tool
    async fn handle_call_tool_request(
        &self,
        params: CallToolRequestParams,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<CallToolResult, CallToolError> {
        tracing::debug!(tool = %params.name, "Calling tool");
        Ok(self.call_tool(&params.name, params.arguments).await)
    }
}

/// Initialization details advertised to MCP clients
#[must_use]
pub fn server_details() -> InitializeResult {
    InitializeResult {
        server_info: Implementation {
            name: SERVER_NAME.into(),
            version: env!("CARGO_PKG_VERSION").into(),
            title: Some("VMware Fusion MCP Server".into()),
            description: Some(env!("CARGO_PKG_DESCRIPTION").into()),
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            ..Default::default()
        },
        protocol_version: ProtocolVersion::V2025_11_25.into(),
        instructions: Some(INSTRUCTIONS.into()),
        meta: None,
    }
}

/// Serve MCP over stdin/stdout until the client disconnects
///
/// # Errors
///
/// Returns an error if the transport cannot be created or the session
/// ends abnormally.
pub async fn run_stdio(server: FusionServer) -> anyhow::Result<()> {
    let transport = StdioTransport::new(TransportOptions::default())
        .map_err(|e| anyhow::anyhow!("Failed to open stdio transport: {e}"))?;

    let runtime = server_runtime::create_server(McpServerOptions {
        server_details: server_details(),
        transport,
        handler: server.to_mcp_server_handler(),
        task_store: None,
        client_task_store: None,
    });

    tracing::info!(name = SERVER_NAME, "MCP server listening on stdio");
    runtime
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("MCP server stopped: {e}"))
}
