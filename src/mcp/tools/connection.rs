//! Connection Tools
//!
//! Diagnostic probe against the configured AAP controller.

use serde::Serialize;
use serde_json::Value;

use crate::mcp::context::ToolContext;
use crate::mcp::protocol::{McpError, ToolsCallResult};
use crate::mcp::registry::{McpRegistry, RegisteredTool, ToolBuilder, ToolResult};

/// Register connection tools with the registry
pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(test_aap_connection_tool());
}

// ============================================================================
// test_aap_connection
// ============================================================================

#[derive(Debug, Serialize)]
struct ConnectionTestResult {
    ok: bool,
    detail: String,
    url: String,
    project_id: String,
    verify_ssl: bool,
}

fn test_aap_connection_tool() -> RegisteredTool {
    ToolBuilder::new("test_aap_connection")
        .description("Test the connection to Ansible Automation Platform")
        .input_schema(serde_json::json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }))
        .build(test_aap_connection_handler)
}

async fn test_aap_connection_handler(ctx: ToolContext, _params: Value) -> ToolResult {
    // Diagnostic only: expected failure states (unreachable, bad token)
    // come back as ok=false, never as a protocol error.
    let status = ctx.client.test_connection().await;

    let result = ConnectionTestResult {
        ok: status.ok,
        detail: status.detail,
        url: ctx.config.url.clone(),
        project_id: ctx.config.project_id.clone(),
        verify_ssl: ctx.config.verify_ssl,
    };

    ToolsCallResult::json(&result).map_err(|e| McpError::InternalError(e.to_string()))
}
