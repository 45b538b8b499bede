//! Job Template Tools
//!
//! Tools for listing job templates from the configured AAP project.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aap::JobTemplate;
use crate::mcp::context::ToolContext;
use crate::mcp::protocol::{McpError, ToolsCallResult};
use crate::mcp::registry::{McpRegistry, RegisteredTool, ToolBuilder, ToolResult};

/// Register template tools with the registry
pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(get_job_templates_tool());
}

// ============================================================================
// get_job_templates
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetJobTemplatesParams {
    #[serde(default)]
    project_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct JobTemplatesResult {
    count: usize,
    templates: Vec<JobTemplate>,
}

fn get_job_templates_tool() -> RegisteredTool {
    ToolBuilder::new("get_job_templates")
        .description(
            "Get available job templates from the configured AAP project \
             with their descriptions and metadata",
        )
        .input_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "project_id": {
                    "type": "string",
                    "description": "Optional project ID overriding the configured default"
                }
            },
            "additionalProperties": false
        }))
        .build(get_job_templates_handler)
}

async fn get_job_templates_handler(ctx: ToolContext, params: Value) -> ToolResult {
    let params: GetJobTemplatesParams =
        serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let templates = match ctx.client.get_job_templates(params.project_id.as_deref()).await {
        Ok(templates) => templates,
        Err(err) => return Ok(ToolsCallResult::aap_error(&err)),
    };

    // Order as returned by the controller
    let result = JobTemplatesResult {
        count: templates.len(),
        templates,
    };

    ToolsCallResult::json(&result).map_err(|e| McpError::InternalError(e.to_string()))
}
