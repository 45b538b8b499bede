//! Job Tools
//!
//! Tools for launching job templates and reading job status/output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aap::LaunchRequest;
use crate::mcp::context::ToolContext;
use crate::mcp::protocol::{McpError, ToolsCallResult};
use crate::mcp::registry::{McpRegistry, RegisteredTool, ToolBuilder, ToolResult};

/// Register job tools with the registry
pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(launch_job_template_tool());
    registry.register_tool(get_job_status_tool());
    registry.register_tool(get_job_output_tool());
}

// ============================================================================
// launch_job_template
// ============================================================================

#[derive(Debug, Serialize)]
struct LaunchResult {
    job_id: u64,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    message: String,
}

fn launch_job_template_tool() -> RegisteredTool {
    ToolBuilder::new("launch_job_template")
        .description("Launch an Ansible job template with optional parameters")
        .input_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "template_id": {
                    "type": "integer",
                    "description": "ID of the job template to launch"
                },
                "extra_vars": {
                    "type": "object",
                    "description": "Extra variables to pass to the job template",
                    "additionalProperties": true
                },
                "inventory": {
                    "type": "integer",
                    "description": "Optional inventory ID to use"
                },
                "credentials": {
                    "type": "array",
                    "items": {"type": "integer"},
                    "description": "Optional list of credential IDs to use"
                }
            },
            "required": ["template_id"],
            "additionalProperties": false
        }))
        .build(launch_job_template_handler)
}

async fn launch_job_template_handler(ctx: ToolContext, params: Value) -> ToolResult {
    // Argument validation happens here, before any HTTP call is issued.
    let request: LaunchRequest =
        serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let launch = match ctx.client.launch_job_template(&request).await {
        Ok(launch) => launch,
        Err(err) => return Ok(ToolsCallResult::aap_error(&err)),
    };

    let result = LaunchResult {
        job_id: launch.job,
        status: launch.status.unwrap_or_else(|| "pending".to_string()),
        url: launch.url,
        message: "Job launched. Use get_job_status to check its progress.".to_string(),
    };

    ToolsCallResult::json(&result).map_err(|e| McpError::InternalError(e.to_string()))
}

// ============================================================================
// get_job_status
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JobIdParams {
    job_id: u64,
}

fn get_job_status_tool() -> RegisteredTool {
    ToolBuilder::new("get_job_status")
        .description("Get the status and details of a running or completed job")
        .input_schema(job_id_schema("ID of the job to check"))
        .build(get_job_status_handler)
}

async fn get_job_status_handler(ctx: ToolContext, params: Value) -> ToolResult {
    let params: JobIdParams =
        serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    match ctx.client.get_job_status(params.job_id).await {
        Ok(job) => ToolsCallResult::json(&job).map_err(|e| McpError::InternalError(e.to_string())),
        Err(err) => Ok(ToolsCallResult::aap_error(&err)),
    }
}

// ============================================================================
// get_job_output
// ============================================================================

fn get_job_output_tool() -> RegisteredTool {
    ToolBuilder::new("get_job_output")
        .description("Get the output/logs of a job. Output may be partial for running jobs.")
        .input_schema(job_id_schema("ID of the job to get output from"))
        .build(get_job_output_handler)
}

async fn get_job_output_handler(ctx: ToolContext, params: Value) -> ToolResult {
    let params: JobIdParams =
        serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    match ctx.client.get_job_stdout(params.job_id).await {
        Ok(output) => Ok(ToolsCallResult::text(output)),
        Err(err) => Ok(ToolsCallResult::aap_error(&err)),
    }
}

fn job_id_schema(description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "job_id": {
                "type": "integer",
                "description": description
            }
        },
        "required": ["job_id"],
        "additionalProperties": false
    })
}
