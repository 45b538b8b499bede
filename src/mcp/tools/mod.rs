//! MCP Tools
//!
//! The five tools exposed to LLM clients: template listing, job launch,
//! job status, job output, and the connectivity probe.

pub mod connection;
pub mod jobs;
pub mod templates;

use super::registry::McpRegistry;

/// Register all tools with the registry
pub fn register_all_tools(registry: &mut McpRegistry) {
    templates::register_tools(registry);
    jobs::register_tools(registry);
    connection::register_tools(registry);
}
