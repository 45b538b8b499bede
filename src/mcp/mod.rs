//! MCP (Model Context Protocol) Server
//!
//! Exposes the AAP client operations as MCP tools for LLM clients.
//!
//! ## Architecture
//!
//! - Transport: WebSocket at `/v1/mcp`
//! - Tools: the five AAP operations, stateless and independently invocable
//! - Errors: argument problems fail as JSON-RPC `InvalidParams` before any
//!   network call; AAP failures come back as structured tool errors

pub mod context;
pub mod handler;
pub mod protocol;
pub mod registry;
pub mod tools;

pub use handler::{create_registry, mcp_handler};
pub use protocol::{McpError, McpRequest, McpResponse};
pub use registry::McpRegistry;
