//! MCP Tool Execution Context
//!
//! Provides access to the AAP client for tool implementations. Each tool
//! call gets its own clone; no state is shared across calls beyond the
//! immutable configuration and the client's connection pool.

use std::sync::Arc;

use crate::aap::AapClient;
use crate::config::AapConfig;

/// Context provided to tool handlers during execution
#[derive(Clone)]
pub struct ToolContext {
    /// Client for the AAP controller API
    pub client: Arc<AapClient>,

    /// Connection configuration (immutable for the process lifetime)
    pub config: AapConfig,
}
