//! AAP MCP Server Library
//!
//! A thin adapter exposing the Ansible Automation Platform controller API
//! (job templates, launches, status, output) as MCP tools. This library
//! exposes the internal modules for the e2e test suites.

pub mod aap;
pub mod config;
pub mod mcp;
pub mod server;

// Re-export commonly used types for convenience
pub use aap::{AapClient, AapError, RetryPolicy};
pub use config::AapConfig;
pub use server::{make_app, run_server};

/// Version string reported in /health and the MCP initialize handshake.
pub fn version() -> String {
    format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("GIT_HASH"))
}
