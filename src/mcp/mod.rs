//! MCP (Model Context Protocol) implementation.
//!
//! Mirrors the REST contract over a second protocol: the tools here call
//! the research endpoint over HTTP and reshape its responses, so an MCP
//! client sees the same envelopes whichever surface it uses.

pub mod server;
mod tools;

pub use server::McpServer;
pub use tools::{Tool, ToolHandler, ToolRegistry};
