//! # Research Agent
//!
//! An AI research assistant that forwards natural-language queries to an LLM
//! runtime equipped with HTTP-backed research tools (knowledge-base search,
//! code-example search, source listing, web-page fetch) and returns the
//! synthesized answer over two protocol surfaces: a REST endpoint and an MCP
//! tool registry.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Request/response envelopes and the wire models of the
//!   external search services
//! - [`tools`]: The LLM-callable tool table and its handlers
//! - [`agent`]: The research agent driving the LLM function-calling loop
//! - [`api`]: REST endpoint (`/api/research/query`, `/api/research/health`)
//! - [`mcp`]: MCP protocol surface (`research_query`, `research_health`)
//! - [`utils`]: HTTP client, text extraction, and retry utilities
//! - [`config`]: Configuration management

pub mod agent;
pub mod api;
pub mod config;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod utils;

// Re-export commonly used types
pub use agent::{AgentError, AgentRunner, ResearchAgent};
pub use config::AgentConfig;
pub use models::{ResearchDependencies, ResearchRequest, ResearchResponse};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
