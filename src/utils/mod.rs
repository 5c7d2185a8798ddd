//! Utility modules supporting the research operations.
//!
//! - [`HttpClient`]: shared HTTP client with per-purpose timeout tiers
//! - [`strip_html`] / [`truncate_chars`]: web-page text extraction helpers
//! - [`with_retry`] / [`RetryConfig`]: bounded backoff for LLM calls

mod http;
mod retry;
mod text;

pub use http::{HttpClient, HEALTH_TIMEOUT, QUERY_TIMEOUT, TOOL_TIMEOUT};
pub use retry::{with_retry, RetryConfig};
pub use text::{strip_html, truncate_chars};
