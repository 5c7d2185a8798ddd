//! HTTP client utilities.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Timeout applied to the tool-level search/fetch calls.
pub const TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for forwarding a research query to the REST endpoint. LLM-backed
/// queries are slow, so this is much longer than the tool timeout.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for health-check probes.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared HTTP client with sensible defaults
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with the default tool-call timeout
    pub fn new() -> Self {
        Self::with_timeouts(TOOL_TIMEOUT, Duration::from_secs(10))
    }

    /// Create a new HTTP client with explicit total and connect timeouts
    pub fn with_timeouts(timeout: Duration, connect_timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client: Arc::new(client),
        }
    }

    /// Create from an existing reqwest Client
    pub fn from_client(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
