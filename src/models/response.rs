//! Research response envelope and health report.

use serde::{Deserialize, Serialize};

/// Response body for `POST /api/research/query`.
///
/// `error` serializes as `null` on success; callers distinguish "query
/// failed" (`success: false`, status 200) from "service not configured"
/// (status 503) by transport status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResponse {
    pub success: bool,
    pub query: String,
    pub answer: String,
    pub error: Option<String>,
}

impl ResearchResponse {
    /// Successful run with a synthesized answer
    pub fn success(query: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            success: true,
            query: query.into(),
            answer: answer.into(),
            error: None,
        }
    }

    /// Runtime failure captured into the envelope
    pub fn failure(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            query: query.into(),
            answer: String::new(),
            error: Some(error.into()),
        }
    }
}

/// Response body for `GET /api/research/health`.
///
/// Wire field names are fixed by the external interface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HealthStatus {
    pub available: bool,
    pub openai_key_configured: bool,
    pub agent_importable: bool,
}

impl HealthStatus {
    pub fn new(openai_key_configured: bool, agent_importable: bool) -> Self {
        Self {
            available: openai_key_configured && agent_importable,
            openai_key_configured,
            agent_importable,
        }
    }
}
