//! REST surface for the research agent.
//!
//! Two routes: `POST /api/research/query` and `GET /api/research/health`.
//! Configuration is read once at startup and carried in [`AppState`]; the
//! agent itself hides behind the [`AgentRunner`] trait so tests can inject
//! a stub.

mod error;
mod routes;

pub use error::{ApiError, ApiResult, ErrorResponse};

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::agent::{AgentRunner, LiveAgentRunner};
use crate::config::AgentConfig;

/// Shared state for the research routes
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AgentConfig>,
    pub runner: Arc<dyn AgentRunner>,
}

impl AppState {
    /// State backed by the live agent
    pub fn new(config: Arc<AgentConfig>) -> Self {
        let runner = Arc::new(LiveAgentRunner::new(config.clone()));
        Self { config, runner }
    }

    /// State with an injected runner (used by tests)
    pub fn with_runner(config: Arc<AgentConfig>, runner: Arc<dyn AgentRunner>) -> Self {
        Self { config, runner }
    }
}

/// Build the research API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/research/query", post(routes::research_query))
        .route("/api/research/health", get(routes::research_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
