//! Research endpoint handlers.

use axum::{extract::State, Json};

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use crate::models::{HealthStatus, ResearchDependencies, ResearchRequest, ResearchResponse};

/// POST /api/research/query - Execute a research query
///
/// Validates the payload and the upstream credential before any agent work
/// starts. Agent runtime failures are captured into the envelope
/// (`success: false`, status 200); only configuration failures surface as
/// non-200 statuses.
pub async fn research_query(
    State(state): State<AppState>,
    Json(request): Json<ResearchRequest>,
) -> ApiResult<Json<ResearchResponse>> {
    request.validate().map_err(ApiError::UnprocessableEntity)?;

    if !state.config.openai_key_configured() {
        return Err(ApiError::ServiceUnavailable(
            "OpenAI API key not configured. Set OPENAI_API_KEY environment variable.".to_string(),
        ));
    }

    let deps = ResearchDependencies::from(&request);

    tracing::info!(
        query = %truncate_for_log(&request.query),
        match_count = request.match_count,
        web = request.enable_web_search,
        "research query"
    );

    match state.runner.run(&request.query, &deps).await {
        Ok(answer) => Ok(Json(ResearchResponse::success(request.query, answer))),
        Err(e) => {
            tracing::error!(error = %e, "research query failed");
            Ok(Json(ResearchResponse::failure(
                request.query,
                e.to_string(),
            )))
        }
    }
}

/// GET /api/research/health - Check if the research agent is available
pub async fn research_health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus::new(
        state.config.openai_key_configured(),
        state.config.agent_ready(),
    ))
}

fn truncate_for_log(query: &str) -> String {
    crate::utils::truncate_chars(query, 100)
}
