//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::debug;

use crate::{services::TimerContext, state::AppState};
use super::responses::{CountdownResponse, HealthResponse};

/// Handle GET /countdown - Return the latest rendered tick
pub async fn countdown_handler(State(state): State<Arc<AppState>>) -> Json<CountdownResponse> {
    Json(CountdownResponse {
        countdown: state.current_snapshot(),
        api_base: state.api_base.clone(),
        site: state.scope.clone(),
        uptime: state.get_uptime(),
    })
}

/// Handle GET /api/timer - Legacy deadline context for templates
pub async fn legacy_timer_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerContext>, StatusCode> {
    match state.legacy_context() {
        Some(ctx) => Ok(Json(ctx)),
        None => {
            debug!("Legacy timer requested before a deadline was resolved");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
