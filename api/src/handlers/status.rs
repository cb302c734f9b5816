// Handlers for index, health and status endpoints

use axum::{extract::State, Json};

use crate::entity::sync_statuses;
use crate::error::ApiResult;
use crate::handlers::{AppState, ENDPOINTS};
use crate::models::{HealthResponse, IndexResponse, StatusResponse};
use crate::services::status_service;

/// Handler for GET /
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        endpoints: ENDPOINTS.to_vec(),
    })
}

/// Handler for GET /health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    Ok(Json(status_service::check_health(&state).await?))
}

/// Handler for GET /status
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(status_service::get_status(&state).await)
}

/// Handler for GET /chain_sync_statuses
pub async fn get_sync_statuses(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<sync_statuses::Model>>> {
    Ok(Json(state.repositories.chains.sync_statuses().await?))
}
