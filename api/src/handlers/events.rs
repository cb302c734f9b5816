use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::entity::events;
use crate::error::ApiResult;
use crate::handlers::AppState;
use crate::models::EventSearchParams;

/// Handler for GET /events
pub async fn get_events(
    State(state): State<AppState>,
    Query(params): Query<EventSearchParams>,
) -> ApiResult<Json<Vec<events::Model>>> {
    let search = params.validate()?;
    Ok(Json(state.repositories.events.search(&search).await?))
}

/// Handler for GET /events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<events::Model>> {
    Ok(Json(state.repositories.events.find_by_id(&id).await?))
}
