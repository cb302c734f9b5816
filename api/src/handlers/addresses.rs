use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::error::ApiResult;
use crate::handlers::AppState;
use crate::models::HeightQuery;
use crate::services::address_service;

/// Handler for GET /address/{id}
pub async fn get_address(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(params): Query<HeightQuery>,
) -> ApiResult<Json<Value>> {
    let balances =
        address_service::get_balances(&state, &address, params.height.as_deref()).await?;
    Ok(Json(balances))
}
